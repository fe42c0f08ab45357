use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::graph::stats::Statistics;
use crate::graph::{EnhancedDependencyGraph, EnhancedNode};
use crate::models::{SecurityIssue, VersionConflict};

pub const TOOL_NAME: &str = "modviz";

/// The machine-readable view of an analyzed graph.
#[derive(Debug, Serialize)]
pub struct DependencyReport {
    pub metadata: ReportMetadata,
    pub module: ModuleInfo,
    pub statistics: Statistics,
    pub dependencies: Vec<DependencyInfo>,
    pub conflicts: Vec<VersionConflict>,
    pub security_issues: Vec<SecurityIssue>,
    pub licenses_summary: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_version: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DependencyInfo {
    pub name: String,
    pub version: String,
    pub direct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<VersionConflict>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_issues: Vec<SecurityIssue>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_outdated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_available: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<&EnhancedNode> for DependencyInfo {
    fn from(node: &EnhancedNode) -> Self {
        Self {
            name: node.name().to_string(),
            version: node.version().to_string(),
            direct: node.is_direct(),
            hash: node.hash.clone(),
            license: node.license.clone(),
            conflicts: node.conflicts.clone(),
            security_issues: node.security_issues.clone(),
            is_outdated: node.is_outdated,
            update_available: node.update_available.clone(),
        }
    }
}

impl DependencyReport {
    pub fn new(graph: &EnhancedDependencyGraph, project_path: &Path, generated_at: DateTime<Utc>) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at,
                tool: TOOL_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            module: ModuleInfo {
                name: graph.module_name().to_string(),
                go_version: graph.graph.module_go_version.clone(),
                path: project_path.display().to_string(),
            },
            statistics: graph.statistics(),
            dependencies: graph.enhanced_nodes.values().map(DependencyInfo::from).collect(),
            conflicts: graph.conflicts.clone(),
            security_issues: graph.security_issues.clone(),
            licenses_summary: graph.licenses_summary.clone(),
        }
    }
}
