use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::conflicts::find_conflicts;
use super::dependency::{DependencyGraph, Node};
use crate::health::ReleaseOracle;
use crate::license::LicenseLookup;
use crate::models::{SecurityIssue, VersionConflict};
use crate::parser::{lock_key, LockEntries, LockEntry};
use crate::security::{scan_node, AdvisoryLookup};

/// A node plus everything the passes learn about it.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedNode {
    #[serde(flatten)]
    pub node: Node,
    /// `go.sum` hash for exactly this `name@version`, if recorded.
    pub hash: Option<String>,
    pub conflicts: Vec<VersionConflict>,
    pub security_issues: Vec<SecurityIssue>,
    /// Set by the license pass; `"Unknown"` when nothing matched.
    pub license: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub is_outdated: bool,
    pub update_available: Option<String>,
}

impl EnhancedNode {
    fn new(node: Node, hash: Option<String>) -> Self {
        Self {
            node,
            hash,
            conflicts: Vec::new(),
            security_issues: Vec::new(),
            license: None,
            last_update: None,
            is_outdated: false,
            update_available: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn version(&self) -> &str {
        &self.node.version
    }

    pub fn is_direct(&self) -> bool {
        self.node.direct
    }

    pub fn license_or_unknown(&self) -> &str {
        match self.license.as_deref() {
            Some(l) if !l.is_empty() => l,
            _ => "Unknown",
        }
    }
}

/// The base graph merged with `go.sum`, plus analysis results.
///
/// `enhanced_nodes` covers every node except the root.
#[derive(Debug, Clone)]
pub struct EnhancedDependencyGraph {
    pub graph: DependencyGraph,
    pub enhanced_nodes: BTreeMap<String, EnhancedNode>,
    pub lock_entries: LockEntries,
    pub conflicts: Vec<VersionConflict>,
    pub security_issues: Vec<SecurityIssue>,
    pub licenses_summary: BTreeMap<String, usize>,
}

impl EnhancedDependencyGraph {
    /// Merge lock entries into the base graph.
    ///
    /// Declared requirements pick up the hash recorded for their exact
    /// version. Modules that only appear in `go.sum` are added as indirect
    /// nodes, one per module path even when several versions are recorded.
    pub fn build(mut graph: DependencyGraph, lock_entries: LockEntries) -> Self {
        let mut enhanced_nodes = BTreeMap::new();

        for (name, node) in &graph.all_nodes {
            if graph.is_root(name) {
                continue;
            }
            let hash = lock_entries
                .get(&lock_key(name, &node.version))
                .map(|e| e.hash.clone());
            enhanced_nodes.insert(name.clone(), EnhancedNode::new(node.clone(), hash));
        }

        let direct: Vec<&str> = graph.root.children.iter().map(String::as_str).collect();
        let mut added = 0usize;

        for entry in transitive_entries(&lock_entries, &direct) {
            if graph.is_root(&entry.module_path) || enhanced_nodes.contains_key(&entry.module_path) {
                continue;
            }
            let node = Node::new(&entry.module_path, &entry.version, false);
            graph.all_nodes.insert(node.name.clone(), node.clone());
            enhanced_nodes.insert(
                node.name.clone(),
                EnhancedNode::new(node, Some(entry.hash.clone())),
            );
            added += 1;
        }

        info!(
            nodes = graph.all_nodes.len(),
            lock_entries = lock_entries.len(),
            transitive_added = added,
            "built enhanced dependency graph"
        );

        Self {
            graph,
            enhanced_nodes,
            lock_entries,
            conflicts: Vec::new(),
            security_issues: Vec::new(),
            licenses_summary: BTreeMap::new(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.graph.module_name
    }

    /// Record every version conflict on the graph and on the affected node.
    pub fn detect_version_conflicts(&mut self) {
        for conflict in find_conflicts(&self.lock_entries) {
            if let Some(node) = self.enhanced_nodes.get_mut(&conflict.module_path) {
                node.conflicts.push(conflict.clone());
            }
            self.conflicts.push(conflict);
        }
        debug!(conflicts = self.conflicts.len(), "version conflict detection done");
    }

    /// Assign a license to every node and count them in `licenses_summary`.
    ///
    /// Counts are added to whatever the summary already holds: running this
    /// twice on one graph doubles every count.
    pub fn analyze_licenses(&mut self, lookup: &dyn LicenseLookup) {
        for (name, node) in self.enhanced_nodes.iter_mut() {
            let license = lookup.license_for(name);
            *self.licenses_summary.entry(license.clone()).or_insert(0) += 1;
            node.license = Some(license);
        }
        debug!(
            unique_licenses = self.licenses_summary.len(),
            "license classification done"
        );
    }

    /// Run the security rules over every node. Issues are recorded on the
    /// node and appended to the graph-wide list.
    pub fn check_security(&mut self, advisories: &dyn AdvisoryLookup) {
        for (name, node) in self.enhanced_nodes.iter_mut() {
            let issues = scan_node(name, &node.node.version, advisories);
            self.security_issues.extend(issues.iter().cloned());
            node.security_issues.extend(issues);
        }
        debug!(issues = self.security_issues.len(), "security scan done");
    }

    /// Fill in release date and staleness for every node.
    pub fn assess_health(&mut self, oracle: &dyn ReleaseOracle, now: DateTime<Utc>) {
        for (name, node) in self.enhanced_nodes.iter_mut() {
            let release = oracle.release_info(name, &node.node.version, now);
            node.last_update = Some(release.last_update);
            node.is_outdated = release.is_outdated;
            node.update_available = release.update_available;
        }
    }
}

/// Lock entries for modules not declared as direct requirements, one per
/// module path. The first entry seen for a path wins; entries are visited in
/// key order.
pub fn transitive_entries<'a>(entries: &'a LockEntries, direct: &[&str]) -> Vec<&'a LockEntry> {
    let direct: HashSet<&str> = direct.iter().copied().collect();
    let mut seen: HashSet<&str> = HashSet::new();

    entries
        .values()
        .filter(|e| !direct.contains(e.module_path.as_str()))
        .filter(|e| seen.insert(e.module_path.as_str()))
        .collect()
}
