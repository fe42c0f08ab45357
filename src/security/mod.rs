//! Heuristic security checks.
//!
//! There is no vulnerability database behind this: [`KnownAdvisories`] is a
//! small fixed table served through the [`AdvisoryLookup`] trait, and
//! [`heuristics`] flags suspicious version strings and module paths.

use crate::models::{SecurityIssue, Severity};

pub mod heuristics;

/// Source of advisories for a specific module version.
pub trait AdvisoryLookup {
    fn advisories_for(&self, module_path: &str, version: &str) -> Vec<SecurityIssue>;
}

struct Advisory {
    module_path: &'static str,
    /// The advisory applies when the version contains any of these.
    affected_markers: &'static [&'static str],
    id: &'static str,
    severity: Severity,
    description: &'static str,
    fixed_in: &'static str,
}

const ADVISORIES: &[Advisory] = &[
    Advisory {
        module_path: "github.com/gin-gonic/gin",
        affected_markers: &["v1.8", "v1.7", "v1.4"],
        id: "GHSA-example",
        severity: Severity::Medium,
        description: "Check for latest version with security fixes",
        fixed_in: "v1.9.1+",
    },
    Advisory {
        module_path: "github.com/gorilla/websocket",
        affected_markers: &["v1.8", "v1.7", "v1.4"],
        id: "CVE-2023-example",
        severity: Severity::High,
        description: "WebSocket vulnerability in older versions",
        fixed_in: "v1.5.0+",
    },
];

/// The built-in advisory table.
pub struct KnownAdvisories {
    advisories: &'static [Advisory],
}

impl KnownAdvisories {
    pub fn builtin() -> Self {
        Self {
            advisories: ADVISORIES,
        }
    }
}

impl AdvisoryLookup for KnownAdvisories {
    fn advisories_for(&self, module_path: &str, version: &str) -> Vec<SecurityIssue> {
        self.advisories
            .iter()
            .filter(|a| a.module_path == module_path)
            .filter(|a| a.affected_markers.iter().any(|m| version.contains(m)))
            .map(|a| SecurityIssue {
                id: a.id.to_string(),
                severity: a.severity,
                description: a.description.to_string(),
                fixed_in: a.fixed_in.to_string(),
            })
            .collect()
    }
}

/// Every issue raised for one node: advisories first, then the heuristics.
/// Rules are independent and their results accumulate.
pub fn scan_node(module_path: &str, version: &str, advisories: &dyn AdvisoryLookup) -> Vec<SecurityIssue> {
    let mut issues = advisories.advisories_for(module_path, version);
    issues.extend(heuristics::check_version(version));
    issues.extend(heuristics::check_module_path(module_path));
    issues.extend(heuristics::check_missing_version(version));
    issues
}
