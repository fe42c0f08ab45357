use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enhanced::EnhancedDependencyGraph;

/// Summary counts for an analyzed graph.
///
/// `transitive_dependencies` is `lock entries - direct - indirect` and is
/// reported as-is, negative values included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_dependencies: usize,
    pub direct_dependencies: usize,
    pub indirect_dependencies: usize,
    pub transitive_dependencies: i64,
    pub version_conflicts: usize,
    pub security_issues: usize,
    pub unique_licenses: usize,
    pub licenses_breakdown: BTreeMap<String, usize>,
}

impl EnhancedDependencyGraph {
    pub fn statistics(&self) -> Statistics {
        let (direct, indirect) = self.graph.dependency_count();
        let transitive = self.lock_entries.len() as i64 - direct as i64 - indirect as i64;

        Statistics {
            total_dependencies: self.graph.all_nodes.len().saturating_sub(1),
            direct_dependencies: direct,
            indirect_dependencies: indirect,
            transitive_dependencies: transitive,
            version_conflicts: self.conflicts.len(),
            security_issues: self.security_issues.len(),
            unique_licenses: self.licenses_summary.len(),
            licenses_breakdown: self.licenses_summary.clone(),
        }
    }
}
