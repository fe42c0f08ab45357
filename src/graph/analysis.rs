use chrono::{DateTime, Utc};
use tracing::debug;

use super::enhanced::EnhancedDependencyGraph;
use crate::config::Config;
use crate::health::{HeuristicReleases, ReleaseOracle};
use crate::license::{LicenseLookup, ModuleLicenseTable};
use crate::security::{AdvisoryLookup, KnownAdvisories};

/// The lookup tables every pass draws from.
pub struct Analyzers {
    pub licenses: Box<dyn LicenseLookup>,
    pub advisories: Box<dyn AdvisoryLookup>,
    pub releases: Box<dyn ReleaseOracle>,
}

impl Analyzers {
    pub fn builtin() -> Self {
        Self {
            licenses: Box::new(ModuleLicenseTable::builtin()),
            advisories: Box::new(KnownAdvisories::builtin()),
            releases: Box::new(HeuristicReleases::builtin()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            licenses: Box::new(ModuleLicenseTable::from_config(&config.licenses)),
            advisories: Box::new(KnownAdvisories::builtin()),
            releases: Box::new(HeuristicReleases::new(config.health.well_known.iter().cloned())),
        }
    }
}

/// Which passes to run over a freshly built graph.
///
/// [`AnalysisPlan::apply`] consumes both the plan and the graph, so every
/// selected pass runs exactly once per graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisPlan {
    pub conflicts: bool,
    pub licenses: bool,
    pub security: bool,
    pub health: bool,
}

impl AnalysisPlan {
    pub fn full() -> Self {
        Self {
            conflicts: true,
            licenses: true,
            security: true,
            health: true,
        }
    }

    /// Conflicts, licenses and security; what the graph renderers show.
    pub fn annotations() -> Self {
        Self {
            health: false,
            ..Self::full()
        }
    }

    pub fn licenses_only() -> Self {
        Self {
            licenses: true,
            ..Self::default()
        }
    }

    pub fn security_only() -> Self {
        Self {
            security: true,
            ..Self::default()
        }
    }

    pub fn health_only() -> Self {
        Self {
            health: true,
            ..Self::default()
        }
    }

    pub fn apply(
        self,
        mut graph: EnhancedDependencyGraph,
        analyzers: &Analyzers,
        now: DateTime<Utc>,
    ) -> EnhancedDependencyGraph {
        debug!(plan = ?self, "running analysis passes");
        if self.conflicts {
            graph.detect_version_conflicts();
        }
        if self.licenses {
            graph.analyze_licenses(analyzers.licenses.as_ref());
        }
        if self.security {
            graph.check_security(analyzers.advisories.as_ref());
        }
        if self.health {
            graph.assess_health(analyzers.releases.as_ref(), now);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::{lock, modfile};
    use crate::graph::DependencyGraph;

    fn sample() -> EnhancedDependencyGraph {
        let base = DependencyGraph::from_modfile(&modfile(&[
            ("github.com/gin-gonic/gin", "v1.7.7", false),
            ("golang.org/x/sys", "v0.5.0", true),
        ]));
        EnhancedDependencyGraph::build(
            base,
            lock(&[
                ("github.com/gin-gonic/gin", "v1.7.7"),
                ("github.com/gin-gonic/gin", "v1.9.1"),
                ("golang.org/x/sys", "v0.5.0"),
            ]),
        )
    }

    #[test]
    fn test_full_plan_runs_every_pass_once() {
        let g = AnalysisPlan::full().apply(sample(), &Analyzers::builtin(), Utc::now());

        assert_eq!(g.conflicts.len(), 1);
        let total: usize = g.licenses_summary.values().sum();
        assert_eq!(total, g.enhanced_nodes.len());
        assert_eq!(g.security_issues.len(), 1);
        assert!(g.enhanced_nodes.values().all(|n| n.last_update.is_some()));
    }

    #[test]
    fn test_single_pass_plans() {
        let g = AnalysisPlan::licenses_only().apply(sample(), &Analyzers::builtin(), Utc::now());
        assert!(g.conflicts.is_empty());
        assert!(g.security_issues.is_empty());
        assert_eq!(g.licenses_summary["BSD-3-Clause"], 1);

        let g = AnalysisPlan::security_only().apply(sample(), &Analyzers::builtin(), Utc::now());
        assert!(g.licenses_summary.is_empty());
        assert_eq!(g.security_issues[0].id, "GHSA-example");

        let g = AnalysisPlan::health_only().apply(sample(), &Analyzers::builtin(), Utc::now());
        assert!(g.enhanced_nodes["golang.org/x/sys"].is_outdated);
        assert!(g.enhanced_nodes.values().all(|n| n.license.is_none()));
    }

    #[test]
    fn test_config_feeds_lookups() {
        let mut config = Config::default();
        config
            .licenses
            .known
            .insert("github.com/gin-gonic/gin".to_string(), "MIT".to_string());
        config.health.well_known = vec!["golang.org/x/sys".to_string()];

        let g = AnalysisPlan::full().apply(sample(), &Analyzers::from_config(&config), Utc::now());
        assert_eq!(g.enhanced_nodes["github.com/gin-gonic/gin"].license.as_deref(), Some("MIT"));
        assert!(!g.enhanced_nodes["golang.org/x/sys"].is_outdated);
    }
}
