//! Dependency health heuristics.
//!
//! Release dates are not fetched from anywhere. [`HeuristicReleases`] guesses
//! an age from the major version and a short list of well-known modules, and
//! sits behind the [`ReleaseOracle`] trait so a real source can replace it.

use std::collections::HashSet;

use chrono::{DateTime, Months, Utc};
use serde::Serialize;

use crate::graph::EnhancedDependencyGraph;

/// What is known about a module's latest release.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseInfo {
    pub last_update: DateTime<Utc>,
    pub is_outdated: bool,
    pub update_available: Option<String>,
}

pub trait ReleaseOracle {
    fn release_info(&self, module_path: &str, version: &str, now: DateTime<Utc>) -> ReleaseInfo;
}

pub const DEFAULT_WELL_KNOWN: &[&str] = &[
    "github.com/spf13/cobra",
    "github.com/spf13/pflag",
    "golang.org/x/mod",
    "github.com/fatih/color",
    "gopkg.in/yaml.v3",
];

pub struct HeuristicReleases {
    well_known: HashSet<String>,
}

impl HeuristicReleases {
    pub fn builtin() -> Self {
        Self::new(DEFAULT_WELL_KNOWN.iter().map(|s| s.to_string()))
    }

    pub fn new(well_known: impl IntoIterator<Item = String>) -> Self {
        Self {
            well_known: well_known.into_iter().collect(),
        }
    }
}

fn months_ago(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months)).unwrap_or(now)
}

impl ReleaseOracle for HeuristicReleases {
    fn release_info(&self, module_path: &str, version: &str, now: DateTime<Utc>) -> ReleaseInfo {
        let (months, is_outdated) = if self.well_known.contains(module_path) {
            (1, false)
        } else if version.contains("v1.") || version.contains("v2.") {
            (2, false)
        } else if version.contains("v0.") {
            (4, true)
        } else {
            (3, false)
        };

        ReleaseInfo {
            last_update: months_ago(now, months),
            is_outdated,
            update_available: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    WellMaintained,
    Outdated,
    Stale,
}

impl HealthStatus {
    /// Under 90 days is well maintained, under a year outdated, else stale.
    pub fn from_age_days(days: i64) -> Self {
        if days < 90 {
            HealthStatus::WellMaintained
        } else if days < 365 {
            HealthStatus::Outdated
        } else {
            HealthStatus::Stale
        }
    }
}

/// One row of the health report.
#[derive(Debug, Clone, Serialize)]
pub struct PackageHealth {
    pub name: String,
    pub version: String,
    pub status: HealthStatus,
    pub days_since_update: i64,
    pub is_outdated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_available: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub module: String,
    pub dependencies_analyzed: usize,
    pub well_maintained: usize,
    pub outdated: usize,
    pub stale: usize,
    pub score: f64,
    pub grade: String,
    pub packages: Vec<PackageHealth>,
}

impl HealthReport {
    /// Summarize a graph whose health pass has already run. Nodes without a
    /// release date count as updated `now`.
    pub fn from_graph(graph: &EnhancedDependencyGraph, now: DateTime<Utc>) -> Self {
        let packages: Vec<PackageHealth> = graph
            .enhanced_nodes
            .values()
            .map(|node| {
                let days = node
                    .last_update
                    .map(|d| (now - d).num_days())
                    .unwrap_or(0);
                PackageHealth {
                    name: node.name().to_string(),
                    version: node.version().to_string(),
                    status: HealthStatus::from_age_days(days),
                    days_since_update: days,
                    is_outdated: node.is_outdated,
                    update_available: node.update_available.clone(),
                }
            })
            .collect();

        let count = |status: HealthStatus| packages.iter().filter(|p| p.status == status).count();
        let well_maintained = count(HealthStatus::WellMaintained);
        let outdated = count(HealthStatus::Outdated);
        let stale = count(HealthStatus::Stale);
        let score = health_score(well_maintained, outdated, stale);

        Self {
            module: graph.module_name().to_string(),
            dependencies_analyzed: graph.graph.all_nodes.len().saturating_sub(1),
            well_maintained,
            outdated,
            stale,
            score,
            grade: grade(score).to_string(),
            packages,
        }
    }

    pub fn with_status(&self, status: HealthStatus) -> impl Iterator<Item = &PackageHealth> {
        self.packages.iter().filter(move |p| p.status == status)
    }
}

/// Well maintained counts fully, outdated half, stale nothing. A project with
/// no dependencies scores 100.
pub fn health_score(well_maintained: usize, outdated: usize, stale: usize) -> f64 {
    let total = well_maintained + outdated + stale;
    if total == 0 {
        return 100.0;
    }
    (well_maintained * 100 + outdated * 50) as f64 / (total * 100) as f64 * 100.0
}

pub fn grade(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent"
    } else if score >= 60.0 {
        "Good"
    } else {
        "Needs Attention"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::{lock, modfile};
    use crate::graph::DependencyGraph;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_version_heuristics() {
        let oracle = HeuristicReleases::builtin();
        let v1 = oracle.release_info("example.com/a", "v1.4.0", now());
        assert_eq!(v1.last_update, Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap());
        assert!(!v1.is_outdated);

        let v0 = oracle.release_info("example.com/b", "v0.9.0", now());
        assert_eq!(v0.last_update, Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap());
        assert!(v0.is_outdated);

        let other = oracle.release_info("example.com/c", "v3.0.0", now());
        assert_eq!(other.last_update, Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap());
        assert!(!other.is_outdated);
    }

    #[test]
    fn test_well_known_overrides_version() {
        let oracle = HeuristicReleases::builtin();
        let info = oracle.release_info("golang.org/x/mod", "v0.14.0", now());
        assert_eq!(info.last_update, Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap());
        assert!(!info.is_outdated);
    }

    #[test]
    fn test_age_buckets() {
        assert_eq!(HealthStatus::from_age_days(0), HealthStatus::WellMaintained);
        assert_eq!(HealthStatus::from_age_days(89), HealthStatus::WellMaintained);
        assert_eq!(HealthStatus::from_age_days(90), HealthStatus::Outdated);
        assert_eq!(HealthStatus::from_age_days(364), HealthStatus::Outdated);
        assert_eq!(HealthStatus::from_age_days(365), HealthStatus::Stale);
    }

    #[test]
    fn test_score_and_grade() {
        assert_eq!(health_score(0, 0, 0), 100.0);
        assert_eq!(health_score(1, 1, 0), 75.0);
        assert_eq!(health_score(0, 0, 3), 0.0);
        assert_eq!(grade(80.0), "Excellent");
        assert_eq!(grade(75.0), "Good");
        assert_eq!(grade(10.0), "Needs Attention");
    }

    #[test]
    fn test_report_from_graph() {
        let base = DependencyGraph::from_modfile(&modfile(&[
            ("example.com/new", "v1.2.0", false),
            ("example.com/old", "v0.1.0", false),
        ]));
        let mut g = EnhancedDependencyGraph::build(base, lock(&[]));
        g.assess_health(&HeuristicReleases::builtin(), now());

        let report = HealthReport::from_graph(&g, now());
        assert_eq!(report.dependencies_analyzed, 2);
        // 2 months → well maintained, 4 months (~121 days) → outdated.
        assert_eq!(report.well_maintained, 1);
        assert_eq!(report.outdated, 1);
        assert_eq!(report.score, 75.0);
        assert_eq!(report.grade, "Good");
        let outdated: Vec<&str> = report
            .with_status(HealthStatus::Outdated)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(outdated, vec!["example.com/old"]);
    }
}
