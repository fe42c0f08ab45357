use std::collections::BTreeMap;
use std::fmt::{self, Write};

use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::graph::EnhancedDependencyGraph;
use crate::models::{SecurityIssue, Severity};

#[derive(Debug, Serialize)]
pub struct SecurityReport {
    pub module: String,
    pub scanned: usize,
    /// Severity filter applied to `issues` and `counts`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_filter: Option<Severity>,
    pub counts: BTreeMap<Severity, usize>,
    /// Per-severity counts before filtering. The exit status is decided on
    /// these so that a display filter cannot hide a failing issue.
    pub totals: BTreeMap<Severity, usize>,
    pub issues: Vec<Finding>,
}

/// An issue together with the module it was raised on.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub module: String,
    pub version: String,
    #[serde(flatten)]
    pub issue: SecurityIssue,
}

impl SecurityReport {
    /// Build from a graph whose security pass has run.
    pub fn from_graph(graph: &EnhancedDependencyGraph, filter: Option<Severity>) -> Self {
        let all: Vec<Finding> = graph
            .enhanced_nodes
            .values()
            .flat_map(|node| {
                node.security_issues.iter().map(move |issue| Finding {
                    module: node.name().to_string(),
                    version: node.version().to_string(),
                    issue: issue.clone(),
                })
            })
            .collect();
        let totals = count_severities(&all);

        let issues: Vec<Finding> = all
            .into_iter()
            .filter(|f| filter.map_or(true, |s| f.issue.severity == s))
            .collect();
        let counts = count_severities(&issues);

        Self {
            module: graph.module_name().to_string(),
            scanned: graph.graph.all_nodes.len().saturating_sub(1),
            severity_filter: filter,
            counts,
            totals,
            issues,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts.get(&severity).copied().unwrap_or(0)
    }

    /// True when any issue in the graph, filtered out or not, has one of the
    /// `fail_on` severities.
    pub fn fails(&self, fail_on: &[Severity]) -> bool {
        fail_on
            .iter()
            .any(|s| self.totals.get(s).copied().unwrap_or(0) > 0)
    }
}

fn count_severities(findings: &[Finding]) -> BTreeMap<Severity, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.issue.severity).or_insert(0) += 1;
    }
    counts
}

fn severity_colored(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical | Severity::High => text.red().bold(),
        Severity::Medium => text.yellow().bold(),
        Severity::Low => text.green().bold(),
    }
}

pub fn render(report: &SecurityReport, fail_on: &[Severity]) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{}", "Security Vulnerability Report".blue().bold())?;
    writeln!(out, "{}\n", "=============================".blue().bold())?;
    writeln!(out, "Module: {}", report.module)?;
    writeln!(out, "Scanned: {} dependencies", report.scanned)?;
    if let Some(severity) = report.severity_filter {
        writeln!(out, "Severity filter: {}", severity)?;
    }
    writeln!(out)?;

    if report.issues.is_empty() {
        writeln!(out, "{}\n", "✓ No known security vulnerabilities found!".green().bold())?;
        writeln!(out, "{}", "Security Recommendations:".blue().bold())?;
        writeln!(out, "  • Keep dependencies up to date")?;
        writeln!(out, "  • Regularly run security scans")?;
        writeln!(out, "  • Monitor security advisories")?;
        writeln!(out, "  • Use 'go mod tidy' to remove unused dependencies")?;
    } else {
        write_findings(&mut out, report)?;
    }

    if report.fails(fail_on) {
        let failing: Vec<String> = fail_on.iter().map(|s| s.to_string()).collect();
        writeln!(
            out,
            "\n{}",
            format!("✗ Security scan failed: issues at {} severity", failing.join("/"))
                .red()
                .bold()
        )?;
    }

    Ok(out)
}

fn write_findings(out: &mut String, report: &SecurityReport) -> fmt::Result {
    writeln!(
        out,
        "{}",
        format!("Found {} security issues:", report.issues.len()).red().bold()
    )?;
    for severity in Severity::ALL {
        let count = report.count(severity);
        if count > 0 {
            writeln!(out, "  • {}: {}", severity_colored(&severity.to_string(), severity), count)?;
        }
    }
    writeln!(out)?;

    for severity in Severity::ALL {
        let group: Vec<&Finding> = report
            .issues
            .iter()
            .filter(|f| f.issue.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }
        let heading = format!("{} Severity Issues:", severity);
        writeln!(out, "{}", severity_colored(&heading, severity))?;
        for (i, finding) in group.iter().enumerate() {
            let issue = &finding.issue;
            writeln!(out, "  {}. {} in {} ({})", i + 1, issue.id, finding.module, finding.version)?;
            writeln!(out, "     Description: {}", issue.description)?;
            let fixed_in = if issue.fixed_in.is_empty() { "N/A" } else { issue.fixed_in.as_str() };
            writeln!(out, "     Fixed in: {}\n", fixed_in)?;
        }
    }

    writeln!(out, "{}", "Recommended Actions:".yellow().bold())?;
    if report.count(Severity::Critical) > 0 || report.count(Severity::High) > 0 {
        writeln!(
            out,
            "  ✗ URGENT: Update packages with CRITICAL/HIGH severity issues immediately"
        )?;
    }
    if report.count(Severity::Medium) > 0 {
        writeln!(out, "  ⚠ Plan updates for MEDIUM severity issues in next release")?;
    }
    if report.count(Severity::Low) > 0 {
        writeln!(out, "  • Consider updating LOW severity issues when convenient")?;
    }
    writeln!(out, "  • Run 'go get -u' to update dependencies")?;
    writeln!(out, "  • Review and test updates in development environment")?;
    writeln!(out, "  • Set up automated security scanning in CI/CD")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::analysis::{AnalysisPlan, Analyzers};
    use crate::graph::testutil::{lock, modfile};
    use crate::graph::DependencyGraph;
    use crate::report::testutil::plain;
    use crate::report::{to_document, DocumentFormat};
    use chrono::Utc;

    fn scanned(requires: &[(&str, &str, bool)]) -> EnhancedDependencyGraph {
        let base = DependencyGraph::from_modfile(&modfile(requires));
        let graph = EnhancedDependencyGraph::build(base, lock(&[]));
        AnalysisPlan::security_only().apply(graph, &Analyzers::builtin(), Utc::now())
    }

    fn default_fail_on() -> Vec<Severity> {
        vec![Severity::Critical, Severity::High]
    }

    #[test]
    fn test_counts_and_failure() {
        let g = scanned(&[
            ("github.com/gorilla/websocket", "v1.4.2", false),
            ("example.com/tool", "v1.0.0-beta.1", true),
        ]);
        let report = SecurityReport::from_graph(&g, None);

        assert_eq!(report.scanned, 2);
        assert_eq!(report.count(Severity::High), 1);
        assert_eq!(report.count(Severity::Low), 1);
        assert!(report.fails(&default_fail_on()));
        assert!(!report.fails(&[Severity::Critical]));
    }

    #[test]
    fn test_filter_limits_issues_but_not_failure() {
        let g = scanned(&[
            ("github.com/gorilla/websocket", "v1.4.2", false),
            ("example.com/tool", "v1.0.0-beta.1", true),
        ]);
        let report = SecurityReport::from_graph(&g, Some(Severity::Low));
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].module, "example.com/tool");
        assert_eq!(report.count(Severity::High), 0);
        assert_eq!(report.totals[&Severity::High], 1);
        assert!(report.fails(&default_fail_on()));
    }

    #[test]
    fn test_filtered_out_failure_is_still_reported() {
        plain();
        let g = scanned(&[("github.com/gorilla/websocket", "v1.4.2", false)]);
        let report = SecurityReport::from_graph(&g, Some(Severity::Medium));
        let out = render(&report, &default_fail_on()).unwrap();
        assert!(out.contains("✓ No known security vulnerabilities found!"));
        assert!(out.contains("✗ Security scan failed: issues at CRITICAL/HIGH severity"));
    }

    #[test]
    fn test_clean_report() {
        plain();
        let g = scanned(&[("github.com/spf13/cobra", "v1.8.0", false)]);
        let report = SecurityReport::from_graph(&g, None);
        assert!(!report.fails(&default_fail_on()));
        let out = render(&report, &default_fail_on()).unwrap();
        assert!(out.contains("✓ No known security vulnerabilities found!"));
        assert!(!out.contains("failed"));
    }

    #[test]
    fn test_grouped_output() {
        plain();
        let g = scanned(&[
            ("github.com/gorilla/websocket", "v1.4.2", false),
            ("github.com/gin-gonic/gin", "v1.8.1", false),
        ]);
        let out = render(&SecurityReport::from_graph(&g, None), &default_fail_on()).unwrap();

        assert!(out.contains("Found 2 security issues:"));
        let high = out.find("HIGH Severity Issues:").unwrap();
        let medium = out.find("MEDIUM Severity Issues:").unwrap();
        assert!(high < medium);
        assert!(out.contains("  1. CVE-2023-example in github.com/gorilla/websocket (v1.4.2)\n"));
        assert!(out.contains("     Fixed in: v1.5.0+\n"));
        assert!(out.contains("✗ Security scan failed"));
    }

    #[test]
    fn test_json_document() {
        let g = scanned(&[("github.com/gorilla/websocket", "v1.4.2", false)]);
        let report = SecurityReport::from_graph(&g, None);
        let json = to_document(&report, DocumentFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["counts"]["HIGH"], 1);
        assert_eq!(value["issues"][0]["module"], "github.com/gorilla/websocket");
        assert_eq!(value["issues"][0]["id"], "CVE-2023-example");
        assert_eq!(value["issues"][0]["severity"], "HIGH");
    }
}
