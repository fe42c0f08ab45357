use std::fmt::{self, Write};

use anyhow::Result;
use colored::*;
use comfy_table::Cell;

use super::table;
use crate::graph::EnhancedDependencyGraph;
use crate::license::UNKNOWN_LICENSE;

/// Which part of the analysis report to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisView {
    Full,
    ConflictsOnly,
    OutdatedOnly,
}

pub fn render(graph: &EnhancedDependencyGraph, view: AnalysisView) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{}", "Dependency Analysis Report".blue().bold())?;
    writeln!(out, "{}\n", "==========================".blue().bold())?;
    writeln!(out, "Module: {}", graph.module_name())?;
    if let Some(go) = &graph.graph.module_go_version {
        writeln!(out, "Go Version: {}", go)?;
    }
    writeln!(out)?;

    match view {
        AnalysisView::ConflictsOnly => write_conflicts(&mut out, graph)?,
        AnalysisView::OutdatedOnly => write_outdated(&mut out, graph)?,
        AnalysisView::Full => {
            write_statistics(&mut out, graph)?;
            write_conflicts(&mut out, graph)?;
            write_security(&mut out, graph)?;
            write_licenses(&mut out, graph)?;
            write_recommendations(&mut out, graph)?;
        }
    }

    Ok(out)
}

fn write_statistics(out: &mut String, graph: &EnhancedDependencyGraph) -> fmt::Result {
    let stats = graph.statistics();
    writeln!(out, "{}", "Statistics:".blue().bold())?;
    writeln!(out, "  Total Dependencies: {}", stats.total_dependencies)?;
    writeln!(out, "  Direct Dependencies: {}", stats.direct_dependencies)?;
    writeln!(out, "  Indirect Dependencies: {}", stats.indirect_dependencies)?;
    writeln!(out, "  Transitive Dependencies: {}", stats.transitive_dependencies)?;
    writeln!(out, "  Unique Licenses: {}\n", stats.unique_licenses)?;
    Ok(())
}

fn write_conflicts(out: &mut String, graph: &EnhancedDependencyGraph) -> fmt::Result {
    if graph.conflicts.is_empty() {
        writeln!(out, "{}\n", "✓ No version conflicts detected".green().bold())?;
        return Ok(());
    }
    writeln!(
        out,
        "{}",
        format!("⚡ Version Conflicts ({}):", graph.conflicts.len()).red().bold()
    )?;
    for c in &graph.conflicts {
        writeln!(
            out,
            "  • {}: {} vs {} ({})",
            c.module_path, c.current_version, c.conflict_version, c.reason
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_security(out: &mut String, graph: &EnhancedDependencyGraph) -> fmt::Result {
    if graph.security_issues.is_empty() {
        writeln!(out, "{}\n", "✓ No known security issues".green().bold())?;
        return Ok(());
    }
    writeln!(
        out,
        "{}",
        format!("⚠ Security Issues ({}):", graph.security_issues.len()).red().bold()
    )?;
    for node in graph.enhanced_nodes.values() {
        for issue in &node.security_issues {
            writeln!(
                out,
                "  • {} [{}] {}: {}",
                issue.id,
                issue.severity,
                node.name(),
                issue.description
            )?;
            if !issue.fixed_in.is_empty() {
                writeln!(out, "    Fixed in: {}", issue.fixed_in)?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn write_licenses(out: &mut String, graph: &EnhancedDependencyGraph) -> fmt::Result {
    writeln!(out, "{}", "License Summary:".blue().bold())?;
    for (license, count) in &graph.licenses_summary {
        writeln!(out, "  • {}: {} packages", license, count)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_recommendations(out: &mut String, graph: &EnhancedDependencyGraph) -> fmt::Result {
    writeln!(out, "{}", "Recommendations:".yellow().bold())?;
    if !graph.conflicts.is_empty() {
        writeln!(out, "  • Review and resolve version conflicts")?;
    }
    if !graph.security_issues.is_empty() {
        writeln!(out, "  • Update packages with security vulnerabilities")?;
    }
    if let Some(unknown) = graph.licenses_summary.get(UNKNOWN_LICENSE).filter(|n| **n > 0) {
        writeln!(out, "  • Review licenses for {} unknown packages", unknown)?;
    }
    writeln!(out, "  • Consider running 'go mod tidy' to clean up dependencies")?;
    writeln!(out, "  • Use 'modviz doctor' for detailed package health analysis")?;
    Ok(())
}

fn write_outdated(out: &mut String, graph: &EnhancedDependencyGraph) -> fmt::Result {
    let outdated: Vec<_> = graph.enhanced_nodes.values().filter(|n| n.is_outdated).collect();
    if outdated.is_empty() {
        writeln!(out, "{}", "✓ No outdated packages".green().bold())?;
        return Ok(());
    }

    writeln!(
        out,
        "{}\n",
        format!("Outdated Packages ({}):", outdated.len()).yellow().bold()
    )?;
    let mut t = table(&["Name", "Version", "Direct", "Last update", "Available"]);
    for node in outdated {
        t.add_row(vec![
            Cell::new(node.name()),
            Cell::new(node.version()),
            Cell::new(if node.is_direct() { "yes" } else { "no" }),
            Cell::new(
                node.last_update
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(node.update_available.as_deref().unwrap_or("-")),
        ]);
    }
    writeln!(out, "{}", t)?;
    Ok(())
}
