use std::collections::BTreeMap;
use std::fmt::{self, Write};

use anyhow::Result;
use colored::*;
use comfy_table::{Cell, CellAlignment, Color};
use serde::Serialize;

use super::table;
use crate::config::{license_verdict, Config};
use crate::graph::EnhancedDependencyGraph;
use crate::license::classifier::classify;
use crate::models::{LicenseRisk, PolicyVerdict};

#[derive(Debug, Serialize)]
pub struct LicenseReport {
    pub module: String,
    pub dependencies_analyzed: usize,
    /// Most used license first.
    pub licenses: Vec<LicenseUsage>,
}

#[derive(Debug, Serialize)]
pub struct LicenseUsage {
    pub license: String,
    pub count: usize,
    pub risk: LicenseRisk,
    pub verdict: PolicyVerdict,
    pub packages: Vec<String>,
}

impl LicenseReport {
    /// Build from a graph whose license pass has run.
    pub fn from_graph(graph: &EnhancedDependencyGraph, config: &Config) -> Self {
        let mut packages: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for node in graph.enhanced_nodes.values() {
            packages
                .entry(node.license_or_unknown())
                .or_default()
                .push(node.name().to_string());
        }

        let mut licenses: Vec<LicenseUsage> = graph
            .licenses_summary
            .iter()
            .map(|(license, count)| LicenseUsage {
                license: license.clone(),
                count: *count,
                risk: classify(license),
                verdict: license_verdict(config, license),
                packages: packages.remove(license.as_str()).unwrap_or_default(),
            })
            .collect();
        licenses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.license.cmp(&b.license)));

        Self {
            module: graph.module_name().to_string(),
            dependencies_analyzed: graph.graph.all_nodes.len().saturating_sub(1),
            licenses,
        }
    }

    pub fn count_by_verdict(&self, verdict: &PolicyVerdict) -> usize {
        self.licenses
            .iter()
            .filter(|l| &l.verdict == verdict)
            .map(|l| l.count)
            .sum()
    }

    fn has_risk(&self, pred: impl Fn(&LicenseRisk) -> bool) -> bool {
        self.licenses.iter().any(|l| pred(&l.risk))
    }
}

fn verdict_colored(text: &str, verdict: &PolicyVerdict) -> ColoredString {
    match verdict {
        PolicyVerdict::Pass => text.green(),
        PolicyVerdict::Warn => text.yellow(),
        PolicyVerdict::Error => text.red(),
    }
}

pub fn render(report: &LicenseReport, compatibility: bool) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{}", "License Analysis Report".blue().bold())?;
    writeln!(out, "{}\n", "=======================".blue().bold())?;
    writeln!(out, "Module: {}", report.module)?;
    writeln!(out, "Dependencies analyzed: {}\n", report.dependencies_analyzed)?;

    writeln!(out, "{}", "License Summary:".blue().bold())?;
    for usage in &report.licenses {
        let line = format!("  • {}: {} packages", usage.license, usage.count);
        writeln!(out, "{}", verdict_colored(&line, &usage.verdict))?;
    }
    writeln!(out)?;

    if compatibility {
        write_compatibility(&mut out, report)?;
    }

    writeln!(out, "{}", "Detailed License Breakdown:".blue().bold())?;
    let mut by_name: Vec<&LicenseUsage> = report.licenses.iter().collect();
    by_name.sort_by(|a, b| a.license.cmp(&b.license));
    for usage in by_name {
        let heading = format!("{} ({} packages):", usage.license, usage.packages.len());
        writeln!(out, "\n{}", verdict_colored(&heading, &usage.verdict).bold())?;
        for package in &usage.packages {
            writeln!(out, "  • {}", package)?;
        }
    }
    writeln!(out)?;

    write_recommendations(&mut out, report)?;
    Ok(out)
}

fn write_compatibility(out: &mut String, report: &LicenseReport) -> fmt::Result {
    writeln!(out, "{}", "License Compatibility Analysis:".blue().bold())?;

    let mut t = table(&["License", "Packages", "Risk", "Verdict"]);
    for usage in &report.licenses {
        let (verdict_str, verdict_color) = match usage.verdict {
            PolicyVerdict::Pass => ("✓ pass", Color::Green),
            PolicyVerdict::Warn => ("⚠ warn", Color::Yellow),
            PolicyVerdict::Error => ("✗ error", Color::Red),
        };
        let risk_color = match usage.risk {
            LicenseRisk::Permissive => Color::Green,
            LicenseRisk::WeakCopyleft => Color::Yellow,
            LicenseRisk::StrongCopyleft => Color::Red,
            LicenseRisk::Proprietary => Color::Magenta,
            LicenseRisk::Unknown => Color::DarkGrey,
        };
        t.add_row(vec![
            Cell::new(&usage.license),
            Cell::new(usage.count).set_alignment(CellAlignment::Right),
            Cell::new(usage.risk.to_string()).fg(risk_color),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }
    writeln!(out, "{}", t)?;

    writeln!(
        out,
        "  Pass: {}  Warn: {}  Error: {}",
        report.count_by_verdict(&PolicyVerdict::Pass).to_string().green(),
        report.count_by_verdict(&PolicyVerdict::Warn).to_string().yellow(),
        report.count_by_verdict(&PolicyVerdict::Error).to_string().red(),
    )?;

    let copyleft = report.has_risk(|r| {
        matches!(r, LicenseRisk::WeakCopyleft | LicenseRisk::StrongCopyleft)
    });
    let unknown = report.has_risk(|r| matches!(r, LicenseRisk::Unknown));
    let proprietary = report.has_risk(|r| matches!(r, LicenseRisk::Proprietary));

    if copyleft {
        writeln!(out, "  {}", "⚠ Copyleft licenses detected".yellow().bold())?;
        writeln!(out, "     • May require source code disclosure")?;
        writeln!(out, "     • Review compatibility with your project license")?;
    }
    if proprietary {
        writeln!(out, "  {}", "✗ Proprietary licenses detected".red().bold())?;
        writeln!(out, "     • Check redistribution terms before shipping")?;
    }
    if unknown {
        writeln!(out, "  {}", "✗ Unknown licenses detected".red().bold())?;
        writeln!(out, "     • Manual license review required")?;
        writeln!(out, "     • Risk of license compliance issues")?;
    }
    if !copyleft && !unknown && !proprietary {
        writeln!(
            out,
            "  {}",
            "✓ No obvious license compatibility issues".green().bold()
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_recommendations(out: &mut String, report: &LicenseReport) -> fmt::Result {
    writeln!(out, "{}", "Recommendations:".yellow().bold())?;
    if report.has_risk(|r| matches!(r, LicenseRisk::Unknown)) {
        writeln!(out, "  • Manually review packages with unknown licenses")?;
        writeln!(out, "  • Add confirmed licenses to [licenses.known] in .modviz/config.toml")?;
    }
    if report.has_risk(|r| matches!(r, LicenseRisk::WeakCopyleft | LicenseRisk::StrongCopyleft)) {
        writeln!(out, "  • Review GPL/LGPL license implications for your project")?;
        writeln!(out, "  • Consult legal team if distributing commercial software")?;
    }
    writeln!(out, "  • Document license compliance in your project")?;
    writeln!(out, "  • Set up automated license scanning in CI/CD")?;
    Ok(())
}
