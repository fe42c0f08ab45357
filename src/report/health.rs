use std::fmt::{self, Write};

use anyhow::Result;
use colored::*;

use crate::health::{HealthReport, HealthStatus, PackageHealth};

pub fn render(report: &HealthReport, summary_only: bool) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{}", "Dependency Health Report".blue().bold())?;
    writeln!(out, "{}\n", "========================".blue().bold())?;
    writeln!(out, "Module: {}", report.module)?;
    writeln!(out, "Dependencies analyzed: {}\n", report.dependencies_analyzed)?;

    writeln!(out, "{}", "Health Overview:".blue().bold())?;
    writeln!(
        out,
        "  {}",
        format!("✓ Well-maintained: {} packages", report.well_maintained).green()
    )?;
    writeln!(
        out,
        "  {}",
        format!("⚠ Outdated: {} packages", report.outdated).yellow()
    )?;
    writeln!(out, "  {}\n", format!("✗ Stale: {} packages", report.stale).red())?;

    let score = format!("{:.1}/100 ({})", report.score, report.grade);
    let score = if report.score >= 80.0 {
        score.green().bold()
    } else if report.score >= 60.0 {
        score.yellow().bold()
    } else {
        score.red().bold()
    };
    writeln!(out, "{} {}\n", "Overall Health Score:".blue().bold(), score)?;

    if !summary_only && (report.outdated > 0 || report.stale > 0) {
        writeln!(out, "{}", "Package Details:".blue().bold())?;
        write_packages(
            &mut out,
            &"Outdated packages (3-12 months):".yellow().bold(),
            report.with_status(HealthStatus::Outdated),
        )?;
        write_packages(
            &mut out,
            &"Stale packages (>1 year):".red().bold(),
            report.with_status(HealthStatus::Stale),
        )?;
        writeln!(out)?;
    }

    write_recommendations(&mut out, report)?;
    Ok(out)
}

fn write_packages<'a>(
    out: &mut String,
    heading: &ColoredString,
    packages: impl Iterator<Item = &'a PackageHealth>,
) -> fmt::Result {
    let packages: Vec<_> = packages.collect();
    if packages.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{}", heading)?;
    for p in packages {
        writeln!(
            out,
            "  • {} ({}) - last updated {} days ago",
            p.name, p.version, p.days_since_update
        )?;
        if let Some(available) = &p.update_available {
            writeln!(out, "    Available: {}", available)?;
        }
    }
    Ok(())
}

fn write_recommendations(out: &mut String, report: &HealthReport) -> fmt::Result {
    writeln!(out, "{}", "Update Recommendations:".yellow().bold())?;
    if report.stale > 0 {
        writeln!(out, "  ✗ URGENT: Review {} stale packages", report.stale)?;
        writeln!(out, "     • Consider finding alternative packages")?;
        writeln!(out, "     • Check if packages are still maintained")?;
    }
    if report.outdated > 0 {
        writeln!(out, "  ⚠ Update {} outdated packages", report.outdated)?;
        writeln!(out, "     • Run 'go get -u' to update to latest versions")?;
        writeln!(out, "     • Test updates in development environment")?;
    }
    writeln!(out, "  • Use 'go mod tidy' to clean up unused dependencies")?;
    writeln!(out, "  • Set up dependency update automation (e.g., Dependabot)")?;
    if report.score < 60.0 {
        writeln!(out, "  • Consider a dependency cleanup project")?;
    }

    if report.outdated > 0 || report.stale > 0 {
        writeln!(out, "\n{}", "Suggested Commands:".blue().bold())?;
        writeln!(out, "  # Check for available updates:")?;
        writeln!(out, "  go list -u -m all\n")?;
        writeln!(out, "  # Update all dependencies:")?;
        writeln!(out, "  go get -u ./...")?;
    }
    Ok(())
}
