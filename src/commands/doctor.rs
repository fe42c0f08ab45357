use anyhow::Result;

use super::{document_format, open, Context, Outcome};
use crate::cli::DoctorArgs;
use crate::graph::analysis::AnalysisPlan;
use crate::health::HealthReport;
use crate::report::{health, to_document};

pub fn run(args: &DoctorArgs, ctx: &Context) -> Result<Outcome> {
    let report_args = &args.report;
    let session = open(
        &report_args.path,
        ctx,
        "Checking dependency health for",
        AnalysisPlan::health_only(),
    )?;
    let output = report_args.output.as_deref();
    let report = HealthReport::from_graph(&session.graph, ctx.now);

    let content = match document_format(report_args.format) {
        None => ctx.render_text(output, || health::render(&report, args.summary_only))?,
        Some(format) => to_document(&report, format)?,
    };

    ctx.write(&content, output, "Health report")?;
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ReportArgs, ReportFormat};
    use crate::commands::testutil::{ctx, out, project};
    use tempfile::TempDir;

    fn args(dir: &TempDir, format: ReportFormat, summary_only: bool) -> DoctorArgs {
        DoctorArgs {
            report: ReportArgs {
                path: dir.path().to_path_buf(),
                format,
                output: Some(out(dir, "health.out")),
            },
            summary_only,
        }
    }

    #[test]
    fn test_text_report() {
        let dir = project();
        run(&args(&dir, ReportFormat::Text, false), &ctx()).unwrap();
        let text = std::fs::read_to_string(out(&dir, "health.out")).unwrap();
        assert!(text.contains("Overall Health Score: 75.0/100 (Good)"));
        assert!(text.contains("Outdated packages (3-12 months):"));
    }

    #[test]
    fn test_summary_only() {
        let dir = project();
        run(&args(&dir, ReportFormat::Text, true), &ctx()).unwrap();
        let text = std::fs::read_to_string(out(&dir, "health.out")).unwrap();
        assert!(!text.contains("Package Details:"));
    }

    #[test]
    fn test_json_document() {
        let dir = project();
        run(&args(&dir, ReportFormat::Json, false), &ctx()).unwrap();
        let text = std::fs::read_to_string(out(&dir, "health.out")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["dependencies_analyzed"], 4);
        assert_eq!(value["outdated"], 2);
        assert_eq!(value["grade"], "Good");
        assert_eq!(value["packages"].as_array().unwrap().len(), 4);
    }
}
