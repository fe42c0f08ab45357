use anyhow::Result;

use super::{document_format, open, Context, Outcome};
use crate::cli::LicensesArgs;
use crate::graph::analysis::AnalysisPlan;
use crate::report::licenses::{self, LicenseReport};
use crate::report::to_document;

/// License findings are advisory; the command never fails on them.
pub fn run(args: &LicensesArgs, ctx: &Context) -> Result<Outcome> {
    let report_args = &args.report;
    let session = open(
        &report_args.path,
        ctx,
        "Analyzing licenses for",
        AnalysisPlan::licenses_only(),
    )?;
    let output = report_args.output.as_deref();
    let report = LicenseReport::from_graph(&session.graph, &session.config);

    let content = match document_format(report_args.format) {
        None => ctx.render_text(output, || licenses::render(&report, !args.no_compat))?,
        Some(format) => to_document(&report, format)?,
    };

    ctx.write(&content, output, "License report")?;
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ReportArgs, ReportFormat};
    use crate::commands::testutil::{ctx, out, project};
    use tempfile::TempDir;

    fn args(dir: &TempDir, format: ReportFormat, no_compat: bool) -> LicensesArgs {
        LicensesArgs {
            report: ReportArgs {
                path: dir.path().to_path_buf(),
                format,
                output: Some(out(dir, "licenses.out")),
            },
            no_compat,
        }
    }

    #[test]
    fn test_unknown_license_does_not_fail() {
        let dir = project();
        let outcome = run(&args(&dir, ReportFormat::Text, false), &ctx()).unwrap();
        assert_eq!(outcome, Outcome::Success);

        let text = std::fs::read_to_string(out(&dir, "licenses.out")).unwrap();
        assert!(text.contains("Dependencies analyzed: 4"));
        assert!(text.contains("✗ Unknown licenses detected"));
    }

    #[test]
    fn test_no_compat_skips_table() {
        let dir = project();
        run(&args(&dir, ReportFormat::Text, true), &ctx()).unwrap();
        let text = std::fs::read_to_string(out(&dir, "licenses.out")).unwrap();
        assert!(!text.contains("License Compatibility Analysis:"));
        assert!(text.contains("Detailed License Breakdown:"));
    }

    #[test]
    fn test_yaml_document() {
        let dir = project();
        run(&args(&dir, ReportFormat::Yaml, false), &ctx()).unwrap();
        let text = std::fs::read_to_string(out(&dir, "licenses.out")).unwrap();
        assert!(text.contains("module: example.com/service"));
        assert!(text.contains("license: Apache-2.0"));
    }
}
