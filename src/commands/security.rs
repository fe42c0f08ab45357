use anyhow::Result;
use tracing::warn;

use super::{document_format, open, Context, Outcome};
use crate::cli::SecurityArgs;
use crate::graph::analysis::AnalysisPlan;
use crate::report::security::{self, SecurityReport};
use crate::report::to_document;

/// Fails when the graph holds an issue at one of the configured `fail_on`
/// severities. `--severity` narrows what is shown, never what fails.
pub fn run(args: &SecurityArgs, ctx: &Context) -> Result<Outcome> {
    let report_args = &args.report;
    let session = open(
        &report_args.path,
        ctx,
        "Scanning for security issues in",
        AnalysisPlan::security_only(),
    )?;
    let output = report_args.output.as_deref();
    let fail_on = &session.config.security.fail_on;
    let report = SecurityReport::from_graph(&session.graph, args.severity.map(Into::into));

    let content = match document_format(report_args.format) {
        None => ctx.render_text(output, || security::render(&report, fail_on))?,
        Some(format) => to_document(&report, format)?,
    };
    ctx.write(&content, output, "Security report")?;

    if report.fails(fail_on) {
        warn!(issues = report.issues.len(), "security scan failed");
        return Ok(Outcome::Failure);
    }
    Ok(Outcome::Success)
}
