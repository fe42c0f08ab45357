use anyhow::Result;

use super::{document_format, open, Context, Outcome};
use crate::cli::AnalyzeArgs;
use crate::graph::analysis::AnalysisPlan;
use crate::report::analysis::{self, AnalysisView};
use crate::report::structured::{DependencyInfo, DependencyReport};
use crate::report::to_document;

pub fn run(args: &AnalyzeArgs, ctx: &Context) -> Result<Outcome> {
    let report_args = &args.report;
    let session = open(&report_args.path, ctx, "Analyzing", AnalysisPlan::full())?;
    let graph = &session.graph;
    let output = report_args.output.as_deref();

    let view = if args.conflicts {
        AnalysisView::ConflictsOnly
    } else if args.outdated {
        AnalysisView::OutdatedOnly
    } else {
        AnalysisView::Full
    };

    let content = match document_format(report_args.format) {
        None => ctx.render_text(output, || analysis::render(graph, view))?,
        Some(format) => match view {
            AnalysisView::ConflictsOnly => to_document(&graph.conflicts, format)?,
            AnalysisView::OutdatedOnly => {
                let outdated: Vec<DependencyInfo> = graph
                    .enhanced_nodes
                    .values()
                    .filter(|node| node.is_outdated)
                    .map(DependencyInfo::from)
                    .collect();
                to_document(&outdated, format)?
            }
            AnalysisView::Full => {
                let report = DependencyReport::new(graph, &session.project_path, ctx.now);
                to_document(&report, format)?
            }
        },
    };

    ctx.write(&content, output, "Analysis report")?;
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ReportArgs, ReportFormat};
    use crate::commands::testutil::{ctx, out, project};
    use tempfile::TempDir;

    fn args(dir: &TempDir, format: ReportFormat, conflicts: bool, outdated: bool) -> AnalyzeArgs {
        AnalyzeArgs {
            report: ReportArgs {
                path: dir.path().to_path_buf(),
                format,
                output: Some(out(dir, "analysis.out")),
            },
            conflicts,
            outdated,
        }
    }

    fn written(dir: &TempDir) -> String {
        std::fs::read_to_string(out(dir, "analysis.out")).unwrap()
    }

    #[test]
    fn test_full_text_report() {
        let dir = project();
        let outcome = run(&args(&dir, ReportFormat::Text, false, false), &ctx()).unwrap();
        assert_eq!(outcome, Outcome::Success);

        let text = written(&dir);
        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("Module: example.com/service"));
        assert!(text.contains("Total Dependencies: 4"));
        assert!(text.contains("golang.org/x/sys"));
    }

    #[test]
    fn test_conflicts_document() {
        let dir = project();
        run(&args(&dir, ReportFormat::Json, true, false), &ctx()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written(&dir)).unwrap();
        let conflicts = value.as_array().unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0]["module_path"], "golang.org/x/sys");
    }

    #[test]
    fn test_outdated_document() {
        let dir = project();
        run(&args(&dir, ReportFormat::Json, false, true), &ctx()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written(&dir)).unwrap();
        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["github.com/mattn/go-isatty", "golang.org/x/sys"]);
    }

    #[test]
    fn test_full_yaml_document() {
        let dir = project();
        run(&args(&dir, ReportFormat::Yaml, false, false), &ctx()).unwrap();
        let text = written(&dir);
        assert!(text.contains("security_issues:"));
        assert!(text.contains("tool: modviz"));
    }
}
