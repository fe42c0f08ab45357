//! One module per subcommand. Each loads the project, runs the analysis
//! passes it needs exactly once, renders, and reports an [`Outcome`].

use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::cli::{Cli, Command, ReportFormat};
use crate::config::{load_config, Config};
use crate::graph::analysis::{AnalysisPlan, Analyzers};
use crate::graph::EnhancedDependencyGraph;
use crate::project::{resolve_path, Project};
use crate::report::{self, DocumentFormat};

pub mod analyze;
pub mod doctor;
pub mod generate;
pub mod licenses;
pub mod security;

/// How the process should exit after a command completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The command ran, but its findings should fail the build.
    Failure,
}

/// Settings shared by every command for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub config_override: Option<PathBuf>,
    pub quiet: bool,
    /// Terminal color is enabled for this run (no `--no-color`).
    pub color: bool,
    /// Reference time for release ages and report timestamps.
    pub now: DateTime<Utc>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config_override: cli.config.clone(),
            quiet: cli.quiet,
            color: !cli.no_color,
            now: Utc::now(),
        }
    }

    /// Progress line on stderr, unless `--quiet`.
    pub fn status(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("  {} {}", "→".cyan(), message);
        }
    }

    /// Render a text report. Text bound for a file carries no ANSI escapes;
    /// terminal color is restored once it is rendered.
    pub fn render_text(
        &self,
        output: Option<&Path>,
        render: impl FnOnce() -> Result<String>,
    ) -> Result<String> {
        if output.is_none() {
            return render();
        }
        colored::control::set_override(false);
        let text = render();
        if self.color {
            colored::control::unset_override();
        }
        text
    }

    /// Write rendered output and report where it went.
    pub fn write(&self, content: &str, output: Option<&Path>, what: &str) -> Result<()> {
        if report::emit(content, output)? {
            if let Some(path) = output {
                self.status(format!("{} written to {}", what, path.display()));
            }
        }
        Ok(())
    }
}

/// A loaded and analyzed project.
pub struct Session {
    pub project_path: PathBuf,
    pub config: Config,
    pub graph: EnhancedDependencyGraph,
}

/// Load config and project inputs, build the graph and run `plan` over it.
pub fn open(path: &Path, ctx: &Context, banner: &str, plan: AnalysisPlan) -> Result<Session> {
    let project_path = resolve_path(path);
    let config = load_config(&project_path, ctx.config_override.as_deref())?;

    ctx.status(format!("{} {}", banner, project_path.display()));
    let project = Project::load(&project_path)?;
    let graph = plan.apply(project.into_graph(), &Analyzers::from_config(&config), ctx.now);

    Ok(Session {
        project_path,
        config,
        graph,
    })
}

/// Document format for a report, or `None` for the text report.
pub(crate) fn document_format(format: ReportFormat) -> Option<DocumentFormat> {
    match format {
        ReportFormat::Json => Some(DocumentFormat::Json),
        ReportFormat::Yaml => Some(DocumentFormat::Yaml),
        ReportFormat::Text => None,
    }
}

pub fn run(cli: &Cli) -> Result<Outcome> {
    let ctx = Context::from_cli(cli);
    match &cli.command {
        Command::Generate(args) => generate::run(args, &ctx),
        Command::Analyze(args) => analyze::run(args, &ctx),
        Command::Doctor(args) => doctor::run(args, &ctx),
        Command::Licenses(args) => licenses::run(args, &ctx),
        Command::Security(args) => security::run(args, &ctx),
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{ctx, project};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_runs_plan() {
        let dir = project();
        let session = open(dir.path(), &ctx(), "Parsing", AnalysisPlan::full()).unwrap();
        assert_eq!(session.graph.module_name(), "example.com/service");
        assert_eq!(session.graph.conflicts.len(), 1);
        assert_eq!(session.graph.security_issues.len(), 1);
        assert!(session.project_path.is_absolute());
    }

    #[test]
    fn test_open_without_go_mod() {
        let dir = TempDir::new().unwrap();
        let err = open(dir.path(), &ctx(), "Parsing", AnalysisPlan::full())
            .err()
            .unwrap();
        assert!(err.to_string().contains("go.mod file not found"));
    }

    #[test]
    fn test_document_format() {
        assert_eq!(document_format(ReportFormat::Json), Some(DocumentFormat::Json));
        assert_eq!(document_format(ReportFormat::Yaml), Some(DocumentFormat::Yaml));
        assert_eq!(document_format(ReportFormat::Text), None);
    }

    #[test]
    fn test_text_for_file_is_plain() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let text = ctx()
            .render_text(Some(&path), || Ok(format!("{}", "FAILED".red().bold())))
            .unwrap();
        assert_eq!(text, "FAILED");
    }

    #[test]
    fn test_open_uses_project_config() {
        let dir = project();
        std::fs::create_dir(dir.path().join(".modviz")).unwrap();
        std::fs::write(
            dir.path().join(".modviz").join("config.toml"),
            "[licenses.known]\n\"github.com/gin-gonic/gin\" = \"MIT\"\n",
        )
        .unwrap();

        let session = open(dir.path(), &ctx(), "Parsing", AnalysisPlan::licenses_only()).unwrap();
        assert_eq!(session.graph.licenses_summary["MIT"], 2);
    }
}
