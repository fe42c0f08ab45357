use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::models::Severity;

#[derive(Parser, Debug)]
#[command(
    name = "modviz",
    about = "Analyze and visualize Go module dependencies",
    version
)]
pub struct Cli {
    /// Config file [default: ./.modviz/config.toml, fallback ~/.config/modviz/config.toml]
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress progress lines on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the dependency graph as a tree, DOT, image or document
    Generate(GenerateArgs),
    /// Report version conflicts, security issues and license summary
    Analyze(AnalyzeArgs),
    /// Assess dependency health and suggest updates
    Doctor(DoctorArgs),
    /// Classify dependency licenses and check them against policy
    Licenses(LicensesArgs),
    /// Scan dependencies with the security heuristics
    Security(SecurityArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Go module directory (must contain go.mod)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "tree", value_name = "FORMAT")]
    pub format: GraphFormat,

    /// Output file [default: stdout for text formats, depgraph.<ext> for dot/png/svg]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Options shared by the report commands.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Go module directory (must contain go.mod)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    pub format: ReportFormat,

    /// Output file [default: stdout]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Show only version conflicts
    #[arg(long, conflicts_with = "outdated")]
    pub conflicts: bool,

    /// Show only outdated packages
    #[arg(long)]
    pub outdated: bool,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Print the overview and score without per-package details
    #[arg(long)]
    pub summary_only: bool,
}

#[derive(Args, Debug)]
pub struct LicensesArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Skip the license compatibility analysis
    #[arg(long)]
    pub no_compat: bool,
}

#[derive(Args, Debug)]
pub struct SecurityArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Only report issues of this severity
    #[arg(short, long, value_name = "SEVERITY")]
    pub severity: Option<SeverityArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GraphFormat {
    Tree,
    Ascii,
    Compact,
    Dot,
    Png,
    Svg,
    Json,
    Yaml,
}

impl GraphFormat {
    /// File written when `--output` is not given; `None` means stdout.
    pub fn default_output(self) -> Option<&'static str> {
        match self {
            GraphFormat::Dot => Some("depgraph.dot"),
            GraphFormat::Png => Some("depgraph.png"),
            GraphFormat::Svg => Some("depgraph.svg"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[value(alias = "console")]
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum SeverityArg {
    #[value(alias = "critical")]
    Critical,
    #[value(alias = "high")]
    High,
    #[value(alias = "medium")]
    Medium,
    #[value(alias = "low")]
    Low,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Critical => Severity::Critical,
            SeverityArg::High => Severity::High,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::Low => Severity::Low,
        }
    }
}
