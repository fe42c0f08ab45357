//! `modviz`: analyze and visualize the dependencies of a Go module.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging ([`logging`]).
//! 2. Load config ([`config::load_config`]) and the module's `go.mod` and
//!    `go.sum` ([`project`], [`parser`]).
//! 3. Build the dependency graph and merge the lock entries ([`graph`]).
//! 4. Run the analysis passes the command needs: conflicts, licenses
//!    ([`license`]), security heuristics ([`security`]), health ([`health`]).
//! 5. Render the requested view ([`report`]).
//! 6. Exit `0`, or `1` on error or when `security` finds a failing issue.

mod cli;
mod commands;
mod config;
mod error;
mod graph;
mod health;
mod license;
mod logging;
mod models;
mod parser;
mod project;
mod report;
mod security;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use commands::Outcome;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.log_json)?;

    if commands::run(&cli)? == Outcome::Failure {
        std::process::exit(1);
    }

    Ok(())
}
