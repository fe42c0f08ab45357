use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{open, Context, Outcome};
use crate::cli::{GenerateArgs, GraphFormat};
use crate::graph::analysis::AnalysisPlan;
use crate::report::structured::DependencyReport;
use crate::report::{diagram, dot, to_document, tree, DocumentFormat};

pub fn run(args: &GenerateArgs, ctx: &Context) -> Result<Outcome> {
    let session = open(&args.path, ctx, "Parsing go.mod from", AnalysisPlan::annotations())?;
    let graph = &session.graph;
    let output: Option<PathBuf> = args
        .output
        .clone()
        .or_else(|| args.format.default_output().map(PathBuf::from));
    let output = output.as_deref();

    match args.format {
        GraphFormat::Tree | GraphFormat::Ascii => {
            ctx.write(&tree::render_tree(&graph.graph)?, output, "Dependency tree")?;
        }
        GraphFormat::Compact => {
            ctx.write(&tree::render_compact(&graph.graph)?, output, "Dependency listing")?;
        }
        GraphFormat::Dot => {
            ctx.write(&dot::render_dot(graph)?, output, "DOT file")?;
            if let Some(path) = output {
                ctx.status(format!(
                    "To visualize: dot -Tpng {} -o depgraph.png",
                    path.display()
                ));
            }
        }
        GraphFormat::Png => {
            let path = output.context("no output path for PNG")?;
            diagram::write_png(graph, path)?;
            ctx.status(format!("PNG diagram written to {}", path.display()));
        }
        GraphFormat::Svg => {
            let path = output.context("no output path for SVG")?;
            diagram::write_svg(graph, path)?;
            ctx.status(format!("SVG diagram written to {}", path.display()));
        }
        GraphFormat::Json | GraphFormat::Yaml => {
            let format = if args.format == GraphFormat::Json {
                DocumentFormat::Json
            } else {
                DocumentFormat::Yaml
            };
            let report = DependencyReport::new(graph, &session.project_path, ctx.now);
            ctx.write(&to_document(&report, format)?, output, "Dependency report")?;
        }
    }

    Ok(Outcome::Success)
}
