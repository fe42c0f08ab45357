use std::collections::BTreeMap;
use std::fmt::{self, Write};

use anyhow::Result;

use crate::graph::{DependencyGraph, Node};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";

/// Indented tree: the root with its direct requirements, then a flat list of
/// indirect ones. Both lists are sorted by module path.
pub fn render_tree(graph: &DependencyGraph) -> Result<String> {
    let mut out = String::new();
    let (direct_count, indirect_count) = graph.dependency_count();

    writeln!(out, "Dependency Graph for: {}", graph.module_name)?;
    if let Some(go) = &graph.module_go_version {
        writeln!(out, "Go Version: {}", go)?;
    }
    writeln!(
        out,
        "Dependencies: {} direct, {} indirect\n",
        direct_count, indirect_count
    )?;
    writeln!(out, "{} ({})", graph.root.name, graph.root.version)?;

    let mut direct = graph.direct_dependencies();
    direct.sort_by(|a, b| a.name.cmp(&b.name));
    if direct.is_empty() {
        writeln!(out, "{}(no dependencies)", LAST_BRANCH)?;
    }
    write_branches(&mut out, &direct)?;

    let indirect = indirect_nodes(graph);
    if !indirect.is_empty() {
        writeln!(out, "\nIndirect dependencies ({}):", indirect.len())?;
        write_branches(&mut out, &indirect)?;
    }

    Ok(out)
}

fn write_branches(out: &mut String, nodes: &[&Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        let connector = if i + 1 == nodes.len() { LAST_BRANCH } else { BRANCH };
        writeln!(out, "{}{} ({})", connector, node.name, node.version)?;
    }
    Ok(())
}

/// Bulleted listing with indirect requirements grouped by their first two
/// path segments (`github.com/org`, `golang.org/x`).
pub fn render_compact(graph: &DependencyGraph) -> Result<String> {
    let mut out = String::new();
    let (direct_count, indirect_count) = graph.dependency_count();

    writeln!(out, "Module: {}", graph.module_name)?;
    writeln!(
        out,
        "Dependencies: {} direct, {} indirect\n",
        direct_count, indirect_count
    )?;

    let mut direct = graph.direct_dependencies();
    direct.sort_by(|a, b| a.name.cmp(&b.name));
    if !direct.is_empty() {
        writeln!(out, "Direct dependencies:")?;
        for node in &direct {
            writeln!(out, "  • {} ({})", node.name, node.version)?;
        }
        writeln!(out)?;
    }

    let indirect = indirect_nodes(graph);
    if !indirect.is_empty() {
        writeln!(out, "Indirect dependencies:")?;
        for (group, nodes) in group_by_owner(&indirect) {
            match nodes.as_slice() {
                [only] => {
                    writeln!(out, "  • {} ({})", only.name, only.version)?;
                }
                _ => {
                    writeln!(out, "  • {}/... ({} packages)", group, nodes.len())?;
                    for node in nodes {
                        writeln!(out, "    - {} ({})", node.name, node.version)?;
                    }
                }
            }
        }
    }

    Ok(out)
}

fn indirect_nodes(graph: &DependencyGraph) -> Vec<&Node> {
    graph.dependencies().filter(|n| !n.direct).collect()
}

fn owner(module_path: &str) -> &str {
    match module_path.match_indices('/').nth(1) {
        Some((pos, _)) => &module_path[..pos],
        None => module_path,
    }
}

fn group_by_owner<'a>(nodes: &[&'a Node]) -> BTreeMap<&'a str, Vec<&'a Node>> {
    let mut groups: BTreeMap<&str, Vec<&Node>> = BTreeMap::new();
    for &node in nodes {
        groups.entry(owner(&node.name)).or_default().push(node);
    }
    groups
}
