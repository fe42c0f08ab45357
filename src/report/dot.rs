use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use anyhow::{Context, Result};
use regex::Regex;

use crate::graph::{EnhancedDependencyGraph, EnhancedNode};

/// Fill category of a node, shared by the DOT and image renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFill {
    Root,
    Direct,
    Indirect,
    DirectWithIssues,
    IndirectWithIssues,
}

impl NodeFill {
    pub fn of(node: &EnhancedNode) -> Self {
        match (node.is_direct(), node.security_issues.is_empty()) {
            (true, true) => NodeFill::Direct,
            (false, true) => NodeFill::Indirect,
            (true, false) => NodeFill::DirectWithIssues,
            (false, false) => NodeFill::IndirectWithIssues,
        }
    }

    /// Graphviz color name.
    pub fn color_name(self) -> &'static str {
        match self {
            NodeFill::Root => "lightblue",
            NodeFill::Direct => "lightgreen",
            NodeFill::Indirect => "lightgray",
            NodeFill::DirectWithIssues => "red",
            NodeFill::IndirectWithIssues => "orange",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            NodeFill::Root => (173, 216, 230),
            NodeFill::Direct => (144, 238, 144),
            NodeFill::Indirect => (211, 211, 211),
            NodeFill::DirectWithIssues => (255, 0, 0),
            NodeFill::IndirectWithIssues => (255, 165, 0),
        }
    }
}

pub const LEGEND: &[(&str, NodeFill)] = &[
    ("Main Module", NodeFill::Root),
    ("Direct Dependency", NodeFill::Direct),
    ("Indirect Dependency", NodeFill::Indirect),
    ("Security Issue", NodeFill::DirectWithIssues),
];

pub const SECURITY_MARK: &str = "⚠ Security Issues";
pub const CONFLICT_MARK: &str = "⚡ Version Conflicts";

/// Label lines for a dependency: path, version, then license and issue
/// marks when the passes produced them.
pub fn label_lines(node: &EnhancedNode) -> Vec<String> {
    let mut lines = vec![node.name().to_string(), node.version().to_string()];
    if let Some(license) = node.license.as_deref().filter(|l| !l.is_empty()) {
        lines.push(license.to_string());
    }
    if !node.security_issues.is_empty() {
        lines.push(SECURITY_MARK.to_string());
    }
    if !node.conflicts.is_empty() {
        lines.push(CONFLICT_MARK.to_string());
    }
    lines
}

/// Assigns each module path a readable DOT identifier. Characters outside
/// `[A-Za-z0-9_]` become `_`; paths that collapse onto an existing ID get a
/// numeric suffix.
struct NodeIds {
    invalid: Regex,
    used: HashSet<String>,
}

impl NodeIds {
    fn new() -> Result<Self> {
        Ok(Self {
            invalid: Regex::new(r"[^A-Za-z0-9_]").context("invalid node id pattern")?,
            used: HashSet::new(),
        })
    }

    fn assign(&mut self, name: &str) -> String {
        let base = self.invalid.replace_all(name, "_").into_owned();
        let mut id = base.clone();
        let mut n = 2;
        while !self.used.insert(id.clone()) {
            id = format!("{}_{}", base, n);
            n += 1;
        }
        id
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dot_label(lines: &[String]) -> String {
    lines.iter().map(|l| escape(l)).collect::<Vec<_>>().join("\\n")
}

/// Graphviz source for the analyzed graph: a legend cluster, the root, every
/// dependency colored by kind and issues, and root → direct edges.
pub fn render_dot(graph: &EnhancedDependencyGraph) -> Result<String> {
    let mut ids = NodeIds::new()?;
    let mut out = String::with_capacity(4096);

    writeln!(out, "digraph DependencyGraph {{")?;
    writeln!(out, "    graph [fontname=\"Arial\", fontsize=12];")?;
    writeln!(out, "    node [fontname=\"Arial\", fontsize=10, shape=box, style=filled];")?;
    writeln!(out, "    edge [fontname=\"Arial\", fontsize=8];")?;
    writeln!(out, "    rankdir=TB;")?;
    writeln!(out)?;

    writeln!(out, "    subgraph cluster_legend {{")?;
    writeln!(out, "        label=\"Legend\";")?;
    writeln!(out, "        style=filled;")?;
    writeln!(out, "        color=lightgrey;")?;
    for (label, fill) in LEGEND {
        let id = format!("legend_{}", label.split(' ').next().unwrap_or(label).to_lowercase());
        writeln!(
            out,
            "        {} [label=\"{}\", fillcolor={}];",
            id,
            label,
            fill.color_name()
        )?;
    }
    writeln!(out, "    }}")?;
    writeln!(out)?;

    let root = &graph.graph.root;
    let root_id = ids.assign(&root.name);
    writeln!(
        out,
        "    \"{}\" [label=\"{}\\n({})\", fillcolor={}];",
        root_id,
        escape(&root.name),
        root.version,
        NodeFill::Root.color_name()
    )?;

    let mut node_ids: BTreeMap<&str, String> = BTreeMap::new();
    for (name, node) in &graph.enhanced_nodes {
        let id = ids.assign(name);
        writeln!(
            out,
            "    \"{}\" [label=\"{}\", fillcolor={}];",
            id,
            dot_label(&label_lines(node)),
            NodeFill::of(node).color_name()
        )?;
        node_ids.insert(name, id);
    }

    writeln!(out)?;
    for (name, node) in &graph.enhanced_nodes {
        if node.is_direct() {
            if let Some(id) = node_ids.get(name.as_str()) {
                writeln!(out, "    \"{}\" -> \"{}\";", root_id, id)?;
            }
        }
    }

    writeln!(out, "}}")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::modfile;
    use crate::graph::DependencyGraph;
    use crate::parser::LockEntries;
    use crate::report::testutil::analyzed;

    #[test]
    fn test_dot_document() {
        let dot = render_dot(&analyzed()).unwrap();

        assert!(dot.starts_with("digraph DependencyGraph {\n"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("subgraph cluster_legend {"));
        assert!(dot.contains("legend_main [label=\"Main Module\", fillcolor=lightblue];"));
        assert!(dot.contains(
            "\"example_com_app\" [label=\"example.com/app\\n(main)\", fillcolor=lightblue];"
        ));
        assert!(dot.contains(
            "\"github_com_spf13_cobra\" [label=\"github.com/spf13/cobra\\nv1.8.0\\nApache-2.0\", fillcolor=lightgreen];"
        ));
        assert!(dot.contains("\"example_com_app\" -> \"github_com_spf13_cobra\";"));
        assert!(!dot.contains("-> \"golang_org_x_sys\""));
    }

    #[test]
    fn test_issue_colors_and_marks() {
        let dot = render_dot(&analyzed()).unwrap();
        // gin has a known advisory; x/sys has two resolved versions.
        assert!(dot.contains(
            "\"github_com_gin_gonic_gin\" [label=\"github.com/gin-gonic/gin\\nv1.7.7\\nUnknown\\n⚠ Security Issues\", fillcolor=red];"
        ));
        assert!(dot.contains("golang.org/x/sys\\nv0.15.0\\nBSD-3-Clause\\n⚡ Version Conflicts\", fillcolor=lightgray];"));
    }

    #[test]
    fn test_unannotated_graph_has_plain_labels() {
        let base = DependencyGraph::from_modfile(&modfile(&[("a.b/c", "v1.0.0", false)]));
        let g = EnhancedDependencyGraph::build(base, LockEntries::new());
        let dot = render_dot(&g).unwrap();
        assert!(dot.contains("\"a_b_c\" [label=\"a.b/c\\nv1.0.0\", fillcolor=lightgreen];"));
    }

    #[test]
    fn test_colliding_ids_get_suffix() {
        let mut ids = NodeIds::new().unwrap();
        assert_eq!(ids.assign("a.b"), "a_b");
        assert_eq!(ids.assign("a-b"), "a_b_2");
        assert_eq!(ids.assign("a/b"), "a_b_3");
    }
}
