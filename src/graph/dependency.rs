use std::collections::BTreeMap;

use serde::Serialize;

use crate::parser::ModFile;

/// Version given to the root node.
pub const ROOT_VERSION: &str = "main";

/// One module in the graph.
///
/// `children` holds the names of the root's direct requirements and is empty
/// on every other node: the graph is a flat registry plus one level of
/// root → direct edges, not a transitive tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub name: String,
    pub version: String,
    pub direct: bool,
    pub children: Vec<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, version: impl Into<String>, direct: bool) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            direct,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DependencyGraph {
    pub root: Node,
    /// Every node keyed by module path, the root included.
    pub all_nodes: BTreeMap<String, Node>,
    pub module_name: String,
    pub module_go_version: Option<String>,
}

impl DependencyGraph {
    /// Build the base graph from a parsed `go.mod`.
    ///
    /// Each requirement becomes a node with `direct = !indirect`; duplicate
    /// paths overwrite earlier ones. Direct requirements are linked from the
    /// root in declaration order.
    pub fn from_modfile(modfile: &ModFile) -> Self {
        let mut root = Node::new(&modfile.module_path, ROOT_VERSION, true);
        let mut all_nodes = BTreeMap::new();

        for require in &modfile.requires {
            let node = Node::new(&require.path, &require.version, !require.indirect);
            if node.direct {
                root.children.push(node.name.clone());
            }
            all_nodes.insert(node.name.clone(), node);
        }

        all_nodes.insert(root.name.clone(), root.clone());

        Self {
            root,
            all_nodes,
            module_name: modfile.module_path.clone(),
            module_go_version: modfile.go_version.clone(),
        }
    }

    pub fn is_root(&self, name: &str) -> bool {
        name == self.root.name
    }

    /// Direct dependencies in declaration order.
    pub fn direct_dependencies(&self) -> Vec<&Node> {
        self.root
            .children
            .iter()
            .filter_map(|name| self.all_nodes.get(name))
            .collect()
    }

    /// Every node except the root, ordered by name.
    pub fn dependencies(&self) -> impl Iterator<Item = &Node> {
        self.all_nodes.values().filter(move |n| !self.is_root(&n.name))
    }

    /// `(direct, indirect)` counts, root excluded.
    pub fn dependency_count(&self) -> (usize, usize) {
        self.dependencies().fold((0, 0), |(direct, indirect), node| {
            if node.direct {
                (direct + 1, indirect)
            } else {
                (direct, indirect + 1)
            }
        })
    }
}
