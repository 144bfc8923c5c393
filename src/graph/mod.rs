use crate::core::package::NodeClass;

pub mod builder;
pub mod ops;
pub mod viz;

pub trait GraphSink {
    fn add_node(&mut self, name: &str, label: &str, class: NodeClass);
    fn add_edge(&mut self, from: &str, to: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub name: String,
    pub label: String,
    pub class: NodeClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Default)]
pub struct PackageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

impl GraphSink for PackageGraph {
    fn add_node(&mut self, name: &str, label: &str, class: NodeClass) {
        self.nodes.push(GraphNode {
            name: name.to_string(),
            label: label.to_string(),
            class,
        });
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.push(GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
}
