use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::ColorConfig;
use crate::core::package::NodeClass;
use crate::graph::ops::{find_cycles, unique_edges};
use crate::graph::PackageGraph;

pub fn render_dot(graph: &PackageGraph, colors: &ColorConfig) -> String {
    let mut out = String::from("digraph debgraph {\n");
    out.push_str("  node [shape=box, style=filled];\n");
    for node in &graph.nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
            escape_dot(&node.name),
            escape_dot(&node.label),
            escape_dot(colors.for_class(node.class))
        ));
    }
    for edge in &graph.edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape_dot(&edge.from),
            escape_dot(&edge.to)
        ));
    }
    out.push_str("}\n");
    out
}

pub fn render_tree(
    roots: &[String],
    edges: &HashMap<String, Vec<String>>,
    labels: &HashMap<String, String>,
) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(label_for(root, labels));
        out.push('\n');
        let mut walk = Walk::new(root);
        render_tree_children(root, edges, labels, "", &mut walk, &mut out);
    }
    out
}

pub fn render_flat(
    roots: &[String],
    edges: &HashMap<String, Vec<String>>,
    labels: &HashMap<String, String>,
) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(label_for(root, labels));
        out.push('\n');
        let mut walk = Walk::new(root);
        render_flat_children(root, edges, labels, 1, &mut walk, &mut out);
    }
    out
}

pub fn text_labels(graph: &PackageGraph) -> HashMap<String, String> {
    graph
        .nodes
        .iter()
        .map(|node| {
            let label = node.label.replace('\n', " ").trim_end().to_string();
            (node.name.clone(), label)
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct GraphJson {
    pub nodes: Vec<NodeJson>,
    pub edges: Vec<EdgeJson>,
    pub cycles: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct NodeJson {
    pub id: String,
    pub label: String,
    pub class: NodeClass,
}

#[derive(Debug, Serialize)]
pub struct EdgeJson {
    pub from: String,
    pub to: String,
}

pub fn graph_to_json(graph: &PackageGraph) -> GraphJson {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| NodeJson {
            id: node.name.clone(),
            label: node.label.clone(),
            class: node.class,
        })
        .collect();
    let edges = unique_edges(graph)
        .into_iter()
        .map(|edge| EdgeJson {
            from: edge.from,
            to: edge.to,
        })
        .collect();

    GraphJson {
        nodes,
        edges,
        cycles: find_cycles(graph),
    }
}

fn label_for<'a>(name: &'a str, labels: &'a HashMap<String, String>) -> &'a str {
    labels.get(name).map(String::as_str).unwrap_or(name)
}

// Packages shown under one root. A package already expanded elsewhere is
// printed once more with "(*)" and not descended into again.
struct Walk {
    path: Vec<String>,
    expanded: HashSet<String>,
}

enum Visit {
    Cycle,
    Repeat,
    Descend,
}

impl Walk {
    fn new(root: &str) -> Self {
        Self {
            path: vec![root.to_string()],
            expanded: HashSet::from([root.to_string()]),
        }
    }

    fn visit(&mut self, name: &str) -> Visit {
        if self.path.iter().any(|entry| entry == name) {
            Visit::Cycle
        } else if !self.expanded.insert(name.to_string()) {
            Visit::Repeat
        } else {
            Visit::Descend
        }
    }
}

fn render_tree_children(
    node: &str,
    edges: &HashMap<String, Vec<String>>,
    labels: &HashMap<String, String>,
    prefix: &str,
    walk: &mut Walk,
    out: &mut String,
) {
    let children = edges.get(node).map(Vec::as_slice).unwrap_or_default();
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(label_for(child, labels));
        match walk.visit(child) {
            Visit::Cycle => out.push_str(" (cycle)\n"),
            Visit::Repeat => out.push_str(" (*)\n"),
            Visit::Descend => {
                out.push('\n');
                walk.path.push(child.clone());
                let mut next_prefix = prefix.to_string();
                next_prefix.push_str(if is_last { "    " } else { "|   " });
                render_tree_children(child, edges, labels, &next_prefix, walk, out);
                walk.path.pop();
            }
        }
    }
}

fn render_flat_children(
    node: &str,
    edges: &HashMap<String, Vec<String>>,
    labels: &HashMap<String, String>,
    depth: usize,
    walk: &mut Walk,
    out: &mut String,
) {
    let children = edges.get(node).map(Vec::as_slice).unwrap_or_default();
    for child in children {
        out.push_str(&"  ".repeat(depth));
        out.push_str(label_for(child, labels));
        match walk.visit(child) {
            Visit::Cycle => out.push_str(" (cycle)\n"),
            Visit::Repeat => out.push_str(" (*)\n"),
            Visit::Descend => {
                out.push('\n');
                walk.path.push(child.clone());
                render_flat_children(child, edges, labels, depth + 1, walk, out);
                walk.path.pop();
            }
        }
    }
}

fn escape_dot(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
