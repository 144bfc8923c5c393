use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::graph::{GraphEdge, PackageGraph};

pub fn to_digraph(graph: &PackageGraph) -> DiGraphMap<&str, ()> {
    let mut digraph = DiGraphMap::new();
    for node in &graph.nodes {
        digraph.add_node(node.name.as_str());
    }
    for edge in &graph.edges {
        digraph.add_edge(edge.from.as_str(), edge.to.as_str(), ());
    }
    digraph
}

pub fn unique_edges(graph: &PackageGraph) -> Vec<GraphEdge> {
    graph
        .edges
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn adjacency(graph: &PackageGraph) -> HashMap<String, Vec<String>> {
    let mut edges: HashMap<String, Vec<String>> = HashMap::new();
    for edge in unique_edges(graph) {
        edges.entry(edge.from).or_default().push(edge.to);
    }
    edges
}

pub fn find_cycles(graph: &PackageGraph) -> Vec<Vec<String>> {
    let digraph = to_digraph(graph);
    let mut cycles: Vec<Vec<String>> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || digraph.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut names: Vec<String> = component.into_iter().map(str::to_string).collect();
            names.sort();
            names
        })
        .collect();
    cycles.sort();
    cycles
}
