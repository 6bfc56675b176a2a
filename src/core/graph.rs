use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::metrics::FileMetric;
use crate::parsers::common::leading_segment;

/// File stems that stand for their enclosing directory as a module.
const PACKAGE_ENTRY_STEMS: &[&str] = &["__init__", "mod", "index", "lib"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub module: String,
    pub language: String,
    pub lines: usize,
    pub functions: usize,
    pub classes: usize,
    pub coverage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Node-link form of the file dependency graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
    }

    /// Rebuild a petgraph graph keyed by node id, for callers that need graph algorithms.
    pub fn to_digraph(&self) -> DiGraph<String, u32> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut indices = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            indices.insert(node.id.as_str(), graph.add_node(node.id.clone()));
        }
        for edge in &self.edges {
            if let (Some(&source), Some(&target)) = (
                indices.get(edge.source.as_str()),
                indices.get(edge.target.as_str()),
            ) {
                graph.add_edge(source, target, edge.weight);
            }
        }
        graph
    }
}

/// Dotted module name: root-relative path, extension dropped, separators as `.`.
pub fn module_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .with_extension("")
        .components()
        .filter_map(|component| match component {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Builds the best-effort file graph from dependency tokens.
///
/// Resolution is heuristic: a token's leading segment is looked up in a
/// reverse index and the first candidate wins.
pub struct GraphBuilder {
    graph: DiGraph<GraphNode, u32>,
    node_map: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node.id) {
            return index;
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        index
    }

    /// Add `source -> target` once; unknown endpoints and self-loops are refused.
    pub fn add_edge(&mut self, source: &str, target: &str) -> Option<petgraph::graph::EdgeIndex> {
        if source == target {
            return None;
        }
        let source_idx = *self.node_map.get(source)?;
        let target_idx = *self.node_map.get(target)?;
        Some(self.graph.update_edge(source_idx, target_idx, 1))
    }

    /// Index and resolve a whole scan's metrics; files are processed in path order.
    pub fn from_metrics(root: &Path, metrics: &[FileMetric]) -> Self {
        let mut ordered: Vec<&FileMetric> = metrics.iter().collect();
        ordered.sort_by(|a, b| a.path.cmp(&b.path));

        let mut builder = Self::new();
        let ids: Vec<String> = ordered
            .iter()
            .map(|metric| metric.path.to_string_lossy().into_owned())
            .collect();
        let modules: Vec<String> = ordered
            .iter()
            .map(|metric| module_name(root, &metric.path))
            .collect();

        for ((metric, id), module) in ordered.iter().zip(&ids).zip(&modules) {
            builder.add_node(GraphNode {
                id: id.clone(),
                module: module.clone(),
                language: metric.language.clone(),
                lines: metric.lines,
                functions: metric.functions,
                classes: metric.classes,
                coverage: metric.coverage(),
            });
        }

        let index = reverse_index(&ordered, &modules);

        for (metric, id) in ordered.iter().zip(&ids) {
            for token in &metric.dependencies {
                let key = leading_segment(token);
                let Some(&first) = index.get(key).and_then(|owners| owners.first()) else {
                    continue;
                };
                builder.add_edge(id, &ids[first]);
            }
        }

        tracing::debug!(
            nodes = builder.graph.node_count(),
            edges = builder.graph.edge_count(),
            "dependency graph built"
        );
        builder
    }

    pub fn build(self) -> DependencyGraph {
        let nodes = self.graph.node_weights().cloned().collect();
        let edges = self
            .graph
            .edge_references()
            .map(|edge| GraphEdge {
                source: self.graph[edge.source()].id.clone(),
                target: self.graph[edge.target()].id.clone(),
                weight: *edge.weight(),
            })
            .collect();
        DependencyGraph { nodes, edges }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Key -> positions of the files owning it, in insertion order.
///
/// Own module names go in first, then bare stems and package directories,
/// then the base segment of every dependency token.
fn reverse_index(ordered: &[&FileMetric], modules: &[String]) -> HashMap<String, Vec<usize>> {
    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    let mut push = |key: &str, position: usize| {
        if key.is_empty() {
            return;
        }
        let owners = index.entry(key.to_string()).or_default();
        if !owners.contains(&position) {
            owners.push(position);
        }
    };

    for (position, module) in modules.iter().enumerate() {
        push(module.as_str(), position);
    }

    for (position, module) in modules.iter().enumerate() {
        let mut segments: Vec<&str> = module.split('.').collect();
        let Some(stem) = segments.pop() else {
            continue;
        };
        if stem != module.as_str() {
            push(stem, position);
        }
        if PACKAGE_ENTRY_STEMS.iter().any(|entry| *entry == stem) {
            if let Some(package) = segments.last() {
                push(&segments.join("."), position);
                push(*package, position);
            }
        }
    }

    for (position, metric) in ordered.iter().enumerate() {
        for token in &metric.dependencies {
            push(leading_segment(token), position);
        }
    }

    index
}
