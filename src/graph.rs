//! Complete weighted graph snapshots built per request.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::haversine::Haversine;
use crate::traits::DistanceMetric;

/// A geolocated node supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
        }
    }

    /// Location coordinates (lat, lng).
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Undirected weighted edge between two node ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub weight_km: f64,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight_km: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight_km,
        }
    }
}

/// Node set of one request plus the edges among them.
///
/// Neighbours are kept in id order so every traversal over a snapshot is
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    adjacency: HashMap<String, BTreeMap<String, f64>>,
}

impl GraphSnapshot {
    /// Build a snapshot from explicit edges instead of coordinates.
    ///
    /// Edges naming unknown nodes and self-loops are skipped.
    pub fn from_edges(nodes: Vec<Node>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut graph = Self::with_nodes(nodes);
        for edge in edges {
            if edge.from == edge.to
                || !graph.contains(&edge.from)
                || !graph.contains(&edge.to)
            {
                debug!(from = %edge.from, to = %edge.to, "skipping edge outside snapshot");
                continue;
            }
            graph.insert_edge(&edge.from, &edge.to, edge.weight_km);
        }
        graph
    }

    fn with_nodes(nodes: Vec<Node>) -> Self {
        let mut unique: Vec<Node> = Vec::with_capacity(nodes.len());
        let mut seen: HashMap<String, usize> = HashMap::new();
        for node in nodes {
            if let Some(&slot) = seen.get(&node.id) {
                unique[slot] = node;
                continue;
            }
            seen.insert(node.id.clone(), unique.len());
            unique.push(node);
        }

        let adjacency = unique
            .iter()
            .map(|node| (node.id.clone(), BTreeMap::new()))
            .collect();

        Self {
            nodes: unique,
            adjacency,
        }
    }

    fn insert_edge(&mut self, a: &str, b: &str, weight_km: f64) {
        if let Some(neighbours) = self.adjacency.get_mut(a) {
            neighbours.insert(b.to_string(), weight_km);
        }
        if let Some(neighbours) = self.adjacency.get_mut(b) {
            neighbours.insert(a.to_string(), weight_km);
        }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Edge weight between `a` and `b`, if they are connected.
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        self.adjacency.get(a)?.get(b).copied()
    }

    /// Neighbours of `id` with edge weights, in id order.
    pub fn neighbours<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, f64)> + use<'a> {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|neighbours| neighbours.iter().map(|(id, weight)| (id.as_str(), *weight)))
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Each undirected edge once, ordered by node insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (i, from) in self.nodes.iter().enumerate() {
            for to in &self.nodes[i + 1..] {
                if let Some(weight_km) = self.weight(&from.id, &to.id) {
                    edges.push(Edge::new(from.id.clone(), to.id.clone(), weight_km));
                }
            }
        }
        edges
    }

    /// Plain node/edge lists for external rendering.
    pub fn visualization(&self) -> GraphVisualization {
        let edges = self
            .edges()
            .into_iter()
            .map(|edge| VisEdge {
                from: edge.from,
                to: edge.to,
                weight: round_to_hundredths(edge.weight_km),
            })
            .collect();

        GraphVisualization {
            nodes: self.nodes.clone(),
            edges,
        }
    }
}

/// Node and edge lists for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphVisualization {
    pub nodes: Vec<Node>,
    pub edges: Vec<VisEdge>,
}

/// Edge tuple with its weight rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

/// Build the complete haversine-weighted graph over `nodes`.
pub fn build_graph(nodes: &[Node]) -> GraphSnapshot {
    build_graph_with(nodes, &Haversine)
}

/// Build the complete graph over `nodes` using `metric` for edge weights.
pub fn build_graph_with<M: DistanceMetric>(nodes: &[Node], metric: &M) -> GraphSnapshot {
    let mut graph = GraphSnapshot::with_nodes(nodes.to_vec());
    let locations: Vec<(f64, f64)> = graph.nodes.iter().map(Node::location).collect();
    let matrix = metric.matrix_for(&locations);

    let ids: Vec<String> = graph.nodes.iter().map(|node| node.id.clone()).collect();
    for i in 0..ids.len() {
        for j in i + 1..ids.len() {
            graph.insert_edge(&ids[i], &ids[j], matrix[i][j]);
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built graph snapshot"
    );
    graph
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
