//! Resolved routes: an ordered node id sequence plus its total distance.

use serde::{Deserialize, Serialize};

use crate::graph::GraphSnapshot;

/// Ordered node ids with their total distance in kilometers.
///
/// An empty `nodes` list is the failure signal. Paired with
/// `f64::INFINITY` it means unreachable; paired with `0.0` it means no
/// travel was needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub nodes: Vec<String>,
    pub distance_km: f64,
}

impl Route {
    pub fn new(nodes: Vec<String>, distance_km: f64) -> Self {
        Self { nodes, distance_km }
    }

    /// Sentinel for "no path / no tour".
    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            distance_km: f64::INFINITY,
        }
    }

    /// Empty route with zero distance.
    pub fn stationary() -> Self {
        Self {
            nodes: Vec::new(),
            distance_km: 0.0,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn is_unreachable(&self) -> bool {
        self.nodes.is_empty() && self.distance_km.is_infinite()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Append `next`, dropping its first node when it repeats our last one.
    pub fn extend_with(&mut self, next: Route) {
        let junction = match (self.nodes.last(), next.nodes.first()) {
            (Some(last), Some(first)) => last == first,
            _ => false,
        };
        self.nodes
            .extend(next.nodes.into_iter().skip(usize::from(junction)));
        self.distance_km += next.distance_km;
    }
}

/// Sum of edge weights along `nodes`, or `None` if a hop has no edge.
pub fn path_distance(graph: &GraphSnapshot, nodes: &[String]) -> Option<f64> {
    nodes
        .windows(2)
        .map(|pair| graph.weight(&pair[0], &pair[1]))
        .sum()
}
