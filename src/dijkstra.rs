//! Deterministic single-pair shortest paths.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use rand::RngCore;
use tracing::debug;

use crate::graph::GraphSnapshot;
use crate::path::Route;
use crate::traits::SegmentSolver;

/// Dijkstra segment solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl SegmentSolver for Dijkstra {
    fn solve_segment(
        &self,
        graph: &GraphSnapshot,
        start: &str,
        end: &str,
        _rng: &mut dyn RngCore,
    ) -> Route {
        shortest_path(graph, start, end)
    }
}

/// Lowest-cost path from `start` to `end`.
///
/// Returns [`Route::unreachable`] when either endpoint is missing or `end`
/// cannot be reached. Among equal-cost paths the result is fixed: the queue
/// settles equal costs in id order, and an equal-cost relaxation only wins
/// when its predecessor id sorts first.
pub fn shortest_path(graph: &GraphSnapshot, start: &str, end: &str) -> Route {
    if !graph.contains(start) || !graph.contains(end) {
        debug!(start, end, "shortest path endpoint missing from graph");
        return Route::unreachable();
    }
    if start == end {
        return Route::new(vec![start.to_string()], 0.0);
    }

    let mut distances: HashMap<&str, f64> = HashMap::new();
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut settled: HashSet<&str> = HashSet::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        if !settled.insert(entry.node) {
            continue;
        }

        if entry.node == end {
            let nodes = reconstruct_path(&parents, start, end);
            return Route::new(nodes, entry.cost.0);
        }

        for (next, weight) in graph.neighbours(entry.node) {
            if settled.contains(next) {
                continue;
            }

            let next_cost = entry.cost.0 + weight;
            let improves = match distances.get(next) {
                None => true,
                Some(&known) if next_cost < known => true,
                Some(&known) if next_cost == known => parents
                    .get(next)
                    .is_some_and(|parent| entry.node < *parent),
                Some(_) => false,
            };

            if improves {
                distances.insert(next, next_cost);
                parents.insert(next, entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    debug!(start, end, "no path between nodes");
    Route::unreachable()
}

fn reconstruct_path(parents: &HashMap<&str, &str>, start: &str, goal: &str) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node.to_string());
        if node == start {
            break;
        }
        current = parents.get(node).copied();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: FloatOrd,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, then id.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
