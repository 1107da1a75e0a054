//! Closed tours over a whole graph snapshot.
//!
//! Nodes are relabeled to dense indices for the search and mapped back before
//! returning, so callers only ever see node ids. The search seeds with a
//! nearest-neighbour tour, anneals over 2-opt segment reversals, and finishes
//! with a 2-opt descent on the best tour seen.
//!
//! Callers are expected to cap the node count before calling in; nothing here
//! truncates the graph.

use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TourConfig;
use crate::graph::GraphSnapshot;
use crate::path::Route;

const IMPROVEMENT_EPSILON: f64 = 1e-12;

/// Upper bound on cooling steps, whatever the schedule.
const MAX_TEMPERATURE_LEVELS: usize = 10_000;

#[derive(Debug, Error)]
enum TourError {
    #[error("edge {from} -> {to} has no finite weight")]
    NonFiniteWeight { from: String, to: String },
}

/// Dense index space for one tour solve.
struct NodeIndex<'a> {
    ids: Vec<&'a str>,
    lookup: HashMap<&'a str, usize>,
}

impl<'a> NodeIndex<'a> {
    fn new(graph: &'a GraphSnapshot) -> Self {
        let ids: Vec<&str> = graph.nodes().iter().map(|node| node.id.as_str()).collect();
        let lookup = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self { ids, lookup }
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    fn ids_for(&self, order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| self.ids[i].to_string()).collect()
    }
}

/// Annealed 2-opt tour solver.
#[derive(Debug, Clone, Default)]
pub struct TourSampler {
    config: TourConfig,
}

impl TourSampler {
    pub fn new(config: TourConfig) -> Self {
        Self { config }
    }

    /// Closed tour over every node, starting from the first node in the
    /// snapshot.
    pub fn solve_tour<R: Rng + ?Sized>(&self, graph: &GraphSnapshot, rng: &mut R) -> Route {
        self.solve_tour_from(graph, None, rng)
    }

    /// Closed tour over every node, rotated to begin at `start` when it is
    /// part of the snapshot.
    ///
    /// Fewer than 2 nodes yields [`Route::stationary`]; a failed search yields
    /// [`Route::unreachable`] unless the nearest-neighbour fallback is enabled.
    pub fn solve_tour_from<R: Rng + ?Sized>(
        &self,
        graph: &GraphSnapshot,
        start: Option<&str>,
        rng: &mut R,
    ) -> Route {
        let index = NodeIndex::new(graph);
        if index.len() < 2 {
            return Route::stationary();
        }

        let matrix = weight_matrix(graph, &index);
        let seed = nearest_neighbor_tour(&matrix);

        let mut order = match self.anneal(&index, &matrix, seed.clone(), rng) {
            Ok(order) => order,
            Err(err) => {
                if self.config.nearest_neighbor_fallback && tour_cost(&matrix, &seed).is_finite() {
                    warn!(error = %err, "tour search failed, returning nearest-neighbour tour");
                    seed
                } else {
                    warn!(error = %err, "tour search failed");
                    return Route::unreachable();
                }
            }
        };

        if let Some(offset) = start.and_then(|id| index.index_of(id)) {
            if let Some(position) = order.iter().position(|&i| i == offset) {
                order.rotate_left(position);
            }
        }
        order.push(order[0]);

        let distance_km = order
            .windows(2)
            .map(|pair| matrix[pair[0]][pair[1]])
            .sum::<f64>();
        debug!(nodes = index.len(), distance_km, "solved tour");

        Route::new(index.ids_for(&order), distance_km)
    }

    fn anneal<R: Rng + ?Sized>(
        &self,
        index: &NodeIndex<'_>,
        matrix: &[Vec<f64>],
        seed: Vec<usize>,
        rng: &mut R,
    ) -> Result<Vec<usize>, TourError> {
        let n = matrix.len();
        for i in 0..n {
            for j in 0..n {
                if i != j && !matrix[i][j].is_finite() {
                    return Err(TourError::NonFiniteWeight {
                        from: index.ids[i].to_string(),
                        to: index.ids[j].to_string(),
                    });
                }
            }
        }

        let mut current = seed;
        if n < 4 {
            // Every ordering of 3 or fewer nodes is the same cycle.
            return Ok(current);
        }

        let mut current_cost = tour_cost(matrix, &current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let scale = mean_edge_weight(matrix);
        let mut temperature = self.config.initial_temperature;
        let cooling = self.config.cooling_rate.clamp(0.0, 0.999_999);
        let floor = self.config.min_temperature.max(0.0);

        let mut levels = 0;
        while scale > 0.0 && temperature > floor && levels < MAX_TEMPERATURE_LEVELS {
            for _ in 0..self.config.iterations_per_temperature {
                let i = rng.random_range(1..n - 1);
                let j = rng.random_range(i + 1..n);
                let delta = reversal_delta(matrix, &current, i, j);

                let accept = delta < 0.0
                    || rng.random::<f64>() < (-delta / (temperature * scale)).exp();
                if accept {
                    current[i..=j].reverse();
                    current_cost += delta;
                    if current_cost < best_cost - IMPROVEMENT_EPSILON {
                        best = current.clone();
                        best_cost = current_cost;
                    }
                }
            }
            temperature *= cooling;
            levels += 1;
        }

        two_opt_descent(matrix, &mut best);
        Ok(best)
    }
}

fn weight_matrix(graph: &GraphSnapshot, index: &NodeIndex<'_>) -> Vec<Vec<f64>> {
    let n = index.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                matrix[i][j] = graph
                    .weight(index.ids[i], index.ids[j])
                    .unwrap_or(f64::INFINITY);
            }
        }
    }
    matrix
}

/// Greedy tour from index 0, ties going to the lower index.
fn nearest_neighbor_tour(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[0] = true;
    order.push(0);

    while order.len() < n {
        let next = (0..n)
            .filter(|&candidate| !visited[candidate])
            .min_by(|&a, &b| matrix[current][a].total_cmp(&matrix[current][b]));
        let Some(next) = next else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Cost of the closed cycle through `order`.
fn tour_cost(matrix: &[Vec<f64>], order: &[usize]) -> f64 {
    let n = order.len();
    (0..n).map(|k| matrix[order[k]][order[(k + 1) % n]]).sum()
}

/// Cost change from reversing `order[i..=j]`, with `1 <= i < j < n`.
fn reversal_delta(matrix: &[Vec<f64>], order: &[usize], i: usize, j: usize) -> f64 {
    let n = order.len();
    let prev = order[i - 1];
    let next = order[(j + 1) % n];
    let first = order[i];
    let last = order[j];

    matrix[prev][last] + matrix[first][next] - matrix[prev][first] - matrix[last][next]
}

fn two_opt_descent(matrix: &[Vec<f64>], order: &mut [usize]) {
    let n = order.len();
    loop {
        let mut improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n {
                if reversal_delta(matrix, order, i, j) < -IMPROVEMENT_EPSILON {
                    order[i..=j].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

fn mean_edge_weight(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    if n < 2 {
        return 0.0;
    }
    let total: f64 = matrix.iter().flatten().sum();
    total / (n * (n - 1)) as f64
}
