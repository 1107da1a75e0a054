//! Probabilistic path sampler.
//!
//! Enumerates every simple path between two nodes up to a hop cutoff and
//! draws one with probability `exp(-decay * normalized_distance)`, so shorter
//! paths dominate while longer ones keep a non-zero chance. Any internal
//! failure falls back to [`shortest_path`].

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, RngCore};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SamplerConfig;
use crate::dijkstra::shortest_path;
use crate::graph::GraphSnapshot;
use crate::path::Route;
use crate::traits::SegmentSolver;

#[derive(Debug, Error)]
enum SampleError {
    #[error("node {id} is not in the graph")]
    MissingEndpoint { id: String },

    #[error("more than {limit} candidate paths")]
    TooManyCandidates { limit: usize },

    #[error("candidate path has non-finite distance")]
    NonFiniteDistance,

    #[error("invalid sampling weights: {0}")]
    Weights(String),
}

/// Distance-weighted path sampler.
#[derive(Debug, Clone)]
pub struct PathSampler {
    config: SamplerConfig,
    exploration_depth: usize,
}

impl Default for PathSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

impl PathSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            exploration_depth: 1,
        }
    }

    /// Number of independent draws per call; the shortest draw wins.
    pub fn with_exploration_depth(mut self, depth: usize) -> Self {
        self.exploration_depth = depth;
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample a path using the configured exploration depth.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        graph: &GraphSnapshot,
        start: &str,
        end: &str,
        rng: &mut R,
    ) -> Route {
        self.sample_with_depth(graph, start, end, self.exploration_depth, rng)
    }

    /// Sample a path with `exploration_depth` draws (0 is treated as 1).
    ///
    /// Returns [`Route::unreachable`] when no candidate path exists within the
    /// hop cutoff.
    pub fn sample_with_depth<R: Rng + ?Sized>(
        &self,
        graph: &GraphSnapshot,
        start: &str,
        end: &str,
        exploration_depth: usize,
        rng: &mut R,
    ) -> Route {
        match self.try_sample(graph, start, end, exploration_depth.max(1), rng) {
            Ok(route) => route,
            Err(err) => {
                warn!(start, end, error = %err, "path sampling failed, using dijkstra");
                shortest_path(graph, start, end)
            }
        }
    }

    fn try_sample<R: Rng + ?Sized>(
        &self,
        graph: &GraphSnapshot,
        start: &str,
        end: &str,
        draws: usize,
        rng: &mut R,
    ) -> Result<Route, SampleError> {
        let candidates = enumerate_simple_paths(graph, start, end, &self.config)?;
        if candidates.is_empty() {
            debug!(start, end, "no candidate paths within hop cutoff");
            return Ok(Route::unreachable());
        }
        if candidates.iter().any(|route| !route.distance_km.is_finite()) {
            return Err(SampleError::NonFiniteDistance);
        }

        let picker = CandidatePicker::new(&candidates, self.config.decay)?;
        let mut best: Option<usize> = None;
        for _ in 0..draws {
            let index = picker.pick(rng);
            let shorter = best
                .is_none_or(|current| candidates[index].distance_km < candidates[current].distance_km);
            if shorter {
                best = Some(index);
            }
        }

        let index = best.unwrap_or_default();
        debug!(
            start,
            end,
            candidates = candidates.len(),
            chosen = index,
            distance_km = candidates[index].distance_km,
            "sampled path"
        );
        Ok(candidates.into_iter().nth(index).unwrap_or_else(Route::unreachable))
    }
}

impl SegmentSolver for PathSampler {
    fn solve_segment(
        &self,
        graph: &GraphSnapshot,
        start: &str,
        end: &str,
        rng: &mut dyn RngCore,
    ) -> Route {
        self.sample(graph, start, end, rng)
    }
}

/// Draws candidate indices: uniform when every distance is equal, otherwise
/// Boltzmann-weighted over min/max normalized distances.
enum CandidatePicker {
    Uniform(usize),
    Weighted(WeightedIndex<f64>),
}

impl CandidatePicker {
    fn new(candidates: &[Route], decay: f64) -> Result<Self, SampleError> {
        let (min, max) = candidates.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, route| {
            (acc.0.min(route.distance_km), acc.1.max(route.distance_km))
        });

        if min == max {
            return Ok(Self::Uniform(candidates.len()));
        }

        let span = max - min;
        let weights = candidates
            .iter()
            .map(|route| (-decay * (route.distance_km - min) / span).exp());
        WeightedIndex::new(weights)
            .map(Self::Weighted)
            .map_err(|err| SampleError::Weights(err.to_string()))
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            Self::Uniform(len) => rng.random_range(0..*len),
            Self::Weighted(index) => index.sample(rng),
        }
    }
}

/// Every simple path from `start` to `end` with at most `max_hops` edges,
/// neighbours visited in id order.
fn enumerate_simple_paths(
    graph: &GraphSnapshot,
    start: &str,
    end: &str,
    config: &SamplerConfig,
) -> Result<Vec<Route>, SampleError> {
    for id in [start, end] {
        if !graph.contains(id) {
            return Err(SampleError::MissingEndpoint { id: id.to_string() });
        }
    }
    if start == end {
        return Ok(vec![Route::new(vec![start.to_string()], 0.0)]);
    }

    let mut search = PathSearch {
        graph,
        end,
        max_hops: config.max_hops,
        max_candidates: config.max_candidates,
        stack: vec![start],
        found: Vec::new(),
    };
    search.extend(start, 0.0)?;
    Ok(search.found)
}

struct PathSearch<'a> {
    graph: &'a GraphSnapshot,
    end: &'a str,
    max_hops: usize,
    max_candidates: usize,
    stack: Vec<&'a str>,
    found: Vec<Route>,
}

impl<'a> PathSearch<'a> {
    fn extend(&mut self, current: &'a str, distance_km: f64) -> Result<(), SampleError> {
        // stack holds hops + 1 nodes
        if self.stack.len() > self.max_hops {
            return Ok(());
        }

        let graph = self.graph;
        for (next, weight) in graph.neighbours(current) {
            if self.stack.contains(&next) {
                continue;
            }

            let total = distance_km + weight;
            if next == self.end {
                if self.found.len() >= self.max_candidates {
                    return Err(SampleError::TooManyCandidates {
                        limit: self.max_candidates,
                    });
                }
                let mut nodes: Vec<String> = self.stack.iter().map(|id| id.to_string()).collect();
                nodes.push(next.to_string());
                self.found.push(Route::new(nodes, total));
                continue;
            }

            self.stack.push(next);
            let result = self.extend(next, total);
            self.stack.pop();
            result?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn graph(ids: &[&str], edges: &[(&str, &str, f64)]) -> GraphSnapshot {
        GraphSnapshot::from_edges(
            ids.iter().map(|id| Node::new(*id, id.to_uppercase(), 0.0, 0.0)).collect(),
            edges.iter().map(|(a, b, w)| Edge::new(*a, *b, *w)),
        )
    }

    fn complete(n: usize) -> GraphSnapshot {
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let nodes = ids.iter().map(|id| Node::new(id.clone(), id.clone(), 0.0, 0.0)).collect();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                edges.push(Edge::new(ids[i].clone(), ids[j].clone(), 1.0));
            }
        }
        GraphSnapshot::from_edges(nodes, edges)
    }

    #[test]
    fn test_enumerates_all_simple_paths() {
        // K4: a->d directly, via b or c, via b,c or c,b
        let g = complete(4);
        let paths = enumerate_simple_paths(&g, "n0", "n3", &SamplerConfig::default()).unwrap();
        assert_eq!(paths.len(), 5);
        assert!(paths.iter().all(|p| p.nodes.first().unwrap() == "n0"));
        assert!(paths.iter().all(|p| p.nodes.last().unwrap() == "n3"));
    }

    #[test]
    fn test_hop_cutoff_limits_enumeration() {
        let g = complete(4);
        let config = SamplerConfig::default().with_max_hops(1);
        let paths = enumerate_simple_paths(&g, "n0", "n3", &config).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["n0".to_string(), "n3".to_string()]);
    }

    #[test]
    fn test_default_cutoff_is_five_hops() {
        // A 7-node line needs 6 hops end to end
        let ids = ["a", "b", "c", "d", "e", "f", "g"];
        let edges: Vec<_> = ids.windows(2).map(|w| (w[0], w[1], 1.0)).collect();
        let g = graph(&ids, &edges);

        let paths = enumerate_simple_paths(&g, "a", "f", &SamplerConfig::default()).unwrap();
        assert_eq!(paths.len(), 1);
        let paths = enumerate_simple_paths(&g, "a", "g", &SamplerConfig::default()).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_candidate_budget_is_an_error() {
        let g = complete(6);
        let config = SamplerConfig::default().with_max_candidates(3);
        let result = enumerate_simple_paths(&g, "n0", "n5", &config);
        assert!(matches!(result, Err(SampleError::TooManyCandidates { limit: 3 })));
    }

    #[test]
    fn test_over_budget_falls_back_to_dijkstra() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", 1.0),
                ("b", "d", 1.0),
                ("a", "c", 2.0),
                ("c", "d", 2.0),
                ("a", "d", 5.0),
                ("b", "c", 1.0),
            ],
        );
        let sampler = PathSampler::new(SamplerConfig::default().with_max_candidates(1));
        let mut rng = StdRng::seed_from_u64(7);

        let route = sampler.sample(&g, "a", "d", &mut rng);
        assert_eq!(route, shortest_path(&g, "a", "d"));
    }

    #[test]
    fn test_nan_decay_falls_back_to_dijkstra() {
        let g = graph(&["a", "b", "c"], &[("a", "b", 1.0), ("b", "c", 1.0), ("a", "c", 5.0)]);
        let sampler = PathSampler::new(SamplerConfig::default().with_decay(f64::NAN));
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..10 {
            let route = sampler.sample(&g, "a", "c", &mut rng);
            assert_eq!(route.nodes, vec!["a", "b", "c"]);
            assert_eq!(route.distance_km, 2.0);
        }
    }

    #[test]
    fn test_infinite_weight_falls_back_to_dijkstra() {
        let g = graph(&["a", "b", "c"], &[("a", "b", f64::INFINITY), ("b", "c", 1.0), ("a", "c", 5.0)]);
        let sampler = PathSampler::default();
        let mut rng = StdRng::seed_from_u64(3);

        let route = sampler.sample(&g, "a", "c", &mut rng);
        assert_eq!(route, shortest_path(&g, "a", "c"));
        assert_eq!(route.nodes, vec!["a", "c"]);
    }

    #[test]
    fn test_disconnected_matches_dijkstra_failure() {
        let g = graph(&["a", "b", "c", "d"], &[("a", "b", 1.0), ("c", "d", 1.0)]);
        let sampler = PathSampler::default();
        let mut rng = StdRng::seed_from_u64(11);

        let sampled = sampler.sample(&g, "a", "d", &mut rng);
        assert_eq!(sampled, shortest_path(&g, "a", "d"));
        assert!(sampled.is_unreachable());
    }

    #[test]
    fn test_missing_endpoint_is_unreachable() {
        let g = graph(&["a", "b"], &[("a", "b", 1.0)]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(PathSampler::default().sample(&g, "a", "ghost", &mut rng).is_unreachable());
    }

    #[test]
    fn test_same_endpoints_is_single_node() {
        let g = complete(3);
        let mut rng = StdRng::seed_from_u64(5);
        let route = PathSampler::default().sample(&g, "n1", "n1", &mut rng);
        assert_eq!(route.nodes, vec!["n1"]);
        assert_eq!(route.distance_km, 0.0);
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let g = complete(5);
        let sampler = PathSampler::default();
        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);

        for _ in 0..25 {
            assert_eq!(
                sampler.sample(&g, "n0", "n4", &mut first),
                sampler.sample(&g, "n0", "n4", &mut second)
            );
        }
    }

    #[test]
    fn test_sampled_distance_matches_path() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", 1.5),
                ("b", "d", 2.5),
                ("a", "c", 2.0),
                ("c", "d", 4.0),
                ("a", "d", 7.0),
                ("b", "c", 0.5),
            ],
        );
        let sampler = PathSampler::default();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let route = sampler.sample(&g, "a", "d", &mut rng);
            let expected = crate::path::path_distance(&g, &route.nodes).unwrap();
            assert_eq!(route.distance_km, expected);
        }
    }

    #[test]
    fn test_depth_favours_shortest_draw() {
        // Two candidates: a-c (1.0) and a-b-c (10.0)
        let g = graph(&["a", "b", "c"], &[("a", "b", 5.0), ("b", "c", 5.0), ("a", "c", 1.0)]);
        let sampler = PathSampler::default().with_exploration_depth(64);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..20 {
            let route = sampler.sample(&g, "a", "c", &mut rng);
            assert_eq!(route.nodes, vec!["a", "c"]);
        }
    }
}
