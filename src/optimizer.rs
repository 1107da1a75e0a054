//! Request-level entry point.
//!
//! Validates a request against the supplied nodes, enforces the tour
//! admission cap, builds a fresh snapshot, times the composition, and wraps the
//! outcome in a [`RouteResult`]. Engine failures (empty paths) become
//! [`Error::NoPathFound`] here.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::composer::{Algorithm, RouteComposer, RouteMode};
use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::graph::{Node, build_graph};

/// A single optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub stops: Vec<String>,
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub mode: RouteMode,
}

impl RouteRequest {
    pub fn new(stops: Vec<String>, algorithm: Algorithm, mode: RouteMode) -> Self {
        Self {
            stops,
            algorithm,
            mode,
        }
    }

    /// Sequential request from `start` to `end`.
    pub fn point_to_point(
        start: impl Into<String>,
        end: impl Into<String>,
        algorithm: Algorithm,
    ) -> Self {
        Self::new(vec![start.into(), end.into()], algorithm, RouteMode::Sequential)
    }

    /// Tour request over `stops`.
    pub fn tour(stops: Vec<String>) -> Self {
        Self::new(stops, Algorithm::Qaoa, RouteMode::Tour)
    }
}

/// Outcome of one optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub algorithm: Algorithm,
    pub mode: RouteMode,
    /// Stops as requested.
    pub stops: Vec<String>,
    /// Resolved node ids.
    pub path: Vec<String>,
    pub distance_km: f64,
    /// Wall-clock time spent composing the route, serialized as seconds.
    #[serde(with = "duration_secs")]
    pub execution_time: Duration,
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// Stateless optimizer holding only immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    config: PlannerConfig,
    composer: RouteComposer,
}

impl RouteOptimizer {
    pub fn new(config: PlannerConfig) -> Self {
        let composer = RouteComposer::new(&config);
        Self { config, composer }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Optimize one request over `nodes`.
    pub fn optimize(
        &self,
        nodes: &[Node],
        request: &RouteRequest,
        rng: &mut dyn RngCore,
    ) -> Result<RouteResult> {
        self.config.validate()?;
        self.validate(nodes, request)?;

        let graph = match request.mode {
            RouteMode::Sequential => build_graph(nodes),
            RouteMode::Tour => {
                let wanted: HashSet<&str> = request.stops.iter().map(String::as_str).collect();
                let members: Vec<Node> = nodes
                    .iter()
                    .filter(|node| wanted.contains(node.id.as_str()))
                    .cloned()
                    .collect();
                build_graph(&members)
            }
        };

        let started = Instant::now();
        let route = self
            .composer
            .compose(&graph, request.stops.as_slice(), request.mode, request.algorithm, rng);
        let execution_time = started.elapsed();

        if !route.is_found() {
            return Err(Error::NoPathFound {
                start: request.stops.first().cloned().unwrap_or_default(),
                end: request.stops.last().cloned().unwrap_or_default(),
            });
        }

        info!(
            algorithm = %request.algorithm,
            mode = %request.mode,
            stops = request.stops.len(),
            hops = route.hop_count(),
            distance_km = route.distance_km,
            elapsed_us = execution_time.as_micros() as u64,
            "optimized route"
        );

        Ok(RouteResult {
            algorithm: request.algorithm,
            mode: request.mode,
            stops: request.stops.clone(),
            path: route.nodes,
            distance_km: route.distance_km,
            execution_time,
        })
    }

    /// Optimize with a fresh generator seeded from `seed`.
    pub fn optimize_seeded(
        &self,
        nodes: &[Node],
        request: &RouteRequest,
        seed: u64,
    ) -> Result<RouteResult> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.optimize(nodes, request, &mut rng)
    }

    /// Optimize independent requests in parallel.
    ///
    /// Request `i` gets its own generator seeded with `seed + i`, so results
    /// match calling [`RouteOptimizer::optimize_seeded`] one by one. Output
    /// order follows input order.
    pub fn optimize_batch(
        &self,
        nodes: &[Node],
        requests: &[RouteRequest],
        seed: u64,
    ) -> Vec<Result<RouteResult>> {
        requests
            .par_iter()
            .enumerate()
            .map(|(i, request)| self.optimize_seeded(nodes, request, seed.wrapping_add(i as u64)))
            .collect()
    }

    fn validate(&self, nodes: &[Node], request: &RouteRequest) -> Result<()> {
        let known: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        if let Some(missing) = request.stops.iter().find(|id| !known.contains(id.as_str())) {
            return Err(Error::UnknownNode {
                id: missing.clone(),
            });
        }

        if request.stops.len() < 2 {
            return Err(Error::NotEnoughStops {
                count: request.stops.len(),
            });
        }

        if request.mode == RouteMode::Tour && request.stops.len() > self.config.max_tour_stops {
            return Err(Error::TooManyStops {
                count: request.stops.len(),
                max: self.config.max_tour_stops,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_nodes;

    #[test]
    fn test_unknown_stop_is_rejected() {
        let optimizer = RouteOptimizer::default();
        let request = RouteRequest::point_to_point("restaurant-a", "nowhere", Algorithm::Dijkstra);
        let err = optimizer.optimize_seeded(&sample_nodes(), &request, 1).unwrap_err();

        assert!(matches!(err, Error::UnknownNode { ref id } if id == "nowhere"));
    }

    #[test]
    fn test_single_stop_is_rejected() {
        let optimizer = RouteOptimizer::default();
        let request = RouteRequest::new(vec!["warehouse".into()], Algorithm::Dijkstra, RouteMode::Sequential);
        let err = optimizer.optimize_seeded(&sample_nodes(), &request, 1).unwrap_err();

        assert!(matches!(err, Error::NotEnoughStops { count: 1 }));
    }

    #[test]
    fn test_tour_admission_cap() {
        let nodes = sample_nodes();
        let stops: Vec<String> = nodes.iter().take(6).map(|n| n.id.clone()).collect();
        let optimizer = RouteOptimizer::default();
        let err = optimizer.optimize_seeded(&nodes, &RouteRequest::tour(stops.clone()), 1).unwrap_err();
        assert!(matches!(err, Error::TooManyStops { count: 6, max: 5 }));

        let relaxed = RouteOptimizer::new(PlannerConfig::default().with_max_tour_stops(6));
        let result = relaxed.optimize_seeded(&nodes, &RouteRequest::tour(stops), 1).unwrap();
        assert_eq!(result.path.len(), 7);
    }

    #[test]
    fn test_result_echoes_request() {
        let optimizer = RouteOptimizer::default();
        let request = RouteRequest::point_to_point("restaurant-a", "warehouse", Algorithm::Qaoa);
        let result = optimizer.optimize_seeded(&sample_nodes(), &request, 3).unwrap();

        assert_eq!(result.algorithm, Algorithm::Qaoa);
        assert_eq!(result.mode, RouteMode::Sequential);
        assert_eq!(result.stops, request.stops);
        assert_eq!(result.path.first().map(String::as_str), Some("restaurant-a"));
        assert_eq!(result.path.last().map(String::as_str), Some("warehouse"));
    }

    #[test]
    fn test_execution_time_serializes_as_seconds() {
        let optimizer = RouteOptimizer::default();
        let request = RouteRequest::point_to_point("restaurant-a", "warehouse", Algorithm::Dijkstra);
        let result = optimizer.optimize_seeded(&sample_nodes(), &request, 1).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["execution_time"].is_f64());

        let back: RouteResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.path, result.path);
        assert!((back.execution_time.as_secs_f64() - result.execution_time.as_secs_f64()).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_solving() {
        let config = PlannerConfig::default()
            .with_tour(crate::config::TourConfig::default().with_min_temperature(-1.0));
        let optimizer = RouteOptimizer::new(config);
        let stops = vec!["restaurant-a".into(), "warehouse".into(), "customer-4".into()];
        let err = optimizer
            .optimize_seeded(&sample_nodes(), &RouteRequest::tour(stops), 1)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
