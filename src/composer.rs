//! Multi-stop route composition.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::dijkstra::Dijkstra;
use crate::error::Error;
use crate::graph::GraphSnapshot;
use crate::path::Route;
use crate::sampler::PathSampler;
use crate::tour::TourSampler;
use crate::traits::SegmentSolver;

/// Segment algorithm selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Deterministic Dijkstra shortest paths.
    #[default]
    Dijkstra,
    /// Distance-weighted path sampling with Dijkstra fallback.
    Qaoa,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Qaoa => "qaoa",
        };
        f.write_str(value)
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "qaoa" => Ok(Algorithm::Qaoa),
            _ => Err(Error::InvalidAlgorithm {
                value: value.to_string(),
            }),
        }
    }
}

/// How a multi-stop request is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Visit stops in the given order.
    #[default]
    Sequential,
    /// Closed tour over the whole snapshot; stop order is ignored.
    Tour,
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteMode::Sequential => "sequential",
            RouteMode::Tour => "tour",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(RouteMode::Sequential),
            "tour" => Ok(RouteMode::Tour),
            _ => Err(Error::InvalidMode {
                value: value.to_string(),
            }),
        }
    }
}

/// Stitches per-segment solves into one route.
#[derive(Debug, Clone, Default)]
pub struct RouteComposer {
    sampler: PathSampler,
    tour: TourSampler,
}

impl RouteComposer {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            sampler: PathSampler::new(config.sampler.clone()),
            tour: TourSampler::new(config.tour.clone()),
        }
    }

    /// Compose a route through `stops`.
    ///
    /// Sequential mode with fewer than 2 stops returns [`Route::stationary`];
    /// a failed segment fails the whole composition. Tour mode ignores the
    /// stop order and starts the cycle at the first stop when possible.
    pub fn compose<S: AsRef<str>>(
        &self,
        graph: &GraphSnapshot,
        stops: &[S],
        mode: RouteMode,
        algorithm: Algorithm,
        rng: &mut dyn RngCore,
    ) -> Route {
        match mode {
            RouteMode::Sequential => self.compose_sequential(graph, stops, algorithm, rng),
            RouteMode::Tour => {
                let start = stops.first().map(AsRef::as_ref);
                self.tour.solve_tour_from(graph, start, rng)
            }
        }
    }

    fn compose_sequential<S: AsRef<str>>(
        &self,
        graph: &GraphSnapshot,
        stops: &[S],
        algorithm: Algorithm,
        rng: &mut dyn RngCore,
    ) -> Route {
        if stops.len() < 2 {
            return Route::stationary();
        }

        let solver: &dyn SegmentSolver = match algorithm {
            Algorithm::Dijkstra => &Dijkstra,
            Algorithm::Qaoa => &self.sampler,
        };

        let mut route = Route::stationary();
        for pair in stops.windows(2) {
            let (start, end) = (pair[0].as_ref(), pair[1].as_ref());
            let segment = solver.solve_segment(graph, start, end, rng);
            if !segment.is_found() {
                debug!(start, end, %algorithm, "segment failed, dropping composition");
                return Route::unreachable();
            }
            route.extend_with(segment);
        }

        route
    }
}
