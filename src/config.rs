//! Planner configuration.
//!
//! Immutable values shared by every request; nothing here is mutated while
//! solving.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default hop cutoff for simple-path enumeration.
pub const DEFAULT_MAX_HOPS: usize = 5;

/// Default admission cap on tour stops.
pub const DEFAULT_MAX_TOUR_STOPS: usize = 5;

/// Settings for the probabilistic path sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Maximum number of edges in an enumerated candidate path.
    pub max_hops: usize,
    /// Enumeration budget; exceeding it counts as a sampler failure.
    pub max_candidates: usize,
    /// Exponential decay applied to normalized distances.
    pub decay: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            max_candidates: 250_000,
            decay: 2.0,
        }
    }
}

impl SamplerConfig {
    pub fn with_max_hops(mut self, hops: usize) -> Self {
        self.max_hops = hops;
        self
    }

    pub fn with_max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }
}

/// Settings for the annealed tour search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Starting temperature, relative to the mean edge weight.
    pub initial_temperature: f64,
    /// Search stops once the temperature drops below this.
    pub min_temperature: f64,
    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,
    /// Neighbour evaluations per temperature level.
    pub iterations_per_temperature: usize,
    /// Return the nearest-neighbour tour instead of failing when the search
    /// cannot produce a finite tour.
    pub nearest_neighbor_fallback: bool,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            min_temperature: 1e-3,
            cooling_rate: 0.95,
            iterations_per_temperature: 50,
            nearest_neighbor_fallback: false,
        }
    }
}

impl TourConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_nearest_neighbor_fallback(mut self, enabled: bool) -> Self {
        self.nearest_neighbor_fallback = enabled;
        self
    }

    /// Reject schedules that cannot cool down to `min_temperature`.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(invalid(format!(
                "tour.initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if self.min_temperature.is_nan() || self.min_temperature <= 0.0 {
            return Err(invalid(format!(
                "tour.min_temperature must be positive, got {}",
                self.min_temperature
            )));
        }
        if self.cooling_rate <= 0.0 || !(0.0..1.0).contains(&self.cooling_rate) {
            return Err(invalid(format!(
                "tour.cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        Ok(())
    }
}

/// Top-level planner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub sampler: SamplerConfig,
    pub tour: TourConfig,
    /// Admission cap on tour requests, enforced before any solver runs.
    pub max_tour_stops: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            tour: TourConfig::default(),
            max_tour_stops: DEFAULT_MAX_TOUR_STOPS,
        }
    }
}

impl PlannerConfig {
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_tour(mut self, tour: TourConfig) -> Self {
        self.tour = tour;
        self
    }

    pub fn with_max_tour_stops(mut self, n: usize) -> Self {
        self.max_tour_stops = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.tour.validate()
    }
}

fn invalid(reason: String) -> Error {
    Error::InvalidConfig { reason }
}
