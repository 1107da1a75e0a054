//! Core seams for the route planner.
//!
//! Kept minimal: the graph builder only needs a distance metric, and the
//! composer only needs something that can route one segment.

use rand::RngCore;

use crate::graph::GraphSnapshot;
use crate::path::Route;

/// Distance between two (lat, lng) coordinates in kilometers.
pub trait DistanceMetric {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64;

    /// Pairwise distance matrix indexed by the provided location order.
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let n = locations.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    matrix[i][j] = self.distance_km(*from, *to);
                }
            }
        }

        matrix
    }
}

/// Routes a single start/end segment over a graph snapshot.
///
/// Implementations must not fault on data-dependent failures; an unreachable
/// end is reported as [`Route::unreachable`].
pub trait SegmentSolver {
    fn solve_segment(
        &self,
        graph: &GraphSnapshot,
        start: &str,
        end: &str,
        rng: &mut dyn RngCore,
    ) -> Route;
}
