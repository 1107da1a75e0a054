//! route-planner core
//!
//! Route optimization over small sets of geolocated nodes: haversine
//! distances, a complete graph per request, Dijkstra or distance-weighted
//! path sampling per segment, and annealed tours over the whole snapshot.

pub mod composer;
pub mod config;
pub mod dijkstra;
pub mod error;
pub mod graph;
pub mod haversine;
pub mod optimizer;
pub mod path;
pub mod sample;
pub mod sampler;
pub mod tour;
pub mod traits;

pub use composer::{Algorithm, RouteComposer, RouteMode};
pub use config::{PlannerConfig, SamplerConfig, TourConfig};
pub use dijkstra::{Dijkstra, shortest_path};
pub use error::{Error, Result};
pub use graph::{Edge, GraphSnapshot, GraphVisualization, Node, VisEdge, build_graph, build_graph_with};
pub use haversine::{Haversine, haversine_km};
pub use optimizer::{RouteOptimizer, RouteRequest, RouteResult};
pub use path::{Route, path_distance};
pub use sample::sample_nodes;
pub use sampler::PathSampler;
pub use tour::TourSampler;
pub use traits::{DistanceMetric, SegmentSolver};
