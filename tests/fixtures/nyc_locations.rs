//! Real New York City locations for realistic test fixtures.

use route_planner::Node;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(id: &'static str, name: &'static str, lat: f64, lng: f64) -> Self {
        Self { id, name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn to_node(&self) -> Node {
        Node::new(self.id, self.name, self.lat, self.lng)
    }
}

// ============================================================================
// Manhattan landmarks (good for depot/start locations)
// ============================================================================

pub const LANDMARKS: &[Location] = &[
    Location::new("times-square", "Times Square", 40.7580, -73.9855),
    Location::new("grand-central", "Grand Central Terminal", 40.7527, -73.9772),
    Location::new("union-square", "Union Square", 40.7359, -73.9911),
    Location::new("battery-park", "Battery Park", 40.7033, -74.0170),
    Location::new("columbus-circle", "Columbus Circle", 40.7681, -73.9819),
];

// ============================================================================
// Brooklyn and Queens delivery points
// ============================================================================

pub const OUTER_BOROUGHS: &[Location] = &[
    Location::new("barclays-center", "Barclays Center", 40.6826, -73.9754),
    Location::new("prospect-park", "Prospect Park", 40.6602, -73.9690),
    Location::new("long-island-city", "Long Island City", 40.7447, -73.9485),
    Location::new("astoria", "Astoria", 40.7644, -73.9235),
];

/// All fixture locations as planner nodes, landmarks first.
pub fn all_nodes() -> Vec<Node> {
    LANDMARKS
        .iter()
        .chain(OUTER_BOROUGHS)
        .map(Location::to_node)
        .collect()
}

/// The first `n` fixture ids.
pub fn first_ids(n: usize) -> Vec<String> {
    all_nodes().into_iter().take(n).map(|node| node.id).collect()
}
