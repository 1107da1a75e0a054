//! Demo node set: restaurants, customers and depots around New York City.

use crate::graph::Node;

/// Ten sample delivery nodes with stable slug ids.
pub fn sample_nodes() -> Vec<Node> {
    [
        ("restaurant-a", "Restaurant A", 40.7128, -74.0060),
        ("restaurant-b", "Restaurant B", 40.7589, -73.9851),
        ("restaurant-c", "Restaurant C", 40.6892, -74.0445),
        ("customer-1", "Customer 1", 40.7505, -73.9934),
        ("customer-2", "Customer 2", 40.7282, -74.0776),
        ("warehouse", "Warehouse", 40.7831, -73.9712),
        ("distribution-center", "Distribution Center", 40.6782, -73.9442),
        ("restaurant-d", "Restaurant D", 40.7614, -73.9776),
        ("customer-3", "Customer 3", 40.7400, -73.9897),
        ("customer-4", "Customer 4", 40.6928, -73.9903),
    ]
    .into_iter()
    .map(|(id, name, lat, lng)| Node::new(id, name, lat, lng))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_ids_are_unique() {
        let nodes = sample_nodes();
        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(nodes.len(), 10);
        assert_eq!(ids.len(), 10);
    }
}
