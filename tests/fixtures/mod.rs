#![allow(dead_code)]

//! Test fixtures for route-planner.
//!
//! Provides real New York City coordinates and helpers that turn them into
//! planner nodes.

pub mod nyc_locations;
