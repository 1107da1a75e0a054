use thiserror::Error;

/// Convenient result alias for the route planner.
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-facing planner errors.
///
/// Missing paths and infeasible tours inside the engine are values
/// ([`crate::path::Route::unreachable`]); they only become an [`Error`] once
/// the optimizer turns them into a request outcome.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested stop id is not part of the supplied node set.
    #[error("node not found: {id}")]
    UnknownNode { id: String },

    /// The algorithm tag is neither `dijkstra` nor `qaoa`.
    #[error("invalid algorithm '{value}'; use 'dijkstra' or 'qaoa'")]
    InvalidAlgorithm { value: String },

    /// The route mode tag is neither `sequential` nor `tour`.
    #[error("invalid route mode '{value}'; use 'sequential' or 'tour'")]
    InvalidMode { value: String },

    /// Tour request exceeds the admission cap.
    #[error("tour requests are limited to {max} stops, got {count}")]
    TooManyStops { count: usize, max: usize },

    /// Sequential request without both a start and an end.
    #[error("a route needs at least 2 stops, got {count}")]
    NotEnoughStops { count: usize },

    /// A configuration value is outside its valid range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The engine returned an empty path.
    #[error("no path found between {start} and {end}")]
    NoPathFound { start: String, end: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
