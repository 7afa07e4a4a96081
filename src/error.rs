//! Error types for the network graph, sensors, and the network file loader.

use thiserror::Error;

/// Failures reported by the graph mutation and lookup API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// No intersection with this ID exists in the network
    #[error("intersection not found: {0}")]
    IntersectionNotFound(String),

    /// No route exists for the ordered pair
    #[error("no route from {from} to {to}")]
    RouteNotFound { from: String, to: String },

    /// An intersection with this ID is already present
    #[error("intersection already exists: {0}")]
    DuplicateIntersection(String),

    /// A route for the ordered pair is already present
    #[error("route from {from} to {to} already exists")]
    DuplicateRoute { from: String, to: String },

    /// The route already carries a sensor of this kind
    #[error("route from {from} to {to} already has a {kind} sensor")]
    DuplicateSensor {
        kind: String,
        from: String,
        to: String,
    },

    /// Out-of-range number or malformed identifier
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Light order is empty or not a permutation of the incoming routes
    #[error("invalid light order: {0}")]
    InvalidOrder(String),

    /// Operation not allowed in the entity's current state
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Failures when building a sensor from its parts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SensorError {
    #[error("unknown sensor kind: {0}")]
    UnknownKind(String),

    #[error("sensor threshold must be positive, got {0}")]
    InvalidThreshold(i32),

    #[error("sensor data must be non-empty and non-negative")]
    InvalidData,
}

impl From<SensorError> for NetworkError {
    fn from(err: SensorError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Failures when loading a network file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("failed to read network file: {0}")]
    Io(#[from] std::io::Error),

    /// The contents violate the network file format or its semantic rules
    #[error("invalid network: {0}")]
    InvalidNetwork(String),
}

// Any graph or sensor rule broken while replaying a file makes the file invalid.
impl From<NetworkError> for LoadError {
    fn from(err: NetworkError) -> Self {
        Self::InvalidNetwork(err.to_string())
    }
}

impl From<SensorError> for LoadError {
    fn from(err: SensorError) -> Self {
        Self::InvalidNetwork(err.to_string())
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;
pub type LoadResult<T> = Result<T, LoadError>;

/// Failures when writing congestion reports.
#[derive(Debug, Error)]
pub enum MonitoringError {
    #[error("failed to open report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write csv record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to encode json report: {0}")]
    Json(#[from] serde_json::Error),
}
