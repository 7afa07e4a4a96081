//! Road network model: intersections joined by directed routes, per
//! intersection traffic-light controllers, route sensors, and a loader for
//! the line-oriented network file format.

pub mod config;
pub mod control_system;
pub mod error;
pub mod file_loader;
pub mod global_variables;
pub mod monitoring;
pub mod simulation_engine;

pub use control_system::intersection_lights::IntersectionLights;
pub use error::{LoadError, MonitoringError, NetworkError, SensorError};
pub use file_loader::{load_network, parse_network, NetworkInitialiser};
pub use simulation_engine::intersection::Intersection;
pub use simulation_engine::network::Network;
pub use simulation_engine::route::{LightState, Route};
pub use simulation_engine::sensors::{Sensor, SensorKind};
