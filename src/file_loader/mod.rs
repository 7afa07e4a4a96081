pub mod network_initialiser;

// Re-export the loader entry points
pub use network_initialiser::{load_network, parse_network, NetworkInitialiser};
