// simulation_engine/mod.rs
pub mod intersection;
pub mod network;
pub mod route;
pub mod sensors;
