// control_system/mod.rs
pub mod intersection_lights;
