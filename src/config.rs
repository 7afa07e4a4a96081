use crate::global_variables::{DEFAULT_TICKS, DEFAULT_TICK_MS};
use clap::Parser;
use std::path::PathBuf;

/// Arguments for `network_check_main`.
#[derive(Debug, Parser)]
#[command(name = "network_check_main", about = "Validate a network file and print its canonical form")]
pub struct CheckArgs {
    /// Network file to load
    pub network: PathBuf,
}

/// Arguments for `simulation_main`.
#[derive(Debug, Parser)]
#[command(name = "simulation_main", about = "Step a road network one simulated second at a time")]
pub struct SimulationArgs {
    /// Network file to load
    pub network: PathBuf,
    /// Number of simulated seconds to run
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    pub ticks: u64,
    /// Wall-clock milliseconds between simulated seconds (0 runs flat out)
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,
    /// Append per-second congestion rows to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Print the final congestion report as JSON
    #[arg(long)]
    pub json: bool,
}
