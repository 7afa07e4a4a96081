use crate::error::MonitoringError;
use crate::simulation_engine::network::Network;
use crate::simulation_engine::route::{LightState, Route};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// One route's state at a given simulated second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCongestionRecord {
    pub tick: u64,
    pub from: String,
    pub to: String,
    pub speed: i32,
    pub light_state: Option<LightState>,
    pub congestion: u32,
}

impl RouteCongestionRecord {
    fn from_route(route: &Route, tick: u64) -> Self {
        Self {
            tick,
            from: route.from().to_string(),
            to: route.to().to_string(),
            speed: route.speed(),
            light_state: route.light_state(),
            congestion: route.congestion(),
        }
    }
}

/// Snapshot of every route in a network, sorted by origin then destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongestionReport {
    pub tick: u64,
    pub routes: Vec<RouteCongestionRecord>,
}

impl CongestionReport {
    pub fn from_network(network: &Network, tick: u64) -> Self {
        let mut routes: Vec<RouteCongestionRecord> = network
            .routes()
            .map(|route| RouteCongestionRecord::from_route(route, tick))
            .collect();
        routes.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
        Self { tick, routes }
    }

    /// Route with the highest congestion; ties go to the first in sort order.
    pub fn most_congested(&self) -> Option<&RouteCongestionRecord> {
        self.routes
            .iter()
            .rev()
            .max_by_key(|record| record.congestion)
    }

    pub fn to_json(&self) -> Result<String, MonitoringError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Appends records to a CSV file. Headers are written only when the file is
/// created.
pub fn log_to_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<(), MonitoringError> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
