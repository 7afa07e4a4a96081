use crate::error::SensorError;
use crate::global_variables::{LINE_INFO_SEPARATOR, LINE_LIST_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of sensor kinds a route can carry.
///
/// Declaration order matches the alphabetical order of the file codes, so a
/// `BTreeMap<SensorKind, _>` iterates in the order sensors are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensorKind {
    PressurePad,
    SpeedCamera,
    VehicleCount,
}

impl SensorKind {
    /// Two-letter code used in network files.
    pub fn code(self) -> &'static str {
        match self {
            SensorKind::PressurePad => "PP",
            SensorKind::SpeedCamera => "SC",
            SensorKind::VehicleCount => "VC",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SensorKind {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PP" => Ok(SensorKind::PressurePad),
            "SC" => Ok(SensorKind::SpeedCamera),
            "VC" => Ok(SensorKind::VehicleCount),
            other => Err(SensorError::UnknownKind(other.to_string())),
        }
    }
}

/// Data window shared by every sensor kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorReadings {
    data: Vec<i32>,
    threshold: i32,
    time_elapsed: usize,
}

impl SensorReadings {
    fn new(data: Vec<i32>, threshold: i32) -> Result<Self, SensorError> {
        if threshold <= 0 {
            return Err(SensorError::InvalidThreshold(threshold));
        }
        if data.is_empty() || data.iter().any(|&value| value < 0) {
            return Err(SensorError::InvalidData);
        }
        Ok(Self {
            data,
            threshold,
            time_elapsed: 0,
        })
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Reading for the current second; the data window repeats once exhausted.
    pub fn current_value(&self) -> i32 {
        self.data[self.time_elapsed % self.data.len()]
    }

    fn ratio(&self) -> f32 {
        self.current_value() as f32 / self.threshold as f32
    }
}

/// A route sensor. Each variant computes congestion with its own formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sensor {
    /// Counts vehicles waiting on the pad. More vehicles, more congestion.
    PressurePad(SensorReadings),
    /// Reports average speed. Slower traffic, more congestion.
    SpeedCamera(SensorReadings),
    /// Reports vehicles per minute. Lower flow, more congestion.
    VehicleCount(SensorReadings),
}

impl Sensor {
    pub fn new(kind: SensorKind, data: Vec<i32>, threshold: i32) -> Result<Self, SensorError> {
        let readings = SensorReadings::new(data, threshold)?;
        Ok(match kind {
            SensorKind::PressurePad => Sensor::PressurePad(readings),
            SensorKind::SpeedCamera => Sensor::SpeedCamera(readings),
            SensorKind::VehicleCount => Sensor::VehicleCount(readings),
        })
    }

    pub fn kind(&self) -> SensorKind {
        match self {
            Sensor::PressurePad(_) => SensorKind::PressurePad,
            Sensor::SpeedCamera(_) => SensorKind::SpeedCamera,
            Sensor::VehicleCount(_) => SensorKind::VehicleCount,
        }
    }

    pub fn readings(&self) -> &SensorReadings {
        match self {
            Sensor::PressurePad(r) | Sensor::SpeedCamera(r) | Sensor::VehicleCount(r) => r,
        }
    }

    fn readings_mut(&mut self) -> &mut SensorReadings {
        match self {
            Sensor::PressurePad(r) | Sensor::SpeedCamera(r) | Sensor::VehicleCount(r) => r,
        }
    }

    /// Advances the sensor to the next reading in its data window.
    pub fn one_second(&mut self) {
        self.readings_mut().time_elapsed += 1;
    }

    /// Congestion score between 0 and 100 inclusive.
    pub fn congestion(&self) -> u32 {
        match self {
            Sensor::PressurePad(r) => (100.0 * r.ratio()).round().min(100.0) as u32,
            Sensor::SpeedCamera(r) | Sensor::VehicleCount(r) => {
                (100.0 - 100.0 * r.ratio()).round().clamp(0.0, 100.0) as u32
            }
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let readings = self.readings();
        let data = readings
            .data
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(&LINE_LIST_SEPARATOR.to_string());
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.kind(),
            readings.threshold,
            data,
            sep = LINE_INFO_SEPARATOR
        )
    }
}
