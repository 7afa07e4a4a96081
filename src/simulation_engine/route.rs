use crate::error::{NetworkError, NetworkResult};
use crate::global_variables::LINE_INFO_SEPARATOR;
use crate::simulation_engine::sensors::{Sensor, SensorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Possible states of a route's traffic light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightState {
    Green,
    Yellow,
    Red,
}

/// A directed road from one intersection into another.
///
/// Routes are owned by their destination intersection and refer to their
/// origin by ID only.
#[derive(Debug, Clone)]
pub struct Route {
    /// Origin intersection ID.
    from: String,
    /// Destination intersection ID.
    to: String,
    /// Speed limit when no electronic sign is present.
    default_speed: i32,
    /// Present iff the destination intersection has traffic lights.
    light_state: Option<LightState>,
    /// Displayed speed of the electronic speed sign, if one was added.
    speed_sign: Option<i32>,
    /// At most one sensor per kind.
    sensors: BTreeMap<SensorKind, Sensor>,
}

impl Route {
    pub(crate) fn new(from: &str, to: &str, default_speed: i32) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            default_speed,
            light_state: None,
            speed_sign: None,
            sensors: BTreeMap::new(),
        }
    }

    /// Composite identifier `from:to`.
    pub fn id(&self) -> String {
        format!("{}{}{}", self.from, LINE_INFO_SEPARATOR, self.to)
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn default_speed(&self) -> i32 {
        self.default_speed
    }

    /// Current speed limit: the sign's displayed speed if there is a sign,
    /// otherwise the default speed.
    pub fn speed(&self) -> i32 {
        self.speed_sign.unwrap_or(self.default_speed)
    }

    pub fn has_speed_sign(&self) -> bool {
        self.speed_sign.is_some()
    }

    pub fn speed_sign(&self) -> Option<i32> {
        self.speed_sign
    }

    pub fn light_state(&self) -> Option<LightState> {
        self.light_state
    }

    pub(crate) fn set_light_state(&mut self, state: Option<LightState>) {
        self.light_state = state;
    }

    pub(crate) fn add_speed_sign(&mut self, initial_speed: i32) {
        self.speed_sign = Some(initial_speed);
    }

    pub(crate) fn set_speed_limit(&mut self, new_limit: i32) -> NetworkResult<()> {
        match self.speed_sign.as_mut() {
            Some(current) => {
                *current = new_limit;
                Ok(())
            }
            None => Err(NetworkError::InvalidState(format!(
                "route {} has no speed sign",
                self.id()
            ))),
        }
    }

    /// Sensors in kind order.
    pub fn sensors(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.values()
    }

    pub fn sensor(&self, kind: SensorKind) -> Option<&Sensor> {
        self.sensors.get(&kind)
    }

    pub(crate) fn add_sensor(&mut self, sensor: Sensor) -> NetworkResult<()> {
        let kind = sensor.kind();
        if self.sensors.contains_key(&kind) {
            return Err(NetworkError::DuplicateSensor {
                kind: kind.to_string(),
                from: self.from.clone(),
                to: self.to.clone(),
            });
        }
        self.sensors.insert(kind, sensor);
        Ok(())
    }

    /// Average congestion over all sensors, rounded, or 0 without sensors.
    pub fn congestion(&self) -> u32 {
        if self.sensors.is_empty() {
            return 0;
        }
        let total: u32 = self.sensors.values().map(Sensor::congestion).sum();
        (total as f32 / self.sensors.len() as f32).round() as u32
    }

    /// Advances every sensor on this route by one second.
    pub(crate) fn one_second(&mut self) {
        for sensor in self.sensors.values_mut() {
            sensor.one_second();
        }
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Route {}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = LINE_INFO_SEPARATOR;
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.from,
            self.to,
            self.default_speed,
            self.sensors.len()
        )?;
        if let Some(speed) = self.speed_sign {
            write!(f, "{sep}{}", speed)?;
        }
        for sensor in self.sensors.values() {
            write!(f, "\n{}", sensor)?;
        }
        Ok(())
    }
}
