use crate::global_variables::{LINE_INFO_SEPARATOR, LINE_LIST_SEPARATOR};
use crate::simulation_engine::route::LightState;
use std::fmt;

/// Timed controller that gives exactly one incoming route a green (then
/// yellow) light at a time, cycling through a fixed order.
///
/// Routes are referred to by the ID of the intersection they originate
/// from, which is unique among an intersection's incoming routes. Every
/// route other than the active one is red.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionLights {
    /// Origin IDs of the controlled routes, in the order they turn green.
    order: Vec<String>,
    /// Seconds the active route spends yellow. Fixed once constructed.
    yellow_time: i32,
    /// Seconds of green plus yellow for each route.
    duration: i32,
    /// Index into `order` of the route currently green or yellow.
    active: usize,
    /// Green or yellow, never red.
    active_state: LightState,
    /// Seconds elapsed in the active route's current state.
    seconds_passed: i32,
}

impl IntersectionLights {
    /// Creates lights with the first route in `order` green.
    ///
    /// Timing bounds are enforced by `Intersection::add_traffic_lights`.
    pub(crate) fn new(order: Vec<String>, yellow_time: i32, duration: i32) -> Self {
        Self {
            order,
            yellow_time,
            duration,
            active: 0,
            active_state: LightState::Green,
            seconds_passed: 0,
        }
    }

    pub fn yellow_time(&self) -> i32 {
        self.yellow_time
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// Origin IDs of the controlled routes in green order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Origin ID of the route that is currently green or yellow.
    pub fn active_route(&self) -> Option<&str> {
        self.order.get(self.active).map(String::as_str)
    }

    /// Signal shown to the route coming from `from`. Routes outside the
    /// order are always red.
    pub fn light_state_of(&self, from: &str) -> LightState {
        match self.active_route() {
            Some(active) if active == from => self.active_state,
            _ => LightState::Red,
        }
    }

    /// Changes the cycle duration and restarts the timer of the active
    /// route's current state without changing that state.
    ///
    /// Callers guarantee `duration > yellow_time`.
    pub fn set_duration(&mut self, duration: i32) {
        self.duration = duration;
        self.seconds_passed = 0;
    }

    /// Advances the lights by one second. Returns true if any signal changed.
    pub fn one_second(&mut self) -> bool {
        if self.order.is_empty() {
            return false;
        }
        self.seconds_passed += 1;

        match self.active_state {
            LightState::Green if self.seconds_passed >= self.duration - self.yellow_time => {
                self.active_state = LightState::Yellow;
                self.seconds_passed = 0;
                true
            }
            LightState::Yellow if self.seconds_passed >= self.yellow_time => {
                self.active = (self.active + 1) % self.order.len();
                self.active_state = LightState::Green;
                self.seconds_passed = 0;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for IntersectionLights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.duration,
            LINE_INFO_SEPARATOR,
            self.order.join(&LINE_LIST_SEPARATOR.to_string())
        )
    }
}
