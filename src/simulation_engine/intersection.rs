use crate::control_system::intersection_lights::IntersectionLights;
use crate::error::{NetworkError, NetworkResult};
use crate::global_variables::{LINE_INFO_SEPARATOR, SPEED_REDUCTION_AMOUNT, SPEED_REDUCTION_CUTOFF};
use crate::simulation_engine::route::{LightState, Route};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Represents a traffic intersection (node).
///
/// Owns every route that ends here. Two intersections are equal iff their
/// IDs are equal.
#[derive(Debug, Clone)]
pub struct Intersection {
    /// Unique identifier for the intersection.
    id: String,
    /// Incoming routes, in the order they were connected.
    connections: Vec<Route>,
    /// Traffic light controller, if lights have been added.
    lights: Option<IntersectionLights>,
}

impl Intersection {
    /// Creates an intersection with no incoming routes and no lights.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            connections: Vec::new(),
            lights: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Routes that end at this intersection.
    pub fn connections(&self) -> &[Route] {
        &self.connections
    }

    /// IDs of the intersections that have a route into this one.
    pub fn connected_intersections(&self) -> Vec<&str> {
        self.connections.iter().map(Route::from).collect()
    }

    pub fn has_traffic_lights(&self) -> bool {
        self.lights.is_some()
    }

    pub fn traffic_lights(&self) -> Option<&IntersectionLights> {
        self.lights.as_ref()
    }

    /// Returns the incoming route that starts at `from`.
    pub fn get_connection(&self, from: &str) -> NetworkResult<&Route> {
        self.connections
            .iter()
            .find(|route| route.from() == from)
            .ok_or_else(|| self.route_not_found(from))
    }

    pub(crate) fn get_connection_mut(&mut self, from: &str) -> NetworkResult<&mut Route> {
        let missing = self.route_not_found(from);
        self.connections
            .iter_mut()
            .find(|route| route.from() == from)
            .ok_or(missing)
    }

    fn route_not_found(&self, from: &str) -> NetworkError {
        NetworkError::RouteNotFound {
            from: from.to_string(),
            to: self.id.clone(),
        }
    }

    /// Adds an incoming route from the intersection with ID `from`.
    ///
    /// If this intersection already has lights, the new route gets a red
    /// light. It is not part of the established order and so is never
    /// scheduled green until lights are added again with a new order.
    pub fn add_connection(&mut self, from: &str, default_speed: i32) -> NetworkResult<()> {
        if self.connections.iter().any(|route| route.from() == from) {
            return Err(NetworkError::DuplicateRoute {
                from: from.to_string(),
                to: self.id.clone(),
            });
        }
        if default_speed < 0 {
            return Err(NetworkError::InvalidArgument(format!(
                "default speed must be non-negative, got {}",
                default_speed
            )));
        }

        let mut route = Route::new(from, &self.id, default_speed);
        if let Some(lights) = &self.lights {
            route.set_light_state(Some(lights.light_state_of(from)));
        }
        self.connections.push(route);
        Ok(())
    }

    /// Replaces this intersection's lights with a controller cycling through
    /// `order`, a list of origin IDs.
    ///
    /// `order` must be a non-empty permutation of the current incoming
    /// routes. Nothing is changed if validation fails.
    pub fn add_traffic_lights(
        &mut self,
        order: &[String],
        yellow_time: i32,
        duration: i32,
    ) -> NetworkResult<()> {
        if yellow_time < 1 || duration <= yellow_time {
            return Err(NetworkError::InvalidArgument(format!(
                "yellow time {} and duration {} are invalid",
                yellow_time, duration
            )));
        }

        let unique: HashSet<&str> = order.iter().map(String::as_str).collect();
        let is_permutation = order.len() == self.connections.len()
            && unique.len() == order.len()
            && self
                .connections
                .iter()
                .all(|route| unique.contains(route.from()));
        if order.is_empty() || !is_permutation {
            return Err(NetworkError::InvalidOrder(format!(
                "[{}] is not a permutation of the routes into {}",
                order.join(", "),
                self.id
            )));
        }

        self.lights = Some(IntersectionLights::new(
            order.to_vec(),
            yellow_time,
            duration,
        ));
        self.sync_light_states();
        Ok(())
    }

    /// Changes the duration of this intersection's light cycle.
    pub fn set_light_duration(&mut self, duration: i32) -> NetworkResult<()> {
        let lights = self.lights.as_mut().ok_or_else(|| {
            NetworkError::InvalidState(format!("intersection {} has no traffic lights", self.id))
        })?;
        if duration <= lights.yellow_time() {
            return Err(NetworkError::InvalidArgument(format!(
                "duration {} must exceed yellow time {}",
                duration,
                lights.yellow_time()
            )));
        }
        lights.set_duration(duration);
        Ok(())
    }

    /// Lowers every incoming speed sign showing at least 50 by 10, never
    /// going below 50. Routes without a sign are left alone.
    pub fn reduce_incoming_speed_signs(&mut self) {
        for route in self.connections.iter_mut() {
            let Some(current) = route.speed_sign() else {
                continue;
            };
            if current >= SPEED_REDUCTION_CUTOFF {
                let reduced = (current - SPEED_REDUCTION_AMOUNT).max(SPEED_REDUCTION_CUTOFF);
                route.add_speed_sign(reduced);
            }
        }
    }

    /// Advances the lights and every incoming route's sensors by one second.
    pub fn one_second(&mut self) {
        for route in self.connections.iter_mut() {
            route.one_second();
        }
        let changed = self
            .lights
            .as_mut()
            .map(IntersectionLights::one_second)
            .unwrap_or(false);
        if !changed {
            return;
        }
        self.sync_light_states();
        if let Some(lights) = &self.lights {
            if let Some(active) = lights.active_route() {
                log::debug!(
                    "Intersection {}: route from {} is now {:?}",
                    self.id,
                    active,
                    lights.light_state_of(active)
                );
            }
        }
    }

    /// Copies the controller's view of each route onto the route itself.
    fn sync_light_states(&mut self) {
        if let Some(lights) = &self.lights {
            for route in self.connections.iter_mut() {
                route.set_light_state(Some(lights.light_state_of(route.from())));
            }
        }
    }

    /// Signal currently shown to the route from `from`, if it has one.
    pub fn light_state_of(&self, from: &str) -> Option<LightState> {
        self.get_connection(from).ok().and_then(Route::light_state)
    }
}

impl PartialEq for Intersection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Intersection {}

impl Hash for Intersection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(lights) = &self.lights {
            write!(f, "{}{}", LINE_INFO_SEPARATOR, lights)?;
        }
        Ok(())
    }
}
