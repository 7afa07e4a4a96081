use crate::error::{NetworkError, NetworkResult};
use crate::global_variables::LINE_INFO_SEPARATOR;
use crate::simulation_engine::intersection::Intersection;
use crate::simulation_engine::route::Route;
use crate::simulation_engine::sensors::Sensor;
use std::collections::HashMap;
use std::fmt;

/// Represents the entire road network.
///
/// Intersections are stored by ID; each route lives inside its destination
/// intersection and names its origin by ID, so every route endpoint is
/// guaranteed to be an intersection of this network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    /// All intersections, keyed by their ID.
    intersections: HashMap<String, Intersection>,
    /// Yellow time given to traffic lights added from now on.
    yellow_time: i32,
}

impl Network {
    /// Creates an empty network. Its yellow time is 0 until set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yellow_time(&self) -> i32 {
        self.yellow_time
    }

    /// Sets the yellow time for lights added after this call. Existing
    /// lights keep the yellow time they were created with.
    pub fn set_yellow_time(&mut self, yellow_time: i32) -> NetworkResult<()> {
        if yellow_time < 1 {
            return Err(NetworkError::InvalidArgument(format!(
                "yellow time must be at least 1 second, got {}",
                yellow_time
            )));
        }
        self.yellow_time = yellow_time;
        Ok(())
    }

    /// Adds an intersection with no routes.
    pub fn create_intersection(&mut self, id: &str) -> NetworkResult<()> {
        if self.intersections.contains_key(id) {
            return Err(NetworkError::DuplicateIntersection(id.to_string()));
        }
        if id.contains(LINE_INFO_SEPARATOR) {
            return Err(NetworkError::InvalidArgument(format!(
                "intersection ID {:?} contains '{}'",
                id, LINE_INFO_SEPARATOR
            )));
        }
        if id.trim().is_empty() {
            return Err(NetworkError::InvalidArgument(
                "intersection ID is blank".to_string(),
            ));
        }
        self.intersections
            .insert(id.to_string(), Intersection::new(id));
        Ok(())
    }

    /// Creates a route from `from` to `to`, owned by `to`.
    pub fn connect_intersections(
        &mut self,
        from: &str,
        to: &str,
        default_speed: i32,
    ) -> NetworkResult<()> {
        self.find_intersection(from)?;
        self.find_intersection_mut(to)?
            .add_connection(from, default_speed)
    }

    /// Replaces the lights of `intersection_id` with a controller cycling
    /// through the routes coming from the intersections in `order`.
    pub fn add_lights<S: AsRef<str>>(
        &mut self,
        intersection_id: &str,
        duration: i32,
        order: &[S],
    ) -> NetworkResult<()> {
        let target = self.find_intersection(intersection_id)?;

        let mut resolved = Vec::with_capacity(order.len());
        for from in order {
            let from = from.as_ref();
            self.find_intersection(from)?;
            if target.get_connection(from).is_err() {
                return Err(NetworkError::InvalidOrder(format!(
                    "no route from {} into {}",
                    from, intersection_id
                )));
            }
            resolved.push(from.to_string());
        }
        if resolved.is_empty() {
            return Err(NetworkError::InvalidOrder(format!(
                "empty light order for {}",
                intersection_id
            )));
        }
        if duration <= self.yellow_time {
            return Err(NetworkError::InvalidArgument(format!(
                "duration {} must exceed network yellow time {}",
                duration, self.yellow_time
            )));
        }

        let yellow_time = self.yellow_time;
        self.find_intersection_mut(intersection_id)?
            .add_traffic_lights(&resolved, yellow_time, duration)
    }

    /// Adds an electronic speed sign to the route from `from` to `to`.
    pub fn add_speed_sign(&mut self, from: &str, to: &str, initial_speed: i32) -> NetworkResult<()> {
        let route = self.get_connection_mut(from, to)?;
        if initial_speed < 0 {
            return Err(NetworkError::InvalidArgument(format!(
                "speed sign speed must be non-negative, got {}",
                initial_speed
            )));
        }
        route.add_speed_sign(initial_speed);
        Ok(())
    }

    /// Changes the speed displayed on the route's speed sign.
    pub fn set_speed_limit(&mut self, from: &str, to: &str, new_limit: i32) -> NetworkResult<()> {
        let route = self.get_connection_mut(from, to)?;
        if !route.has_speed_sign() {
            return Err(NetworkError::InvalidState(format!(
                "route {} has no speed sign",
                route.id()
            )));
        }
        if new_limit < 0 {
            return Err(NetworkError::InvalidArgument(format!(
                "speed limit must be non-negative, got {}",
                new_limit
            )));
        }
        route.set_speed_limit(new_limit)
    }

    /// Changes the light cycle duration of an intersection with lights.
    pub fn change_light_duration(&mut self, intersection_id: &str, duration: i32) -> NetworkResult<()> {
        let yellow_time = self.yellow_time;
        let intersection = self.find_intersection_mut(intersection_id)?;
        if !intersection.has_traffic_lights() {
            return Err(NetworkError::InvalidState(format!(
                "intersection {} has no traffic lights",
                intersection_id
            )));
        }
        if duration <= yellow_time {
            return Err(NetworkError::InvalidArgument(format!(
                "duration {} must exceed network yellow time {}",
                duration, yellow_time
            )));
        }
        intersection.set_light_duration(duration)
    }

    /// Returns the route from `from` to `to`.
    pub fn get_connection(&self, from: &str, to: &str) -> NetworkResult<&Route> {
        self.find_intersection(from)?;
        self.find_intersection(to)?.get_connection(from)
    }

    fn get_connection_mut(&mut self, from: &str, to: &str) -> NetworkResult<&mut Route> {
        self.find_intersection(from)?;
        self.find_intersection_mut(to)?.get_connection_mut(from)
    }

    /// Adds a sensor to the route; a route holds at most one sensor per kind.
    pub fn add_sensor(&mut self, from: &str, to: &str, sensor: Sensor) -> NetworkResult<()> {
        self.get_connection_mut(from, to)?.add_sensor(sensor)
    }

    /// Congestion of the route from `from` to `to`, between 0 and 100.
    pub fn get_congestion(&self, from: &str, to: &str) -> NetworkResult<u32> {
        Ok(self.get_connection(from, to)?.congestion())
    }

    pub fn find_intersection(&self, id: &str) -> NetworkResult<&Intersection> {
        self.intersections
            .get(id)
            .ok_or_else(|| NetworkError::IntersectionNotFound(id.to_string()))
    }

    fn find_intersection_mut(&mut self, id: &str) -> NetworkResult<&mut Intersection> {
        self.intersections
            .get_mut(id)
            .ok_or_else(|| NetworkError::IntersectionNotFound(id.to_string()))
    }

    /// Adds the route `to` -> `from` mirroring the existing route `from` ->
    /// `to`: same current speed, and a speed sign if the forward route has one.
    pub fn make_two_way(&mut self, from: &str, to: &str) -> NetworkResult<()> {
        let one_way = self.get_connection(from, to)?;
        let speed = one_way.speed();
        let has_sign = one_way.has_speed_sign();

        let origin = self.find_intersection_mut(from)?;
        if origin.get_connection(to).is_ok() {
            return Err(NetworkError::InvalidState(format!(
                "route from {} to {} already exists",
                to, from
            )));
        }
        origin.add_connection(to, speed)?;
        if has_sign {
            origin.get_connection_mut(to)?.add_speed_sign(speed);
        }
        Ok(())
    }

    /// Applies `Intersection::reduce_incoming_speed_signs` to one intersection.
    pub fn reduce_incoming_speed_signs(&mut self, intersection_id: &str) -> NetworkResult<()> {
        self.find_intersection_mut(intersection_id)?
            .reduce_incoming_speed_signs();
        Ok(())
    }

    /// Intersections in no particular order.
    pub fn intersections(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.values()
    }

    /// Every route in the network, in no particular order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.intersections
            .values()
            .flat_map(|intersection| intersection.connections().iter())
    }

    /// Advances every intersection's lights and every sensor by one second.
    pub fn one_second(&mut self) {
        for intersection in self.intersections.values_mut() {
            intersection.one_second();
        }
    }
}

impl PartialEq for Network {
    fn eq(&self, other: &Self) -> bool {
        self.intersections.len() == other.intersections.len()
            && self
                .intersections
                .keys()
                .all(|id| other.intersections.contains_key(id))
    }
}

impl Eq for Network {}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut intersection_lines: Vec<String> =
            self.intersections().map(ToString::to_string).collect();
        intersection_lines.sort();
        let mut route_lines: Vec<String> = self.routes().map(ToString::to_string).collect();
        route_lines.sort();

        write!(
            f,
            "{}\n{}\n{}",
            intersection_lines.len(),
            route_lines.len(),
            self.yellow_time
        )?;
        for line in intersection_lines.iter().chain(route_lines.iter()) {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_engine::route::LightState;
    use crate::simulation_engine::sensors::SensorKind;

    fn network_with(ids: &[&str]) -> Network {
        let mut network = Network::new();
        network.set_yellow_time(1).unwrap();
        for id in ids {
            network.create_intersection(id).unwrap();
        }
        network
    }

    #[test]
    fn create_intersection_validates_ids() {
        let mut network = network_with(&["A"]);
        assert_eq!(
            network.create_intersection("A"),
            Err(NetworkError::DuplicateIntersection("A".to_string()))
        );
        assert!(matches!(
            network.create_intersection("B:C"),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            network.create_intersection("   "),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            network.create_intersection(""),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert_eq!(network.intersections().count(), 1);
    }

    #[test]
    fn set_yellow_time_rejects_zero() {
        let mut network = Network::new();
        assert_eq!(network.yellow_time(), 0);
        assert!(network.set_yellow_time(0).is_err());
        network.set_yellow_time(3).unwrap();
        assert_eq!(network.yellow_time(), 3);
    }

    #[test]
    fn connect_intersections_errors() {
        let mut network = network_with(&["A", "B"]);
        assert_eq!(
            network.connect_intersections("A", "Q", 50),
            Err(NetworkError::IntersectionNotFound("Q".to_string()))
        );
        assert_eq!(
            network.connect_intersections("Q", "A", 50),
            Err(NetworkError::IntersectionNotFound("Q".to_string()))
        );
        assert!(matches!(
            network.connect_intersections("A", "B", -5),
            Err(NetworkError::InvalidArgument(_))
        ));
        network.connect_intersections("A", "B", 50).unwrap();
        assert!(matches!(
            network.connect_intersections("A", "B", 60),
            Err(NetworkError::DuplicateRoute { .. })
        ));
        assert!(matches!(
            network.connect_intersections("A", "B", -5),
            Err(NetworkError::DuplicateRoute { .. })
        ));
        // Self loops are allowed.
        network.connect_intersections("A", "A", 30).unwrap();
        assert_eq!(network.get_connection("A", "A").unwrap().speed(), 30);
        assert_eq!(network.get_connection("A", "B").unwrap().id(), "A:B");
    }

    #[test]
    fn get_connection_reports_missing_route() {
        let network = network_with(&["A", "B"]);
        assert_eq!(
            network.get_connection("A", "B").unwrap_err(),
            NetworkError::RouteNotFound {
                from: "A".to_string(),
                to: "B".to_string()
            }
        );
        assert!(matches!(
            network.get_congestion("A", "B"),
            Err(NetworkError::RouteNotFound { .. })
        ));
    }

    #[test]
    fn add_lights_resolves_order() {
        let mut network = network_with(&["W", "X", "Y", "Z"]);
        network.connect_intersections("X", "Y", 60).unwrap();
        network.connect_intersections("Z", "Y", 100).unwrap();

        assert!(matches!(
            network.add_lights("Q", 3, &["X"]),
            Err(NetworkError::IntersectionNotFound(_))
        ));
        assert!(matches!(
            network.add_lights("Y", 3, &["Q"]),
            Err(NetworkError::IntersectionNotFound(_))
        ));
        assert!(matches!(
            network.add_lights("Y", 3, &["W", "X"]),
            Err(NetworkError::InvalidOrder(_))
        ));
        assert!(matches!(
            network.add_lights("Y", 3, &["X"]),
            Err(NetworkError::InvalidOrder(_))
        ));
        assert!(matches!(
            network.add_lights::<&str>("Y", 3, &[]),
            Err(NetworkError::InvalidOrder(_))
        ));
        assert!(matches!(
            network.add_lights("Y", 1, &["Z", "X"]),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(!network.find_intersection("Y").unwrap().has_traffic_lights());

        network.add_lights("Y", 3, &["Z", "X"]).unwrap();
        let y = network.find_intersection("Y").unwrap();
        assert_eq!(y.to_string(), "Y:3:Z,X");
        assert_eq!(y.light_state_of("Z"), Some(LightState::Green));
        assert_eq!(y.light_state_of("X"), Some(LightState::Red));
        assert_eq!(network.get_connection("X", "Y").unwrap().light_state(), Some(LightState::Red));
    }

    #[test]
    fn existing_lights_keep_their_yellow_time() {
        let mut network = network_with(&["A", "B", "C"]);
        network.connect_intersections("A", "B", 60).unwrap();
        network.connect_intersections("A", "C", 60).unwrap();
        network.add_lights("B", 5, &["A"]).unwrap();
        network.set_yellow_time(3).unwrap();
        network.add_lights("C", 5, &["A"]).unwrap();

        let yellow = |id: &str| {
            network
                .find_intersection(id)
                .unwrap()
                .traffic_lights()
                .unwrap()
                .yellow_time()
        };
        assert_eq!(yellow("B"), 1);
        assert_eq!(yellow("C"), 3);
    }

    #[test]
    fn change_light_duration_checks_state_and_range() {
        let mut network = network_with(&["A", "B"]);
        network.connect_intersections("A", "B", 60).unwrap();
        assert!(matches!(
            network.change_light_duration("Q", 5),
            Err(NetworkError::IntersectionNotFound(_))
        ));
        assert!(matches!(
            network.change_light_duration("B", 5),
            Err(NetworkError::InvalidState(_))
        ));
        network.add_lights("B", 4, &["A"]).unwrap();
        assert!(matches!(
            network.change_light_duration("B", 1),
            Err(NetworkError::InvalidArgument(_))
        ));
        network.change_light_duration("B", 7).unwrap();
        assert_eq!(network.find_intersection("B").unwrap().to_string(), "B:7:A");
    }

    #[test]
    fn huge_yellow_time_rejects_every_duration() {
        let mut network = network_with(&["A", "B"]);
        network.connect_intersections("A", "B", 60).unwrap();
        network.set_yellow_time(i32::MAX).unwrap();
        assert!(matches!(
            network.add_lights("B", 5, &["A"]),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            network.add_lights("B", i32::MAX, &["A"]),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(!network.find_intersection("B").unwrap().has_traffic_lights());

        network.set_yellow_time(1).unwrap();
        network.add_lights("B", 4, &["A"]).unwrap();
        network.set_yellow_time(i32::MAX).unwrap();
        assert!(matches!(
            network.change_light_duration("B", 10),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert_eq!(network.find_intersection("B").unwrap().to_string(), "B:4:A");
    }

    #[test]
    fn speed_sign_operations() {
        let mut network = network_with(&["A", "B"]);
        network.connect_intersections("A", "B", 60).unwrap();
        assert!(matches!(
            network.set_speed_limit("A", "B", 40),
            Err(NetworkError::InvalidState(_))
        ));
        assert!(matches!(
            network.add_speed_sign("A", "B", -1),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            network.add_speed_sign("B", "A", 50),
            Err(NetworkError::RouteNotFound { .. })
        ));
        network.add_speed_sign("A", "B", 80).unwrap();
        assert!(matches!(
            network.set_speed_limit("A", "B", -1),
            Err(NetworkError::InvalidArgument(_))
        ));
        network.set_speed_limit("A", "B", 70).unwrap();
        assert_eq!(network.get_connection("A", "B").unwrap().speed(), 70);

        network.reduce_incoming_speed_signs("B").unwrap();
        assert_eq!(network.get_connection("A", "B").unwrap().speed(), 60);
    }

    #[test]
    fn sensors_and_congestion() {
        let mut network = network_with(&["A", "B"]);
        network.connect_intersections("A", "B", 60).unwrap();
        assert_eq!(network.get_congestion("A", "B"), Ok(0));

        let pad = Sensor::new(SensorKind::PressurePad, vec![4, 8], 8).unwrap();
        network.add_sensor("A", "B", pad.clone()).unwrap();
        assert!(matches!(
            network.add_sensor("A", "B", pad),
            Err(NetworkError::DuplicateSensor { .. })
        ));
        assert_eq!(network.get_congestion("A", "B"), Ok(50));
        network.one_second();
        assert_eq!(network.get_congestion("A", "B"), Ok(100));
    }

    #[test]
    fn make_two_way_copies_speed_and_sign() {
        let mut network = network_with(&["A", "B", "C"]);
        network.connect_intersections("A", "B", 60).unwrap();
        network.add_speed_sign("A", "B", 40).unwrap();
        network.make_two_way("A", "B").unwrap();

        let back = network.get_connection("B", "A").unwrap();
        assert_eq!(back.default_speed(), 40);
        assert_eq!(back.speed_sign(), Some(40));

        network.connect_intersections("B", "C", 70).unwrap();
        network.make_two_way("B", "C").unwrap();
        let back = network.get_connection("C", "B").unwrap();
        assert_eq!(back.speed(), 70);
        assert!(!back.has_speed_sign());
    }

    #[test]
    fn make_two_way_fails_when_reverse_exists() {
        let mut network = network_with(&["A", "B"]);
        network.connect_intersections("A", "B", 60).unwrap();
        network.connect_intersections("B", "A", 30).unwrap();
        let before = network.to_string();
        assert!(matches!(
            network.make_two_way("A", "B"),
            Err(NetworkError::InvalidState(_))
        ));
        assert_eq!(network.to_string(), before);
        assert_eq!(network.routes().count(), 2);

        assert!(matches!(
            network.make_two_way("A", "Q"),
            Err(NetworkError::IntersectionNotFound(_))
        ));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a = network_with(&["A", "B", "C"]);
        let b = network_with(&["C", "A", "B"]);
        let c = network_with(&["A", "B"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, a);
    }

    #[test]
    fn display_sorts_intersections_then_routes() {
        let mut network = network_with(&["Z", "X", "Y", "W"]);
        network.connect_intersections("Z", "Y", 100).unwrap();
        network.connect_intersections("X", "Y", 60).unwrap();
        network.add_speed_sign("Z", "Y", 80).unwrap();
        network.add_lights("Y", 3, &["Z", "X"]).unwrap();

        assert_eq!(
            network.to_string(),
            "4\n2\n1\nW\nX\nY:3:Z,X\nZ\nX:Y:60:0\nZ:Y:100:0:80"
        );
    }
}
