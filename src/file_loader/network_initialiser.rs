use crate::error::{LoadError, LoadResult};
use crate::global_variables::{COMMENT, LINE_INFO_SEPARATOR, LINE_LIST_SEPARATOR};
use crate::simulation_engine::network::Network;
use crate::simulation_engine::sensors::{Sensor, SensorKind};
use std::fs;
use std::path::Path;

/// Reads the file at `path` and builds the network it describes.
///
/// Network files look like this (square brackets mark optional parts):
///
/// ```text
/// ; comment lines start with a semicolon and are ignored
/// numIntersections
/// numRoutes
/// yellowTime
/// intersectionId[:duration:originId,originId,...]
/// fromId:toId:defaultSpeed:numSensors[:speedSignSpeed]
/// SENSORKIND:threshold:value,value,...
/// ```
///
/// Any format or semantic violation is reported as
/// [`LoadError::InvalidNetwork`].
pub fn load_network(path: impl AsRef<Path>) -> LoadResult<Network> {
    let contents = fs::read_to_string(path)?;
    parse_network(&contents)
}

/// Builds a network from the text of a network file.
pub fn parse_network(contents: &str) -> LoadResult<Network> {
    NetworkInitialiser::from_lines(contents.lines()).load()
}

/// Lights are added once every route exists, since the order must be a
/// permutation of the final set of incoming routes.
#[derive(Debug)]
struct PendingLights {
    intersection_id: String,
    duration: i32,
    order: Vec<String>,
}

/// Single-use parser holding the file's lines and the network built so far.
///
/// The network is only handed out once every line has been validated.
#[derive(Debug)]
pub struct NetworkInitialiser {
    /// File lines with comments removed.
    lines: Vec<String>,
    /// Index of the next unread line.
    position: usize,
    network: Network,
    pending_lights: Vec<PendingLights>,
}

impl NetworkInitialiser {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines
            .into_iter()
            .map(Into::<String>::into)
            .filter(|line| !line.starts_with(COMMENT))
            .collect();
        Self {
            lines,
            position: 0,
            network: Network::new(),
            pending_lights: Vec::new(),
        }
    }

    /// Validates every line and returns the finished network.
    pub fn load(mut self) -> LoadResult<Network> {
        match self.read_all() {
            Ok(()) => {
                log::debug!(
                    "Loaded network with {} intersections and {} routes",
                    self.network.intersections().count(),
                    self.network.routes().count()
                );
                Ok(self.network)
            }
            Err(err) => {
                log::warn!("Rejected network file: {}", err);
                Err(err)
            }
        }
    }

    fn read_all(&mut self) -> LoadResult<()> {
        self.check_blank_lines()?;

        let num_intersections = self.read_count("number of intersections")?;
        let num_routes = self.read_count("number of routes")?;
        let yellow_time = self.read_number("yellow time")?;
        self.network.set_yellow_time(yellow_time)?;

        for _ in 0..num_intersections {
            self.read_intersection()?;
        }
        for _ in 0..num_routes {
            self.read_route()?;
        }
        if self.position != self.lines.len() {
            return Err(invalid(format!(
                "{} unexpected line(s) after the last route",
                self.lines.len() - self.position
            )));
        }

        for lights in std::mem::take(&mut self.pending_lights) {
            self.network
                .add_lights(&lights.intersection_id, lights.duration, lights.order.as_slice())?;
        }
        Ok(())
    }

    /// Blank lines are only allowed as the very last line, and at most one.
    fn check_blank_lines(&mut self) -> LoadResult<()> {
        let last = self.lines.len().saturating_sub(1);
        if let Some(index) = self
            .lines
            .iter()
            .position(|line| line.trim().is_empty())
            .filter(|&index| index != last)
        {
            return Err(invalid(format!("blank line at line {}", index + 1)));
        }
        if self.lines.last().is_some_and(|line| line.trim().is_empty()) {
            self.lines.pop();
        }
        Ok(())
    }

    fn next_line(&mut self, expected: &str) -> LoadResult<String> {
        let line = self
            .lines
            .get(self.position)
            .cloned()
            .ok_or_else(|| invalid(format!("file ended while expecting {}", expected)))?;
        self.position += 1;
        Ok(line)
    }

    fn read_number(&mut self, expected: &str) -> LoadResult<i32> {
        let line = self.next_line(expected)?;
        parse_int(&line, expected)
    }

    fn read_count(&mut self, expected: &str) -> LoadResult<usize> {
        let count = self.read_number(expected)?;
        usize::try_from(count).map_err(|_| invalid(format!("negative {}: {}", expected, count)))
    }

    /// `id[:duration:order]`
    fn read_intersection(&mut self) -> LoadResult<()> {
        let line = self.next_line("an intersection")?;
        let fields = split_fields(&line);
        match fields.as_slice() {
            [id] => self.network.create_intersection(id)?,
            [id, duration, order] => {
                self.network.create_intersection(id)?;
                let duration = parse_int(duration, "light duration")?;
                if duration <= self.network.yellow_time() {
                    return Err(invalid(format!(
                        "light duration {} for {} is not above the yellow time",
                        duration, id
                    )));
                }
                self.pending_lights.push(PendingLights {
                    intersection_id: id.to_string(),
                    duration,
                    order: order
                        .split(LINE_LIST_SEPARATOR)
                        .map(str::to_string)
                        .collect(),
                });
            }
            _ => {
                return Err(invalid(format!(
                    "intersection line {:?} has {} fields",
                    line,
                    fields.len()
                )))
            }
        }
        Ok(())
    }

    /// `from:to:defaultSpeed:numSensors[:speedSignSpeed]` followed by its sensors.
    fn read_route(&mut self) -> LoadResult<()> {
        let line = self.next_line("a route")?;
        let fields = split_fields(&line);
        let (from, to, speed, num_sensors, sign) = match fields.as_slice() {
            [from, to, speed, num_sensors] => (*from, *to, *speed, *num_sensors, None),
            [from, to, speed, num_sensors, sign] => (*from, *to, *speed, *num_sensors, Some(*sign)),
            _ => {
                return Err(invalid(format!(
                    "route line {:?} has {} fields",
                    line,
                    fields.len()
                )))
            }
        };

        let speed = parse_int(speed, "route speed")?;
        let num_sensors = parse_int(num_sensors, "sensor count")?;
        let num_sensors = usize::try_from(num_sensors)
            .map_err(|_| invalid(format!("negative sensor count on {}:{}", from, to)))?;

        self.network.connect_intersections(from, to, speed)?;
        if let Some(sign) = sign {
            let sign = parse_int(sign, "speed sign speed")?;
            self.network.add_speed_sign(from, to, sign)?;
        }

        for _ in 0..num_sensors {
            let sensor = self.read_sensor()?;
            self.network.add_sensor(from, to, sensor)?;
        }
        Ok(())
    }

    /// `KIND:threshold:value,value,...`
    fn read_sensor(&mut self) -> LoadResult<Sensor> {
        let line = self.next_line("a sensor")?;
        let fields = split_fields(&line);
        let [kind, threshold, data] = fields.as_slice() else {
            return Err(invalid(format!(
                "sensor line {:?} has {} fields",
                line,
                fields.len()
            )));
        };

        let kind: SensorKind = kind.parse()?;
        let threshold = parse_int(threshold, "sensor threshold")?;
        let data = data
            .split(LINE_LIST_SEPARATOR)
            .map(|value| parse_int(value, "sensor data value"))
            .collect::<LoadResult<Vec<i32>>>()?;
        Ok(Sensor::new(kind, data, threshold)?)
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(LINE_INFO_SEPARATOR).collect()
}

fn parse_int(token: &str, what: &str) -> LoadResult<i32> {
    token
        .parse()
        .map_err(|_| invalid(format!("{} {:?} is not an integer", what, token)))
}

fn invalid(reason: String) -> LoadError {
    LoadError::InvalidNetwork(reason)
}
