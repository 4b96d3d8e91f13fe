//! Ordered group of sensors forming one candidate of a virtual input.

use crate::device::{Device, Keyboard};
use crate::error::{Error, Result};
use crate::filter::FilterRegistry;
use crate::sensor::Sensor;
use crate::value::{RawValue, ValueKind};
use std::fmt;

/// Most sensors a single candidate can carry (three button pairs).
pub const MAX_SENSORS: usize = 6;

/// Sensors of one candidate, in configured order.
#[derive(Clone, Debug)]
pub struct Mapping {
    sensors: Vec<Sensor>,
}

impl Mapping {
    /// Parses a comma-joined list of sensor specs.
    pub fn parse(spec: &str, keyboard: bool, filters: &FilterRegistry) -> Result<Self> {
        let sensors = spec
            .split(',')
            .map(|s| Sensor::parse(s, keyboard, filters))
            .collect::<Result<Vec<_>>>()?;
        if sensors.len() > MAX_SENSORS {
            return Err(Error::Config(format!(
                "mapping {spec:?} has {} sensors, at most {MAX_SENSORS} are allowed",
                sensors.len()
            )));
        }
        Ok(Self { sensors })
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Declared value kind of each sensor.
    pub fn kinds(&self) -> Vec<ValueKind> {
        self.sensors.iter().map(Sensor::kind).collect()
    }

    /// Reads every sensor, keeping configured order.
    pub fn read(&self, device: Option<&dyn Device>, keyboard: &dyn Keyboard) -> Result<Vec<RawValue>> {
        self.sensors
            .iter()
            .map(|sensor| sensor.read(device, keyboard))
            .collect()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sensor) in self.sensors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{sensor}")?;
        }
        Ok(())
    }
}
