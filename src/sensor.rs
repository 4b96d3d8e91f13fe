//! A single named control on a device, plus its filter chain.
//!
//! Spec grammar: `control[:filter[=arg]]*`, e.g. `left_x:deadzone=0.1:exp=2`.
//! Control names found in [`Axis`] read an analog value; all others read a
//! button. On the keyboard every control is a key.

use crate::device::{Device, Keyboard, KEYBOARD};
use crate::error::{Error, Result};
use crate::event::Axis;
use crate::filter::{FilterRegistry, FilterStage};
use crate::value::{RawValue, ValueKind};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Control {
    Axis(Axis),
    Button,
}

#[derive(Clone, Debug)]
struct AppliedFilter {
    name: String,
    arg: Option<String>,
    stage: Arc<dyn FilterStage>,
}

/// Resolves one named axis or button to a raw value.
#[derive(Clone, Debug)]
pub struct Sensor {
    name: String,
    control: Control,
    filters: Vec<AppliedFilter>,
    kind: ValueKind,
}

impl Sensor {
    /// Parses a sensor spec. `keyboard` selects key lookup for every control name.
    pub fn parse(spec: &str, keyboard: bool, filters: &FilterRegistry) -> Result<Self> {
        let bad = |reason: &str| Error::SensorSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = spec.split(':').map(str::trim);
        let name = match parts.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(bad("empty control name")),
        };

        let control = match Axis::from_name(&name) {
            Some(axis) if !keyboard => Control::Axis(axis),
            _ => Control::Button,
        };
        let mut kind = match control {
            Control::Axis(_) => ValueKind::Float,
            Control::Button => ValueKind::Bool,
        };

        let mut applied = Vec::new();
        for part in parts {
            let (fname, arg) = match part.split_once('=') {
                Some((fname, arg)) => (fname.trim(), Some(arg.trim())),
                None => (part, None),
            };
            if fname.is_empty() {
                return Err(bad("empty filter name"));
            }
            let stage = filters.build(fname, arg)?;
            kind = stage.output_kind(kind).ok_or_else(|| Error::FilterArgument {
                filter: fname.to_string(),
                reason: format!("does not accept {kind} input"),
            })?;
            applied.push(AppliedFilter {
                name: fname.to_string(),
                arg: arg.map(str::to_string),
                stage,
            });
        }

        Ok(Self {
            name,
            control,
            filters: applied,
            kind,
        })
    }

    /// Control name without filters.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this sensor reads an analog axis.
    pub fn is_axis(&self) -> bool {
        matches!(self.control, Control::Axis(_))
    }

    /// Kind of value produced after the filter chain.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Reads the control from `device`, or from the keyboard when `device` is `None`.
    pub fn read(&self, device: Option<&dyn Device>, keyboard: &dyn Keyboard) -> Result<RawValue> {
        let raw = match (device, self.control) {
            (Some(dev), Control::Axis(axis)) => dev.find_axis(axis).map(RawValue::Float),
            (Some(dev), Control::Button) => dev.find_button(&self.name).map(RawValue::Bool),
            (None, _) => keyboard.is_button_down(&self.name).map(RawValue::Bool),
        };
        let raw = raw.ok_or_else(|| Error::DeviceLookup {
            device: device.map_or(KEYBOARD, |d| d.id()).to_string(),
            control: self.name.clone(),
        })?;

        Ok(self
            .filters
            .iter()
            .fold(raw, |value, f| f.stage.apply(value)))
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for filter in &self.filters {
            match &filter.arg {
                Some(arg) => write!(f, ":{}={}", filter.name, arg)?,
                None => write!(f, ":{}", filter.name)?,
            }
        }
        Ok(())
    }
}
