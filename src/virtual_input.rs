//! Virtual inputs: typed coercion over prioritized device candidates.
//!
//! A virtual input lists candidate device classes in priority order, each with
//! its own [`Mapping`]. On every read the first candidate whose device is
//! available (the keyboard always is) wins, and its raw tuple is coerced into
//! the declared [`InputKind`]:
//!
//! | kind | sensors | result |
//! |---|---|---|
//! | `button`, `trigger`, `repeater` | `[bool]` | button |
//! | `axis` | `[float]` or `[bool; 2]` | axis |
//! | `axis2d` | `[float; 2]` or `[bool; 4]` | 2-vector |
//! | `axis3d` | `[float; 3]` or `[bool; 6]` | 3-vector |
//!
//! Button pairs combine as `(neg, pos)`: each pressed button contributes `-1`
//! or `+1`, so both pressed cancel out. The coercion for every candidate is
//! picked when the input is built; a shape that fits no row is rejected there.

use crate::config::VirtualInputConfig;
use crate::device::{AvailableDevices, Keyboard, KEYBOARD};
use crate::error::{Error, Result};
use crate::filter::FilterRegistry;
use crate::mapping::Mapping;
use crate::value::{RawValue, Value, ValueKind, Vec2, Vec3};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Declared shape of a virtual input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// True while pressed.
    Button,
    /// True only on the poll where the button goes down.
    Trigger,
    /// Like a trigger, but fires again after `delay` and then every `rate` while held.
    Repeater { rate: Duration, delay: Duration },
    Axis,
    Axis2d,
    Axis3d,
}

impl InputKind {
    fn is_edge(&self) -> bool {
        matches!(self, InputKind::Trigger | InputKind::Repeater { .. })
    }
}

impl FromStr for InputKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "button" => return Ok(InputKind::Button),
            "trigger" => return Ok(InputKind::Trigger),
            "axis" => return Ok(InputKind::Axis),
            "axis2d" => return Ok(InputKind::Axis2d),
            "axis3d" => return Ok(InputKind::Axis3d),
            _ => {}
        }

        let args = s
            .strip_prefix("repeater:")
            .ok_or_else(|| Error::Config(format!("unknown input type {s:?}")))?;
        let (rate, delay) = args.split_once(',').ok_or_else(|| {
            Error::Config(format!("repeater needs \"repeater:<rate>,<delay>\", got {s:?}"))
        })?;
        let secs = |text: &str| {
            text.trim()
                .parse::<f64>()
                .ok()
                .and_then(|v| Duration::try_from_secs_f64(v).ok())
                .ok_or_else(|| Error::Config(format!("bad repeater time {text:?} in {s:?}")))
        };
        let rate = secs(rate)?;
        let delay = secs(delay)?;
        if rate.is_zero() {
            return Err(Error::Config(format!("repeater rate must be positive in {s:?}")));
        }
        Ok(InputKind::Repeater { rate, delay })
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Button => f.write_str("button"),
            InputKind::Trigger => f.write_str("trigger"),
            InputKind::Repeater { rate, delay } => {
                write!(f, "repeater:{},{}", rate.as_secs_f64(), delay.as_secs_f64())
            }
            InputKind::Axis => f.write_str("axis"),
            InputKind::Axis2d => f.write_str("axis2d"),
            InputKind::Axis3d => f.write_str("axis3d"),
        }
    }
}

/// How a candidate's raw tuple becomes a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coercion {
    Button,
    Axis,
    ButtonAxis,
    Axis2d,
    ButtonAxis2d,
    Axis3d,
    ButtonAxis3d,
}

impl Coercion {
    /// Picks the coercion for `kind` given the sensors' declared kinds.
    pub fn select(kind: InputKind, sensors: &[ValueKind]) -> Option<Coercion> {
        use ValueKind::{Bool as B, Float as F};
        match (kind, sensors) {
            (InputKind::Button | InputKind::Trigger | InputKind::Repeater { .. }, [B]) => {
                Some(Coercion::Button)
            }
            (InputKind::Axis, [F]) => Some(Coercion::Axis),
            (InputKind::Axis, [B, B]) => Some(Coercion::ButtonAxis),
            (InputKind::Axis2d, [F, F]) => Some(Coercion::Axis2d),
            (InputKind::Axis2d, [B, B, B, B]) => Some(Coercion::ButtonAxis2d),
            (InputKind::Axis3d, [F, F, F]) => Some(Coercion::Axis3d),
            (InputKind::Axis3d, [B, B, B, B, B, B]) => Some(Coercion::ButtonAxis3d),
            _ => None,
        }
    }

    /// Applies the coercion to a raw tuple of the shape it was selected for.
    pub fn apply(&self, raw: &[RawValue]) -> Value {
        let f = |i: usize| raw.get(i).map_or(0.0, RawValue::as_f32);
        let pair = |i: usize| {
            combine(
                raw.get(i).is_some_and(RawValue::as_bool),
                raw.get(i + 1).is_some_and(RawValue::as_bool),
            )
        };
        match self {
            Coercion::Button => Value::Button(raw.first().is_some_and(RawValue::as_bool)),
            Coercion::Axis => Value::Axis(f(0)),
            Coercion::ButtonAxis => Value::Axis(pair(0)),
            Coercion::Axis2d => Value::Axis2d(Vec2::new(f(0), f(1))),
            Coercion::ButtonAxis2d => Value::Axis2d(Vec2::new(pair(0), pair(2))),
            Coercion::Axis3d => Value::Axis3d(Vec3::new(f(0), f(1), f(2))),
            Coercion::ButtonAxis3d => Value::Axis3d(Vec3::new(pair(0), pair(2), pair(4))),
        }
    }
}

/// Signed combination of a `(negative, positive)` button pair.
pub fn combine(negative: bool, positive: bool) -> f32 {
    let mut v = 0.0;
    if negative {
        v -= 1.0;
    }
    if positive {
        v += 1.0;
    }
    v
}

/// Press/release tracking for triggers and repeaters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct EdgeState {
    candidate: Option<usize>,
    pressed: bool,
    held_for: Duration,
    next_fire: Duration,
}

impl EdgeState {
    fn update(&mut self, kind: InputKind, pressed: bool, elapsed: Duration) -> bool {
        let was_pressed = std::mem::replace(&mut self.pressed, pressed);
        if !pressed {
            return false;
        }
        if !was_pressed {
            self.held_for = Duration::ZERO;
            if let InputKind::Repeater { delay, .. } = kind {
                self.next_fire = delay;
            }
            return true;
        }
        match kind {
            InputKind::Repeater { rate, .. } => {
                self.held_for += elapsed;
                if self.held_for >= self.next_fire {
                    self.next_fire += rate;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

/// Coerced value of one read, before trigger/repeater state is applied.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Sample {
    selected: Option<usize>,
    value: Option<Value>,
}

#[derive(Clone, Debug)]
struct Candidate {
    mapping: Mapping,
    coercion: Coercion,
}

/// A named logical control resolved from the highest-priority available device.
#[derive(Clone, Debug)]
pub struct VirtualInput {
    name: String,
    kind: InputKind,
    device_order: Vec<String>,
    candidates: IndexMap<String, Candidate>,
    /// `_`-prefixed keys other than `_type`/`_device_order`, kept for export.
    extra: IndexMap<String, String>,
    edge: EdgeState,
}

impl VirtualInput {
    /// Builds and validates a virtual input from its config.
    pub fn new(name: &str, config: &VirtualInputConfig, filters: &FilterRegistry) -> Result<Self> {
        let kind: InputKind = config.kind.parse()?;
        if config.device_order.is_empty() {
            return Err(Error::Config(format!(
                "virtual input {name:?} has an empty device order"
            )));
        }

        let mut candidates = IndexMap::with_capacity(config.candidates.len());
        let mut extra = IndexMap::new();
        for (class, spec) in &config.candidates {
            if class.starts_with('_') {
                extra.insert(class.clone(), spec.clone());
                continue;
            }
            let mapping = Mapping::parse(spec, class == KEYBOARD, filters)?;
            let shape = mapping.kinds();
            let coercion =
                Coercion::select(kind, &shape).ok_or_else(|| Error::Uninterpretable {
                    input: format!("{name}/{class}"),
                    kind: kind.to_string(),
                    shape: describe_shape(&shape),
                })?;
            if !config.device_order.contains(class) {
                warn!(input = name, class = %class, "candidate is not in the device order and will never be read");
            }
            candidates.insert(class.clone(), Candidate { mapping, coercion });
        }

        if let Some(missing) = config
            .device_order
            .iter()
            .find(|class| !candidates.contains_key(*class))
        {
            return Err(Error::Config(format!(
                "virtual input {name:?} lists {missing:?} in its device order but has no mapping for it"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            kind,
            device_order: config.device_order.clone(),
            candidates,
            extra,
            edge: EdgeState::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Candidate device classes, highest priority first.
    pub fn device_order(&self) -> &[String] {
        &self.device_order
    }

    /// Mapping configured for a device class.
    pub fn mapping(&self, class: &str) -> Option<&Mapping> {
        self.candidates.get(class).map(|c| &c.mapping)
    }

    /// Index in the device order of the candidate that would be read right now.
    pub fn select(&self, devices: &AvailableDevices) -> Option<usize> {
        self.device_order
            .iter()
            .position(|class| devices.contains_key(class) || class == KEYBOARD)
    }

    /// Resolves the current value, or `None` when no candidate device is available.
    ///
    /// `elapsed` is the time since the previous read; only repeaters use it.
    /// On error the trigger/repeater state is left untouched.
    pub fn read(
        &mut self,
        devices: &AvailableDevices,
        keyboard: &dyn Keyboard,
        elapsed: Duration,
    ) -> Result<Option<Value>> {
        let sample = self.sample(devices, keyboard)?;
        Ok(self.commit(sample, elapsed))
    }

    /// Reads and coerces the selected candidate without touching edge state.
    pub(crate) fn sample(
        &self,
        devices: &AvailableDevices,
        keyboard: &dyn Keyboard,
    ) -> Result<Sample> {
        let selected = self.select(devices);
        let Some(index) = selected else {
            return Ok(Sample { selected, value: None });
        };
        let class = &self.device_order[index];
        let candidate = self
            .candidates
            .get(class)
            .ok_or_else(|| Error::Config(format!("no mapping for {class:?}")))?;
        let device = devices.get(class).map(|d| &**d);

        let raw = candidate.mapping.read(device, keyboard)?;
        Ok(Sample {
            selected,
            value: Some(candidate.coercion.apply(&raw)),
        })
    }

    /// Applies a sample to the trigger/repeater state and returns the final value.
    pub(crate) fn commit(&mut self, sample: Sample, elapsed: Duration) -> Option<Value> {
        if sample.selected != self.edge.candidate {
            if self.kind.is_edge() && self.edge.candidate.is_some() {
                debug!(input = %self.name, from = ?self.edge.candidate, to = ?sample.selected, "device changed, resetting edge state");
            }
            self.edge = EdgeState {
                candidate: sample.selected,
                ..EdgeState::default()
            };
        }

        let value = sample.value?;
        if self.kind.is_edge() {
            let pressed = value.as_button().unwrap_or(false);
            return Some(Value::Button(self.edge.update(self.kind, pressed, elapsed)));
        }
        Some(value)
    }

    /// Config that rebuilds this input.
    pub fn to_config(&self) -> VirtualInputConfig {
        VirtualInputConfig {
            kind: self.kind.to_string(),
            device_order: self.device_order.clone(),
            candidates: self
                .candidates
                .iter()
                .map(|(class, c)| (class.clone(), c.mapping.to_string()))
                .chain(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())))
                .collect(),
        }
    }
}

fn describe_shape(kinds: &[ValueKind]) -> String {
    let parts: Vec<String> = kinds.iter().map(ValueKind::to_string).collect();
    format!("[{}]", parts.join(", "))
}
