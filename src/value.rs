//! Raw and resolved values.
//!
//! A [`RawValue`] is what a single sensor produces after its filter chain:
//! a button state or an axis position. A [`Value`] is what a virtual input
//! resolves to once the raw tuple of its winning candidate has been coerced
//! into the declared shape.

use serde::Serialize;
use std::fmt;

/// Static type of a raw value, known once a sensor is parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Float,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::Float => f.write_str("float"),
        }
    }
}

/// Untyped per-sensor reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Float(f32),
}

impl RawValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Bool(_) => ValueKind::Bool,
            RawValue::Float(_) => ValueKind::Float,
        }
    }

    /// Boolean view; a float counts as pressed when it is non-zero.
    pub fn as_bool(&self) -> bool {
        match *self {
            RawValue::Bool(b) => b,
            RawValue::Float(v) => v != 0.0,
        }
    }

    /// Float view; a pressed button reads as `1.0`.
    pub fn as_f32(&self) -> f32 {
        match *self {
            RawValue::Bool(true) => 1.0,
            RawValue::Bool(false) => 0.0,
            RawValue::Float(v) => v,
        }
    }
}

/// Two-component axis value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Three-component axis value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Typed output of a virtual input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Button(bool),
    Axis(f32),
    Axis2d(Vec2),
    Axis3d(Vec3),
}

impl Value {
    pub fn as_button(&self) -> Option<bool> {
        match *self {
            Value::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_axis(&self) -> Option<f32> {
        match *self {
            Value::Axis(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_axis2d(&self) -> Option<Vec2> {
        match *self {
            Value::Axis2d(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_axis3d(&self) -> Option<Vec3> {
        match *self {
            Value::Axis3d(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Button(b) => write!(f, "{b}"),
            Value::Axis(v) => write!(f, "{v:.3}"),
            Value::Axis2d(v) => write!(f, "({:.3}, {:.3})", v.x, v.y),
            Value::Axis3d(v) => write!(f, "({:.3}, {:.3}, {:.3})", v.x, v.y, v.z),
        }
    }
}
