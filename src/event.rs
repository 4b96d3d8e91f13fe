//! Axis names and device events.
//!
//! A device exposes axes and buttons. Axes are addressed by one of the
//! well-known [`Axis`] names; every other control name is treated as a button.
//!
//! ## Value conventions
//! - **Axes:** normalized to `[-1.0, 1.0]` (triggers and throttles may only use `[0.0, 1.0]`).
//! - **Buttons:** boolean pressed state.
//!
//! Hot-plug notifications arrive as [`DeviceEvent`] messages, either handed
//! directly to [`DeviceListener::handle_event`](crate::listener::DeviceListener::handle_event)
//! or queued on a channel and drained once per frame.

use crate::device::DeviceHandle;
use std::fmt;

/// Well-known axis names.
///
/// A sensor whose control name matches one of these reads an analog value;
/// anything else reads a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    LeftTrigger,
    RightX,
    RightY,
    RightTrigger,
    X,
    Y,
    Z,
    Yaw,
    Pitch,
    Roll,
    Throttle,
    Rudder,
    Wheel,
    Accelerator,
    Brake,
    Pressure,
}

impl Axis {
    /// All known axes, in declaration order.
    pub const ALL: &'static [Axis] = &[
        Axis::LeftX,
        Axis::LeftY,
        Axis::LeftTrigger,
        Axis::RightX,
        Axis::RightY,
        Axis::RightTrigger,
        Axis::X,
        Axis::Y,
        Axis::Z,
        Axis::Yaw,
        Axis::Pitch,
        Axis::Roll,
        Axis::Throttle,
        Axis::Rudder,
        Axis::Wheel,
        Axis::Accelerator,
        Axis::Brake,
        Axis::Pressure,
    ];

    /// Config name of the axis (e.g. `"left_x"`).
    pub fn name(&self) -> &'static str {
        match self {
            Axis::LeftX => "left_x",
            Axis::LeftY => "left_y",
            Axis::LeftTrigger => "left_trigger",
            Axis::RightX => "right_x",
            Axis::RightY => "right_y",
            Axis::RightTrigger => "right_trigger",
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::Yaw => "yaw",
            Axis::Pitch => "pitch",
            Axis::Roll => "roll",
            Axis::Throttle => "throttle",
            Axis::Rudder => "rudder",
            Axis::Wheel => "wheel",
            Axis::Accelerator => "accelerator",
            Axis::Brake => "brake",
            Axis::Pressure => "pressure",
        }
    }

    /// Looks up an axis by its config name.
    pub fn from_name(name: &str) -> Option<Axis> {
        Axis::ALL.iter().copied().find(|a| a.name() == name)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hot-plug notification delivered by the host environment.
#[derive(Clone, Debug)]
pub enum DeviceEvent {
    Connected(DeviceHandle),
    Disconnected(DeviceHandle),
}
