//! Host-side collaborators the resolution engine reads from.
//!
//! The engine never talks to an OS input stack itself. The host hands it
//! [`Device`] objects (one per physical controller), a [`Keyboard`] for the
//! global key state, and a [`DeviceHost`] that is told whenever a device is
//! attached to or detached from the application.

use crate::event::Axis;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Device class that is always available and reads from the [`Keyboard`].
pub const KEYBOARD: &str = "keyboard";

/// A connected physical device.
pub trait Device: fmt::Debug + Send + Sync {
    /// Stable identity; two handles with the same id refer to the same device.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Device class (e.g. `"gamepad"`, `"flight_stick"`, `"spatial_mouse"`).
    fn device_class(&self) -> &str;

    /// Current value of an axis, or `None` if the device has no such axis.
    fn find_axis(&self, axis: Axis) -> Option<f32>;

    /// Current state of a button, or `None` if the device has no such button.
    fn find_button(&self, button: &str) -> Option<bool>;
}

/// Shared handle to a connected device.
pub type DeviceHandle = Arc<dyn Device>;

/// Devices currently assigned, keyed by device class.
pub type AvailableDevices = IndexMap<String, DeviceHandle>;

/// Global keyboard (and mouse button) state.
pub trait Keyboard: Send + Sync {
    /// Whether the named key is held, or `None` if the name is not a known key.
    fn is_button_down(&self, name: &str) -> Option<bool>;
}

/// Attach/detach notifications issued by device assigners.
pub trait DeviceHost: Send + Sync {
    fn attach(&self, device: &DeviceHandle);
    fn detach(&self, device: &DeviceHandle);
}

/// Whether two handles refer to the same physical device.
#[inline]
pub fn same_device(a: &DeviceHandle, b: &DeviceHandle) -> bool {
    a.id() == b.id()
}
