//! In-memory host collaborators.
//!
//! [`VirtualDevice`], [`VirtualKeyboard`] and [`RecordingHost`] stand in for a
//! real input stack: state is injected by calling setters, and the engine reads
//! it through the [`Device`], [`Keyboard`] and [`DeviceHost`] traits. Useful for
//! tests, demos, replay tools, and hosts that already own their own input loop.

use crate::device::{Device, DeviceHandle, DeviceHost, Keyboard};
use crate::event::Axis;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Snapshot of current axis/button states of one device.
#[derive(Clone, Debug, Default)]
pub struct DeviceState {
    pub axes: HashMap<Axis, f32>,
    pub buttons: HashMap<String, bool>,
}

impl DeviceState {
    /// Gets the value of an axis (`None` if the device has no such axis).
    pub fn get_axis(&self, axis: Axis) -> Option<f32> {
        self.axes.get(&axis).copied()
    }

    /// Gets the state of a named button (`None` if the device has no such button).
    pub fn get_button(&self, name: &str) -> Option<bool> {
        self.buttons.get(name).copied()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Device whose controls are set from code.
///
/// A control exists once it has been set at least once; reading any other
/// control fails the lookup, as it would on a real device.
#[derive(Debug)]
pub struct VirtualDevice {
    id: String,
    name: String,
    class: String,
    state: Mutex<DeviceState>,
}

impl VirtualDevice {
    pub fn new(id: &str, name: &str, class: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            class: class.to_string(),
            state: Mutex::new(DeviceState::default()),
        }
    }

    /// Wraps the device in a shareable handle.
    pub fn into_handle(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Sets an axis value, clamped to `[-1, 1]`.
    pub fn set_axis(&self, axis: Axis, value: f32) {
        lock(&self.state).axes.insert(axis, value.clamp(-1.0, 1.0));
    }

    pub fn set_button(&self, button: &str, pressed: bool) {
        lock(&self.state).buttons.insert(button.to_string(), pressed);
    }

    pub fn press_button(&self, button: &str) {
        self.set_button(button, true);
    }

    pub fn release_button(&self, button: &str) {
        self.set_button(button, false);
    }

    /// Copy of the current state.
    pub fn state(&self) -> DeviceState {
        lock(&self.state).clone()
    }
}

impl Device for VirtualDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn device_class(&self) -> &str {
        &self.class
    }

    fn find_axis(&self, axis: Axis) -> Option<f32> {
        lock(&self.state).get_axis(axis)
    }

    fn find_button(&self, button: &str) -> Option<bool> {
        lock(&self.state).get_button(button)
    }
}

/// Keyboard whose keys are pressed from code.
///
/// Every key name is known and reads as released until pressed.
#[derive(Debug, Default)]
pub struct VirtualKeyboard {
    down: Mutex<HashMap<String, bool>>,
}

impl VirtualKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, pressed: bool) {
        lock(&self.down).insert(key.to_string(), pressed);
    }

    pub fn press(&self, key: &str) {
        self.set(key, true);
    }

    pub fn release(&self, key: &str) {
        self.set(key, false);
    }
}

impl Keyboard for VirtualKeyboard {
    fn is_button_down(&self, name: &str) -> Option<bool> {
        Some(lock(&self.down).get(name).copied().unwrap_or(false))
    }
}

/// Attach/detach notification recorded by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    Attach(String),
    Detach(String),
}

/// Host that records attach/detach calls by device id.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Calls recorded so far, oldest first.
    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.calls).clone()
    }

    /// Ids of devices that are currently attached.
    pub fn attached(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for call in lock(&self.calls).iter() {
            match call {
                HostCall::Attach(id) => out.push(id.clone()),
                HostCall::Detach(id) => out.retain(|a| a != id),
            }
        }
        out
    }
}

impl DeviceHost for RecordingHost {
    fn attach(&self, device: &DeviceHandle) {
        lock(&self.calls).push(HostCall::Attach(device.id().to_string()));
    }

    fn detach(&self, device: &DeviceHandle) {
        lock(&self.calls).push(HostCall::Detach(device.id().to_string()));
    }
}
