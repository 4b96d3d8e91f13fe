//! Device assignment policies.
//!
//! An assigner decides which connected devices the resolution engine may read.
//! It receives connect/disconnect notifications, tells the [`DeviceHost`] to
//! attach or detach devices as it takes or releases them, and answers
//! [`get_devices`](DeviceAssigner::get_devices) with the current device-class map.
//!
//! Two policies are provided:
//! - [`LastConnectedAssigner`]: one device total; the first to connect keeps the slot.
//! - [`SinglePlayerAssigner`]: one device per class; a newcomer replaces the holder.

use crate::device::{same_device, AvailableDevices, DeviceHandle, DeviceHost};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Policy mapping connected devices to device-class slots.
pub trait DeviceAssigner: Send {
    /// A device became available.
    fn connect(&mut self, device: DeviceHandle);

    /// A device went away.
    fn disconnect(&mut self, device: &DeviceHandle);

    /// Devices assigned to `user` (or to the only user), keyed by device class.
    fn get_devices(&self, user: Option<&str>) -> AvailableDevices;
}

/// Holds at most one device, whichever connected first.
///
/// Devices connecting while the slot is taken are ignored, not queued.
pub struct LastConnectedAssigner {
    host: Arc<dyn DeviceHost>,
    device: Option<DeviceHandle>,
}

impl LastConnectedAssigner {
    pub fn new(host: Arc<dyn DeviceHost>) -> Self {
        Self { host, device: None }
    }

    /// The held device, if any.
    pub fn device(&self) -> Option<&DeviceHandle> {
        self.device.as_ref()
    }
}

impl DeviceAssigner for LastConnectedAssigner {
    fn connect(&mut self, device: DeviceHandle) {
        if self.device.is_some() {
            return;
        }
        self.host.attach(&device);
        info!(device = device.id(), class = device.device_class(), "assigned device");
        self.device = Some(device);
    }

    fn disconnect(&mut self, device: &DeviceHandle) {
        if self.device.as_ref().is_some_and(|held| same_device(held, device)) {
            self.host.detach(device);
            self.device = None;
            info!(device = device.id(), "released device; no assigned devices");
        }
    }

    fn get_devices(&self, _user: Option<&str>) -> AvailableDevices {
        let mut out = AvailableDevices::new();
        if let Some(device) = &self.device {
            out.insert(device.device_class().to_string(), Arc::clone(device));
        }
        out
    }
}

impl fmt::Debug for LastConnectedAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastConnectedAssigner")
            .field("device", &self.device.as_ref().map(|d| d.id()))
            .finish()
    }
}

/// Holds one device per device class; the most recent connection wins its class.
pub struct SinglePlayerAssigner {
    host: Arc<dyn DeviceHost>,
    devices: AvailableDevices,
}

impl SinglePlayerAssigner {
    /// Starts with every device that is already connected.
    pub fn new(host: Arc<dyn DeviceHost>, connected: impl IntoIterator<Item = DeviceHandle>) -> Self {
        let mut assigner = Self {
            host,
            devices: AvailableDevices::new(),
        };
        for device in connected {
            assigner.connect(device);
        }
        assigner
    }
}

impl DeviceAssigner for SinglePlayerAssigner {
    fn connect(&mut self, device: DeviceHandle) {
        let class = device.device_class().to_string();
        if let Some(previous) = self.devices.get(&class).cloned() {
            if same_device(&previous, &device) {
                return;
            }
            self.disconnect(&previous);
        }
        self.host.attach(&device);
        info!(device = device.id(), class = %class, "assigned device");
        self.devices.insert(class, device);
    }

    fn disconnect(&mut self, device: &DeviceHandle) {
        let class = device.device_class();
        let held = self
            .devices
            .get(class)
            .is_some_and(|held| same_device(held, device));
        if held {
            self.host.detach(device);
            self.devices.shift_remove(class);
            info!(device = device.id(), class, "released device");
        } else {
            warn!(device = device.id(), class, "disconnect for a device that is not assigned");
        }
    }

    fn get_devices(&self, _user: Option<&str>) -> AvailableDevices {
        self.devices.clone()
    }
}

impl fmt::Debug for SinglePlayerAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held: Vec<(&str, &str)> = self
            .devices
            .iter()
            .map(|(class, d)| (class.as_str(), d.id()))
            .collect();
        f.debug_struct("SinglePlayerAssigner")
            .field("devices", &held)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{HostCall, RecordingHost, VirtualDevice};

    fn device(id: &str, class: &str) -> DeviceHandle {
        VirtualDevice::new(id, id, class).into_handle()
    }

    fn ids(devices: &AvailableDevices) -> Vec<String> {
        devices
            .iter()
            .map(|(class, d)| format!("{class}={}", d.id()))
            .collect()
    }

    #[test]
    fn last_connected_keeps_first_device() {
        let host = RecordingHost::new();
        let mut assigner = LastConnectedAssigner::new(host.clone());
        let a = device("a", "gamepad");
        let b = device("b", "flight_stick");

        assigner.connect(a.clone());
        assigner.connect(b.clone());
        assert_eq!(ids(&assigner.get_devices(None)), ["gamepad=a"]);
        assert_eq!(host.attached(), ["a"]);

        // Disconnecting an unheld device changes nothing.
        assigner.disconnect(&b);
        assert_eq!(assigner.device().map(|d| d.id()), Some("a"));

        assigner.disconnect(&a);
        assert!(assigner.get_devices(None).is_empty());
        assigner.connect(b.clone());
        assert_eq!(ids(&assigner.get_devices(None)), ["flight_stick=b"]);
        assert_eq!(
            host.calls(),
            [
                HostCall::Attach("a".into()),
                HostCall::Detach("a".into()),
                HostCall::Attach("b".into()),
            ]
        );
    }

    #[test]
    fn single_player_replaces_same_class() {
        let host = RecordingHost::new();
        let first = device("pad-1", "gamepad");
        let stick = device("stick", "flight_stick");
        let mut assigner = SinglePlayerAssigner::new(host.clone(), [first.clone(), stick]);
        assert_eq!(host.attached(), ["pad-1", "stick"]);

        let second = device("pad-2", "gamepad");
        assigner.connect(second);
        assert_eq!(
            ids(&assigner.get_devices(None)),
            ["flight_stick=stick", "gamepad=pad-2"]
        );
        assert_eq!(host.attached(), ["stick", "pad-2"]);
        assert!(host.calls().contains(&HostCall::Detach("pad-1".into())));

        // The replaced device is already gone.
        assigner.disconnect(&first);
        assert_eq!(assigner.get_devices(None).len(), 2);
    }

    #[test]
    fn single_player_reconnect_is_idempotent() {
        let host = RecordingHost::new();
        let pad = device("pad", "gamepad");
        let mut assigner = SinglePlayerAssigner::new(host.clone(), []);
        assigner.connect(pad.clone());
        assigner.connect(pad.clone());
        assert_eq!(host.calls(), [HostCall::Attach("pad".into())]);
        assigner.disconnect(&pad);
        assert!(assigner.get_devices(None).is_empty());
    }
}
