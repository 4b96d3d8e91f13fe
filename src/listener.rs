//! The resolution engine.
//!
//! [`DeviceListener`] owns every [`Context`] built from a [`BindingsConfig`],
//! forwards hot-plug events to its [`DeviceAssigner`], and answers
//! [`read_context`](DeviceListener::read_context) once per frame.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use keybindings::backends::virtual_input::{RecordingHost, VirtualKeyboard};
//! use keybindings::{BindingsConfig, DeviceListener, LastConnectedAssigner, Value, VirtualInputConfig};
//!
//! let config = BindingsConfig::new().with_input(
//!     "gameplay",
//!     "jump",
//!     VirtualInputConfig::new("button", &["gamepad", "keyboard"])
//!         .candidate("gamepad", "face_a")
//!         .candidate("keyboard", "space"),
//! );
//! let keyboard = Arc::new(VirtualKeyboard::new());
//! let assigner = LastConnectedAssigner::new(RecordingHost::new());
//! let mut listener = DeviceListener::new(&config, assigner, keyboard.clone()).unwrap();
//!
//! keyboard.press("space");
//! let state = listener.read_context("gameplay", None, Duration::from_millis(16)).unwrap();
//! assert_eq!(state["jump"], Some(Value::Button(true)));
//! ```

use crate::assigner::DeviceAssigner;
use crate::config::BindingsConfig;
use crate::context::{Context, ContextState};
use crate::device::{AvailableDevices, DeviceHandle, Keyboard};
use crate::error::{Error, Result};
use crate::event::DeviceEvent;
use crate::filter::FilterRegistry;
use indexmap::IndexMap;
use std::fmt;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct DeviceListener {
    contexts: IndexMap<String, Context>,
    assigner: Box<dyn DeviceAssigner>,
    keyboard: Arc<dyn Keyboard>,
    filters: FilterRegistry,
}

impl DeviceListener {
    /// Builds all contexts with the built-in filters.
    pub fn new(
        config: &BindingsConfig,
        assigner: impl DeviceAssigner + 'static,
        keyboard: Arc<dyn Keyboard>,
    ) -> Result<Self> {
        Self::with_filters(config, assigner, keyboard, FilterRegistry::with_builtins())
    }

    /// Builds all contexts, resolving sensor filters against `filters`.
    pub fn with_filters(
        config: &BindingsConfig,
        assigner: impl DeviceAssigner + 'static,
        keyboard: Arc<dyn Keyboard>,
        filters: FilterRegistry,
    ) -> Result<Self> {
        let contexts = build_contexts(config, &filters)?;
        info!(contexts = contexts.len(), "loaded bindings");
        Ok(Self {
            contexts,
            assigner: Box::new(assigner),
            keyboard,
            filters,
        })
    }

    /// Event handler for a newly discovered device.
    pub fn connect(&mut self, device: DeviceHandle) {
        debug!(device = device.id(), class = device.device_class(), "device found");
        self.assigner.connect(device);
    }

    /// Event handler for a removed device.
    pub fn disconnect(&mut self, device: &DeviceHandle) {
        debug!(device = device.id(), class = device.device_class(), "device disconnected");
        self.assigner.disconnect(device);
    }

    pub fn handle_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Connected(device) => self.connect(device),
            DeviceEvent::Disconnected(device) => self.disconnect(&device),
        }
    }

    /// Handles every queued event without blocking; returns how many were handled.
    pub fn drain_events(&mut self, events: &Receiver<DeviceEvent>) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Devices the assigner currently offers to `user`.
    pub fn available_devices(&self, user: Option<&str>) -> AvailableDevices {
        self.assigner.get_devices(user)
    }

    /// Resolves every virtual input of a context.
    ///
    /// The assigned device set is taken once, so all inputs of the context see
    /// the same devices. `elapsed` is the time since the previous frame.
    pub fn read_context(
        &mut self,
        context: &str,
        user: Option<&str>,
        elapsed: Duration,
    ) -> Result<ContextState> {
        let ctx = self
            .contexts
            .get_mut(context)
            .ok_or_else(|| Error::UnknownContext(context.to_string()))?;
        let devices = self.assigner.get_devices(user);
        ctx.read(&devices, self.keyboard.as_ref(), elapsed)
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    pub fn context_names(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }

    pub fn assigner(&self) -> &dyn DeviceAssigner {
        self.assigner.as_ref()
    }

    /// Current bindings in config form, in original order.
    pub fn get_config(&self) -> BindingsConfig {
        BindingsConfig {
            contexts: self
                .contexts
                .iter()
                .map(|(name, ctx)| (name.clone(), ctx.to_config()))
                .collect(),
        }
    }

    /// Replaces all contexts. On error the current contexts are kept.
    ///
    /// Trigger and repeater state starts over with the new contexts.
    pub fn reload(&mut self, config: &BindingsConfig) -> Result<()> {
        let contexts = build_contexts(config, &self.filters)?;
        info!(contexts = contexts.len(), "reloaded bindings");
        self.contexts = contexts;
        Ok(())
    }
}

fn build_contexts(
    config: &BindingsConfig,
    filters: &FilterRegistry,
) -> Result<IndexMap<String, Context>> {
    config
        .contexts
        .iter()
        .map(|(name, ctx)| Ok((name.clone(), Context::new(ctx, filters)?)))
        .collect()
}

impl fmt::Debug for DeviceListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceListener")
            .field("contexts", &self.contexts.keys().collect::<Vec<_>>())
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}
