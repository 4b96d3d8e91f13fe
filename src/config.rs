//! Binding configuration data model.
//!
//! The config is a nested, order-preserving mapping:
//!
//! ```toml
//! [gameplay.jump]
//! _type = "trigger"
//! _device_order = ["gamepad", "keyboard"]
//! gamepad = "face_a"
//! keyboard = "space"
//!
//! [gameplay.move]
//! _type = "axis2d"
//! _device_order = ["gamepad", "keyboard"]
//! gamepad = "left_x:exp=2.0,left_y:exp=2.0"
//! keyboard = "a,d,s,w"
//! ```
//!
//! Keys starting with `_` describe the virtual input; every other key is a
//! candidate device class holding comma-joined sensor specs. `_type` and
//! `_device_order` are required. Other `_` keys (`_comment`, ...) are carried
//! along untouched. These types only carry the data; validation happens when a
//! [`DeviceListener`](crate::listener::DeviceListener) builds its contexts.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One virtual input: its type, device priority, and per-class sensor specs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtualInputConfig {
    /// `button`, `trigger`, `repeater:<rate>,<delay>`, `axis`, `axis2d` or `axis3d`.
    #[serde(rename = "_type")]
    pub kind: String,
    /// Candidate device classes, highest priority first.
    #[serde(rename = "_device_order")]
    pub device_order: Vec<String>,
    /// Device class → comma-joined sensor specs, plus any extra `_` keys.
    #[serde(flatten)]
    pub candidates: IndexMap<String, String>,
}

impl VirtualInputConfig {
    pub fn new(kind: &str, device_order: &[&str]) -> Self {
        Self {
            kind: kind.to_string(),
            device_order: device_order.iter().map(|s| s.to_string()).collect(),
            candidates: IndexMap::new(),
        }
    }

    /// Adds (or replaces) the sensor specs for a device class.
    pub fn candidate(mut self, class: &str, sensors: &str) -> Self {
        self.candidates.insert(class.to_string(), sensors.to_string());
        self
    }
}

/// Virtual inputs of one context, by name.
pub type ContextConfig = IndexMap<String, VirtualInputConfig>;

/// All contexts, by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingsConfig {
    pub contexts: IndexMap<String, ContextConfig>,
}

impl BindingsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a virtual input, creating its context if needed.
    pub fn with_input(mut self, context: &str, name: &str, input: VirtualInputConfig) -> Self {
        self.contexts
            .entry(context.to_string())
            .or_default()
            .insert(name.to_string(), input);
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Pretty JSON rendering, for debug display.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save config to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
