//! Keybindings: virtual inputs over prioritized physical devices.
//!
//! A virtual input (`jump`, `move`, `look`) names a logical control and lists,
//! in priority order, the device classes that may drive it together with the
//! sensors to read on each. Every poll resolves it from the first available
//! device into a typed value: a button, an axis, or a 2D/3D vector.
//!
//! The host environment supplies devices, the keyboard state, and attach/detach
//! notifications through the traits in [`device`]; [`DeviceListener`] does the rest.

pub mod assigner;
pub mod backends;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod event;
pub mod filter;
pub mod listener;
pub mod mapping;
pub mod sensor;
pub mod value;
pub mod virtual_input;

pub use assigner::*;
pub use config::*;
pub use context::*;
pub use device::*;
pub use error::{Error, Result};
pub use event::*;
pub use filter::{FilterRegistry, FilterStage};
pub use listener::*;
pub use mapping::Mapping;
pub use sensor::Sensor;
pub use value::*;
pub use virtual_input::{InputKind, VirtualInput};
