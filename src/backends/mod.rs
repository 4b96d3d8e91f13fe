//! Host backends for `keybindings`.
//!
//! Implementations of the [`Device`](crate::device::Device),
//! [`Keyboard`](crate::device::Keyboard) and [`DeviceHost`](crate::device::DeviceHost)
//! traits. Only the in-memory backend ships with the crate; hosts with their
//! own input stack implement the traits directly.

pub mod virtual_input;
