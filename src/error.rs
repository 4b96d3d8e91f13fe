//! Error type shared by every layer of the crate.

use thiserror::Error;

/// Errors raised while building or reading bindings.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed configuration or a broken invariant between its parts.
    #[error("config error: {0}")]
    Config(String),

    /// `read_context` was asked for a context that is not configured.
    #[error("unknown context: {0:?}")]
    UnknownContext(String),

    /// A sensor spec string does not follow `name[:filter[=arg]]*`.
    #[error("bad sensor spec {spec:?}: {reason}")]
    SensorSpec { spec: String, reason: String },

    /// A filter name is not registered.
    #[error("unknown filter: {0:?}")]
    UnknownFilter(String),

    /// A filter was given an argument it cannot use.
    #[error("bad argument for filter {filter:?}: {reason}")]
    FilterArgument { filter: String, reason: String },

    /// The sensors of a candidate cannot be coerced into the declared kind.
    #[error("uninterpretable virtual state for {input:?}: kind {kind} does not accept {shape}")]
    Uninterpretable {
        input: String,
        kind: String,
        shape: String,
    },

    /// A connected device (or the keyboard) does not expose a configured control.
    #[error("device {device:?} has no control {control:?}")]
    DeviceLookup { device: String, control: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
