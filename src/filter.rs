//! Filter stages applied to a sensor's raw value.
//!
//! A sensor spec like `left_x:deadzone=0.1:exp=2.0` runs the axis value
//! through `deadzone` and then `exp`. Each stage declares what value kind it
//! accepts and what it produces, so the final kind of a sensor is known when
//! the config is parsed and never sniffed at read time.
//!
//! # Built-in filters
//! | name | input → output | effect |
//! |---|---|---|
//! | `exp=e` | float → float | `sign(v) * |v|^e` (default `e = 2`) |
//! | `deadzone=d` | float → float | `0` inside `d`, rescaled to full range outside |
//! | `scale=s` | float → float | `v * s` |
//! | `invert` / `flip` | float → float, bool → bool | negation |
//! | `button>=t` | float → bool | `v > t` |
//! | `button<=t` | float → bool | `v < t` |
//! | `axis` | bool → float | `1.0` when pressed, else `0.0` |
//!
//! Further filters can be added with [`FilterRegistry::register`].

use crate::error::{Error, Result};
use crate::value::{RawValue, ValueKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One transform stage in a sensor's filter chain.
pub trait FilterStage: fmt::Debug + Send + Sync {
    /// Kind produced for the given input kind, or `None` if the input is not accepted.
    fn output_kind(&self, input: ValueKind) -> Option<ValueKind>;

    /// Transforms a value whose kind was accepted by [`output_kind`](Self::output_kind).
    fn apply(&self, value: RawValue) -> RawValue;
}

/// Builds a stage from the optional `=arg` text of a filter spec.
pub type FilterFactory = fn(Option<&str>) -> std::result::Result<Box<dyn FilterStage>, String>;

/// Filters available to sensor specs, resolved by name.
#[derive(Clone)]
pub struct FilterRegistry {
    factories: HashMap<String, FilterFactory>,
}

impl FilterRegistry {
    /// Registry without any filters.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding the built-in filters.
    pub fn with_builtins() -> Self {
        let mut reg = Self::empty();
        reg.register("exp", |arg| {
            let e = parse_arg(arg)?.unwrap_or(2.0);
            if e <= 0.0 {
                return Err(format!("exponent must be positive, got {e}"));
            }
            Ok(Box::new(Builtin::Exp(e)))
        });
        reg.register("deadzone", |arg| {
            let d = require_arg(arg)?;
            if !(0.0..1.0).contains(&d) {
                return Err(format!("deadzone must be in [0, 1), got {d}"));
            }
            Ok(Box::new(Builtin::Deadzone(d)))
        });
        reg.register("scale", |arg| Ok(Box::new(Builtin::Scale(require_arg(arg)?))));
        reg.register("invert", |arg| no_arg(arg, Builtin::Invert));
        reg.register("flip", |arg| no_arg(arg, Builtin::Invert));
        reg.register("button>", |arg| {
            Ok(Box::new(Builtin::Above(parse_arg(arg)?.unwrap_or(0.5))))
        });
        reg.register("button<", |arg| {
            Ok(Box::new(Builtin::Below(parse_arg(arg)?.unwrap_or(-0.5))))
        });
        reg.register("axis", |arg| no_arg(arg, Builtin::ToAxis));
        reg
    }

    /// Adds or replaces a filter.
    pub fn register(&mut self, name: impl Into<String>, factory: FilterFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiates the named filter.
    pub fn build(&self, name: &str, arg: Option<&str>) -> Result<Arc<dyn FilterStage>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownFilter(name.to_string()))?;
        factory(arg)
            .map(Arc::from)
            .map_err(|reason| Error::FilterArgument {
                filter: name.to_string(),
                reason,
            })
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FilterRegistry")
            .field("filters", &names)
            .finish()
    }
}

/// Parses an optional numeric filter argument.
pub fn parse_arg(arg: Option<&str>) -> std::result::Result<Option<f32>, String> {
    match arg {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse::<f32>()
            .map(Some)
            .map_err(|_| format!("expected a number, got {text:?}")),
    }
}

fn require_arg(arg: Option<&str>) -> std::result::Result<f32, String> {
    parse_arg(arg)?.ok_or_else(|| "missing argument".to_string())
}

fn no_arg(
    arg: Option<&str>,
    filter: Builtin,
) -> std::result::Result<Box<dyn FilterStage>, String> {
    match arg {
        None => Ok(Box::new(filter)),
        Some(text) => Err(format!("takes no argument, got {text:?}")),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Builtin {
    Exp(f32),
    Deadzone(f32),
    Scale(f32),
    Invert,
    Above(f32),
    Below(f32),
    ToAxis,
}

impl FilterStage for Builtin {
    fn output_kind(&self, input: ValueKind) -> Option<ValueKind> {
        match (self, input) {
            (Builtin::Exp(_) | Builtin::Deadzone(_) | Builtin::Scale(_), ValueKind::Float) => {
                Some(ValueKind::Float)
            }
            (Builtin::Invert, kind) => Some(kind),
            (Builtin::Above(_) | Builtin::Below(_), ValueKind::Float) => Some(ValueKind::Bool),
            (Builtin::ToAxis, ValueKind::Bool) => Some(ValueKind::Float),
            _ => None,
        }
    }

    fn apply(&self, value: RawValue) -> RawValue {
        match (*self, value) {
            (Builtin::Exp(e), RawValue::Float(v)) => RawValue::Float(v.signum() * v.abs().powf(e)),
            (Builtin::Deadzone(d), RawValue::Float(v)) => {
                if v.abs() < d {
                    RawValue::Float(0.0)
                } else {
                    RawValue::Float(v.signum() * (v.abs() - d) / (1.0 - d))
                }
            }
            (Builtin::Scale(s), RawValue::Float(v)) => RawValue::Float(v * s),
            (Builtin::Invert, RawValue::Float(v)) => RawValue::Float(-v),
            (Builtin::Invert, RawValue::Bool(b)) => RawValue::Bool(!b),
            (Builtin::Above(t), RawValue::Float(v)) => RawValue::Bool(v > t),
            (Builtin::Below(t), RawValue::Float(v)) => RawValue::Bool(v < t),
            (Builtin::ToAxis, RawValue::Bool(b)) => RawValue::Float(if b { 1.0 } else { 0.0 }),
            // Kinds are checked when the chain is built.
            (_, other) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(name: &str, arg: Option<&str>) -> Arc<dyn FilterStage> {
        FilterRegistry::with_builtins().build(name, arg).unwrap()
    }

    #[test]
    fn exp_keeps_sign() {
        let f = build("exp", Some("2.0"));
        assert_eq!(f.apply(RawValue::Float(0.5)), RawValue::Float(0.25));
        assert_eq!(f.apply(RawValue::Float(-0.5)), RawValue::Float(-0.25));
    }

    #[test]
    fn deadzone_rescales() {
        let f = build("deadzone", Some("0.5"));
        assert_eq!(f.apply(RawValue::Float(0.25)), RawValue::Float(0.0));
        assert_eq!(f.apply(RawValue::Float(1.0)), RawValue::Float(1.0));
        assert_eq!(f.apply(RawValue::Float(-0.75)), RawValue::Float(-0.5));
    }

    #[test]
    fn threshold_turns_axis_into_button() {
        let f = build("button>", Some("0.75"));
        assert_eq!(f.output_kind(ValueKind::Float), Some(ValueKind::Bool));
        assert_eq!(f.output_kind(ValueKind::Bool), None);
        assert_eq!(f.apply(RawValue::Float(0.8)), RawValue::Bool(true));
        assert_eq!(f.apply(RawValue::Float(0.7)), RawValue::Bool(false));
    }

    #[test]
    fn invert_accepts_both_kinds() {
        let f = build("invert", None);
        assert_eq!(f.apply(RawValue::Bool(true)), RawValue::Bool(false));
        assert_eq!(f.apply(RawValue::Float(0.3)), RawValue::Float(-0.3));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        let reg = FilterRegistry::with_builtins();
        assert!(matches!(
            reg.build("exp", Some("steep")),
            Err(Error::FilterArgument { .. })
        ));
        assert!(matches!(
            reg.build("deadzone", None),
            Err(Error::FilterArgument { .. })
        ));
        assert!(matches!(
            reg.build("invert", Some("1")),
            Err(Error::FilterArgument { .. })
        ));
        assert!(matches!(reg.build("smooth", None), Err(Error::UnknownFilter(_))));
    }

    #[test]
    fn custom_filters_can_be_registered() {
        #[derive(Debug)]
        struct Half;
        impl FilterStage for Half {
            fn output_kind(&self, input: ValueKind) -> Option<ValueKind> {
                (input == ValueKind::Float).then_some(ValueKind::Float)
            }
            fn apply(&self, value: RawValue) -> RawValue {
                RawValue::Float(value.as_f32() / 2.0)
            }
        }

        let mut reg = FilterRegistry::empty();
        reg.register("half", |_| Ok(Box::new(Half)));
        let f = reg.build("half", None).unwrap();
        assert_eq!(f.apply(RawValue::Float(1.0)), RawValue::Float(0.5));
    }
}
