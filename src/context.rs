//! Named group of virtual inputs that are read together.

use crate::config::ContextConfig;
use crate::device::{AvailableDevices, Keyboard};
use crate::error::Result;
use crate::filter::FilterRegistry;
use crate::value::Value;
use crate::virtual_input::VirtualInput;
use indexmap::IndexMap;
use std::time::Duration;

/// Resolved values of a context, in configured order. `None` means no device was available.
pub type ContextState = IndexMap<String, Option<Value>>;

#[derive(Clone, Debug)]
pub struct Context {
    inputs: IndexMap<String, VirtualInput>,
}

impl Context {
    /// Builds every virtual input; fails on the first invalid one.
    pub fn new(config: &ContextConfig, filters: &FilterRegistry) -> Result<Self> {
        let inputs = config
            .iter()
            .map(|(name, input)| Ok((name.clone(), VirtualInput::new(name, input, filters)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(Self { inputs })
    }

    pub fn get(&self, name: &str) -> Option<&VirtualInput> {
        self.inputs.get(name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &VirtualInput> {
        self.inputs.values()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Reads every virtual input against the same device set.
    ///
    /// All inputs are sampled before any trigger/repeater state changes, so a
    /// failed read leaves the whole context as it was.
    pub fn read(
        &mut self,
        devices: &AvailableDevices,
        keyboard: &dyn Keyboard,
        elapsed: Duration,
    ) -> Result<ContextState> {
        let samples = self
            .inputs
            .values()
            .map(|input| input.sample(devices, keyboard))
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .inputs
            .iter_mut()
            .zip(samples)
            .map(|((name, input), sample)| (name.clone(), input.commit(sample, elapsed)))
            .collect())
    }

    pub fn to_config(&self) -> ContextConfig {
        self.inputs
            .iter()
            .map(|(name, input)| (name.clone(), input.to_config()))
            .collect()
    }
}
