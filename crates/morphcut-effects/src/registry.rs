//! Process-wide catalogue of available transitions.
//!
//! Populated once at startup by [`Registry::builtin`] enumerating the
//! closed set of built-in effects; read-only afterward, so a shared
//! reference is safe for any number of concurrent jobs.

use crate::params::EffectDescriptor;
use crate::transition::Transition;
use morphcut_core::{MorphcutError, Result};
use std::sync::Arc;

struct Entry {
    descriptor: EffectDescriptor,
    effect: Arc<dyn Transition>,
}

/// Registry mapping effect names to implementations, in registration order.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// An empty registry. Most callers want [`Registry::builtin`].
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The one startup routine enumerating the closed built-in effect set.
    pub fn builtin() -> Result<Self> {
        use crate::transitions::*;

        let mut reg = Self::empty();
        reg.register(Arc::new(Crossfade))?;
        reg.register(Arc::new(Blink))?;
        reg.register(Arc::new(Blinds))?;
        reg.register(Arc::new(Checkerboard))?;
        reg.register(Arc::new(Explosion))?;
        reg.register(Arc::new(Shake))?;
        reg.register(Arc::new(Warp))?;
        reg.register(Arc::new(PageTurn))?;
        reg.register(Arc::new(Flip3d))?;
        Ok(reg)
    }

    /// Register an effect under its descriptor name.
    ///
    /// Fails with `DuplicateName` if the name is taken and with
    /// `Validation` if the descriptor violates its own invariants.
    pub fn register(&mut self, effect: Arc<dyn Transition>) -> Result<()> {
        let descriptor = effect.descriptor();
        descriptor.validate()?;
        if self.entries.iter().any(|e| e.descriptor.name == descriptor.name) {
            return Err(MorphcutError::DuplicateName(descriptor.name));
        }
        tracing::debug!(effect = %descriptor.name, "registered transition");
        self.entries.push(Entry { descriptor, effect });
        Ok(())
    }

    /// Look up an effect by name.
    pub fn lookup(&self, name: &str) -> Result<(&EffectDescriptor, Arc<dyn Transition>)> {
        self.entries
            .iter()
            .find(|e| e.descriptor.name == name)
            .map(|e| (&e.descriptor, Arc::clone(&e.effect)))
            .ok_or_else(|| MorphcutError::NotFound(name.to_string()))
    }

    /// All descriptors in registration order, for discovery.
    pub fn descriptors(&self) -> Vec<&EffectDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// All registered effect names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.descriptor.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
