//! Lifecycle callbacks.
//!
//! Each [`CallbackKind`] owns an ordered chain of `before`, `after` and
//! `around` hooks. Around hooks wrap the whole before/body/after sequence,
//! outermost first, and receive the rest of the chain as a continuation.
//! An around hook that never calls its continuation short-circuits the
//! chain without an error.

use crate::resource::Resource;
use apiresource_core::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Before/after hook. Returning `Err` aborts the chain.
pub type HookFn = Arc<dyn Fn(&mut Resource) -> Result<()> + Send + Sync>;

/// Continuation handed to an around hook.
pub type Continuation<'a> = &'a mut dyn FnMut(&mut Resource) -> Result<()>;

/// Around hook: runs code on both sides of the continuation.
pub type AroundFn = Arc<dyn Fn(&mut Resource, Continuation<'_>) -> Result<()> + Send + Sync>;

/// Lifecycle events hooks can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Outer envelope of a change on a new record.
    Create,
    /// Outer envelope of a change on a persisted record.
    Update,
    /// Destroying the record.
    Remove,
    /// Persisting the record.
    Save,
    CreateToManyLink,
    ReplaceToManyLinks,
    CreateToOneLink,
    ReplaceToOneLink,
    ReplacePolymorphicToOneLink,
    RemoveToManyLink,
    RemoveToOneLink,
    ReplaceFields,
}

impl CallbackKind {
    /// All kinds, in declaration order.
    pub const ALL: [CallbackKind; 12] = [
        CallbackKind::Create,
        CallbackKind::Update,
        CallbackKind::Remove,
        CallbackKind::Save,
        CallbackKind::CreateToManyLink,
        CallbackKind::ReplaceToManyLinks,
        CallbackKind::CreateToOneLink,
        CallbackKind::ReplaceToOneLink,
        CallbackKind::ReplacePolymorphicToOneLink,
        CallbackKind::RemoveToManyLink,
        CallbackKind::RemoveToOneLink,
        CallbackKind::ReplaceFields,
    ];

    /// Snake-case name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            CallbackKind::Create => "create",
            CallbackKind::Update => "update",
            CallbackKind::Remove => "remove",
            CallbackKind::Save => "save",
            CallbackKind::CreateToManyLink => "create_to_many_link",
            CallbackKind::ReplaceToManyLinks => "replace_to_many_links",
            CallbackKind::CreateToOneLink => "create_to_one_link",
            CallbackKind::ReplaceToOneLink => "replace_to_one_link",
            CallbackKind::ReplacePolymorphicToOneLink => "replace_polymorphic_to_one_link",
            CallbackKind::RemoveToManyLink => "remove_to_many_link",
            CallbackKind::RemoveToOneLink => "remove_to_one_link",
            CallbackKind::ReplaceFields => "replace_fields",
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hooks registered for one callback kind.
#[derive(Clone, Default)]
pub struct CallbackChain {
    before: Vec<HookFn>,
    after: Vec<HookFn>,
    around: Vec<AroundFn>,
}

impl fmt::Debug for CallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackChain")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .field("around", &self.around.len())
            .finish()
    }
}

impl CallbackChain {
    /// Whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.around.is_empty()
    }

    /// Run `body` wrapped in this chain.
    pub fn run(
        &self,
        resource: &mut Resource,
        body: &mut dyn FnMut(&mut Resource) -> Result<()>,
    ) -> Result<()> {
        self.run_from(0, resource, body)
    }

    fn run_from(
        &self,
        index: usize,
        resource: &mut Resource,
        body: &mut dyn FnMut(&mut Resource) -> Result<()>,
    ) -> Result<()> {
        if let Some(around) = self.around.get(index) {
            let mut next = |r: &mut Resource| self.run_from(index + 1, r, &mut *body);
            return around(resource, &mut next);
        }

        for hook in &self.before {
            hook(resource)?;
        }
        body(resource)?;
        for hook in &self.after {
            hook(resource)?;
        }
        Ok(())
    }
}

/// Callback chains of a resource definition, keyed by kind.
#[derive(Clone, Default)]
pub struct Callbacks {
    chains: HashMap<CallbackKind, CallbackChain>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in CallbackKind::ALL {
            if let Some(chain) = self.chains.get(&kind) {
                map.entry(&kind.as_str(), chain);
            }
        }
        map.finish()
    }
}

impl Callbacks {
    /// Register a hook to run before `kind`.
    pub fn before(&mut self, kind: CallbackKind, hook: HookFn) {
        self.chains.entry(kind).or_default().before.push(hook);
    }

    /// Register a hook to run after `kind`.
    pub fn after(&mut self, kind: CallbackKind, hook: HookFn) {
        self.chains.entry(kind).or_default().after.push(hook);
    }

    /// Register a hook wrapping `kind`.
    pub fn around(&mut self, kind: CallbackKind, hook: AroundFn) {
        self.chains.entry(kind).or_default().around.push(hook);
    }

    /// Run `body` inside the chain for `kind` (directly if none is
    /// registered).
    pub fn run(
        &self,
        kind: CallbackKind,
        resource: &mut Resource,
        body: &mut dyn FnMut(&mut Resource) -> Result<()>,
    ) -> Result<()> {
        match self.chains.get(&kind) {
            Some(chain) => chain.run(resource, body),
            None => body(resource),
        }
    }

    /// Number of kinds with at least one hook.
    pub fn len(&self) -> usize {
        self.chains.values().filter(|c| !c.is_empty()).count()
    }

    /// Whether no hooks are registered at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
