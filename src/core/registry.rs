//! # Process-wide speaker registry.
//!
//! Every speaker registers itself here at construction, keyed by the name
//! the caller *gave* (pre-normalization). The registry is insertion-ordered
//! and append-only: re-declaring a name overwrites the entry in place, but
//! references to the old instance stay valid and keep their own listeners.
//!
//! Speakers of different payload types share one registry through the
//! object-safe [`Release`] trait.
//!
//! ## Rules
//! - The [`global`](Registry::global) singleton backs [`Speaker::new`];
//!   tests that need isolation construct their own [`Registry`] and use
//!   [`Speaker::with_registry`].
//! - [`release_all`](Registry::release_all) empties every channel of every
//!   registered speaker; it never removes the speakers themselves.
//!
//! [`Speaker::new`]: crate::Speaker::new
//! [`Speaker::with_registry`]: crate::Speaker::with_registry

use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use tracing::debug;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Type-erased view of a speaker: just enough surface for the registry to
/// name it and strip its listeners.
pub trait Release: Send + Sync {
    /// Normalized speaker name.
    fn name(&self) -> &str;

    /// Empties one action's channel, or every channel when `action` is
    /// `None`. Undeclared actions are a no-op.
    fn release(&self, action: Option<&str>);

    /// Total listeners currently registered across all channels.
    fn total_hooks(&self) -> usize;
}

/// Insertion-ordered `given name -> speaker` mapping.
pub struct Registry {
    entries: Mutex<Vec<(String, Arc<dyn Release>)>>,
}

impl Registry {
    /// Creates an empty registry (for test isolation or scoped wiring).
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide registry used by [`Speaker::new`](crate::Speaker::new).
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Inserts or overwrites the entry for `given`. Overwriting keeps the
    /// original insertion position.
    pub(crate) fn insert(&self, given: &str, speaker: Arc<dyn Release>) {
        let mut entries = self.entries.lock();
        match entries.iter_mut().find(|(name, _)| name == given) {
            Some(slot) => {
                debug!(name = given, "speaker re-declared; registry entry overwritten");
                slot.1 = speaker;
            }
            None => entries.push((given.to_string(), speaker)),
        }
    }

    /// Looks up a speaker by the name it was declared with.
    pub fn get(&self, given: &str) -> Option<Arc<dyn Release>> {
        self.entries
            .lock()
            .iter()
            .find(|(name, _)| name == given)
            .map(|(_, speaker)| Arc::clone(speaker))
    }

    /// Declared names, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of registered speakers.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when no speaker has been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Releases every listener of every registered speaker.
    pub fn release_all(&self) {
        let entries = self.entries.lock();
        debug!(speakers = entries.len(), "release_all");
        for (_, speaker) in entries.iter() {
            speaker.release(None);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
