//! # Listener descriptor (`Hook`)
//!
//! [`Hook`] wraps a registered callback together with immutable identity
//! metadata: display name, the source location of the registration call, and
//! the owning speaker/action. Identity is the `Arc` pointer of the wrapped
//! callback, never the metadata — two entries produced by re-registering one
//! hook share identity, while two closures with identical bodies do not.
//!
//! ## Rules
//! - [`Hook::key`] is generated once at registration and is diagnostic only;
//!   the engine never compares keys.
//! - Cloning a hook clones the handle, not the callback: clones stay
//!   identity-equal to the original and to every entry made from it.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::core::Speaker;
use crate::error::HookError;

/// Result of one listener (or exception handler) invocation.
///
/// `Ok(None)` is the "empty" result: dispatch continues to the next hook.
/// `Ok(Some(_))` short-circuits the shout. `Err(_)` is routed to the
/// speaker's exception policy.
pub type Reply<R> = Result<Option<R>, HookError>;

/// Shared listener callback: `(speaker, args) -> reply`.
pub type Callback<A, R> = Arc<dyn Fn(&Speaker<A, R>, &A) -> Reply<R> + Send + Sync>;

/// Descriptor for one registered listener.
///
/// Returned by [`Speaker::plug`](crate::Speaker::plug); hold on to it to
/// [`unplug`](crate::Speaker::unplug) the listener later or to read its
/// diagnostic [`key`](Hook::key).
pub struct Hook<A, R = A> {
    callback: Callback<A, R>,
    name: String,
    file: &'static str,
    line: u32,
    key: String,
    speaker: String,
    action: String,
}

impl<A, R> Hook<A, R> {
    /// Builds the descriptor and its key from the registration site.
    pub(crate) fn new(
        callback: Callback<A, R>,
        name: &str,
        location: &'static Location<'static>,
        speaker: &str,
        action: &str,
    ) -> Self {
        let key = format!(
            "{speaker}:{action}[{module}:{name}:{line}]",
            module = module_of(location.file()),
            line = location.line(),
        );
        Self {
            callback,
            name: name.to_string(),
            file: location.file(),
            line: location.line(),
            key,
            speaker: speaker.to_string(),
            action: action.to_string(),
        }
    }

    /// Stable, human-readable correlation key:
    /// `speaker:action[module:name:line]`.
    ///
    /// Diagnostic only — never used for equality.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name given at registration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file of the registration call.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Source line of the registration call.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Normalized name of the owning speaker.
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Normalized action this hook is plugged into.
    pub fn action(&self) -> &str {
        &self.action
    }

    pub(crate) fn callback(&self) -> &Callback<A, R> {
        &self.callback
    }

    /// True when both descriptors wrap the same callback instance.
    pub(crate) fn matches(&self, other: &Hook<A, R>) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

// Manual impls: `#[derive]` would demand `A: Clone` / `A: Debug` bounds the
// payload types never need.
impl<A, R> Clone for Hook<A, R> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            name: self.name.clone(),
            file: self.file,
            line: self.line,
            key: self.key.clone(),
            speaker: self.speaker.clone(),
            action: self.action.clone(),
        }
    }
}

impl<A, R> fmt::Display for Hook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hook(name=\"{}\", line=\"{}\", file=\"{}\")",
            self.name, self.line, self.file
        )
    }
}

impl<A, R> fmt::Debug for Hook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("file", &self.file)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

/// Renders a source path as a dotted module-ish locator:
/// `src/core/speaker.rs` → `src.core.speaker`.
fn module_of(file: &str) -> String {
    file.strip_suffix(".rs")
        .unwrap_or(file)
        .replace(['/', '\\'], ".")
}
