//! # Speaker: the dispatch engine.
//!
//! A [`Speaker`] owns a fixed set of action channels declared at
//! construction and fans a [`shout`](Speaker::shout) out to that action's
//! listeners in registration order, short-circuiting on the first non-empty
//! result.
//!
//! ## Dispatch contract
//! ```text
//! shout(action, args)
//!   ├─ undeclared action ──────────────► Ok(None)        (no error)
//!   └─ for each hook (snapshot, in order):
//!        ├─ prologue()                   (injectable, no-op by default)
//!        ├─ hook(speaker, args)
//!        │    ├─ Err ─► exception handler (default: propagate, shout aborts)
//!        │    └─ Ok(value)
//!        └─ value is Some ─► return it   (later hooks never run)
//!   └─ loop done ──────────────────────► Ok(None)
//! ```
//!
//! ## Rules
//! - Listeners are fan-out handlers, not independent observers: an early
//!   non-empty result starves later listeners. That is the contract.
//! - The hook list is snapshotted at shout start, so a listener may unplug
//!   itself or plug others; the running shout is unaffected.
//! - The exception-handler override slot is single-assignment for the
//!   speaker's lifetime.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::core::registry::{Registry, Release};
use crate::error::{ConfigError, HookError};
use crate::hooks::{Callback, Channel, Hook, Reply};
use crate::slug;

use super::Action;

/// Exception-handler callback: `(speaker, error, args) -> reply`.
///
/// The reply participates in the short-circuit check exactly like a normal
/// listener return; an `Err` aborts the shout.
pub type Handler<A, R> = Arc<dyn Fn(&Speaker<A, R>, HookError, &A) -> Reply<R> + Send + Sync>;

/// Injectable hook run before every listener invocation.
type Prologue = Arc<dyn Fn() + Send + Sync>;

struct NamedHandler<A, R> {
    name: String,
    call: Handler<A, R>,
}

impl<A, R> Clone for NamedHandler<A, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            call: Arc::clone(&self.call),
        }
    }
}

/// Named dispatch unit owning one channel per declared action.
///
/// Generic over the shout payload `A` and the listener result `R`
/// (defaulting to `A`). Constructed behind an [`Arc`] so the registry and
/// the caller share one instance.
///
/// # Example
/// ```
/// use speakers::{Registry, Speaker};
///
/// let registry = Registry::new();
/// let build = Speaker::<String, i32>::with_registry(
///     "Build",
///     &["started", "finished"],
///     &registry,
/// );
///
/// build
///     .plug("started", "announcer", |_speaker, path| {
///         assert_eq!(path, "src/lib.rs");
///         Ok(Some(1))
///     })
///     .unwrap();
///
/// let result = build.shout("started", &"src/lib.rs".to_string()).unwrap();
/// assert_eq!(result, Some(1));
/// ```
pub struct Speaker<A, R = A> {
    name: String,
    channels: Vec<(String, Channel<A, R>)>,
    handler: Mutex<Option<NamedHandler<A, R>>>,
    prologue: Mutex<Option<Prologue>>,
}

impl<A: 'static, R: 'static> Speaker<A, R> {
    /// Declares a speaker and registers it in the
    /// [global registry](Registry::global) under the given
    /// (pre-normalization) name.
    ///
    /// Any action list is valid, including an empty one: a speaker with no
    /// declared actions simply answers every shout with an empty result.
    pub fn new(name: &str, actions: &[&str]) -> Arc<Self> {
        Self::with_registry(name, actions, Registry::global())
    }

    /// Same as [`Speaker::new`] but registers into a caller-provided
    /// registry, keeping tests and scoped wiring isolated from the global
    /// one.
    pub fn with_registry(name: &str, actions: &[&str], registry: &Registry) -> Arc<Self> {
        let mut channels: Vec<(String, Channel<A, R>)> = Vec::with_capacity(actions.len());
        for action in actions {
            let action = slug::underscore(action);
            // duplicate declarations collapse into one channel
            if channels.iter().any(|(existing, _)| *existing == action) {
                continue;
            }
            channels.push((action, Channel::new()));
        }

        let speaker = Arc::new(Self {
            name: slug::underscore(name),
            channels,
            handler: Mutex::new(None),
            prologue: Mutex::new(None),
        });
        debug!(
            speaker = %speaker.name,
            actions = speaker.channels.len(),
            "speaker declared"
        );
        registry.insert(name, speaker.clone());
        speaker
    }
}

impl<A: 'static, R: 'static> Speaker<A, R> {
    /// Normalized speaker name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared action identifiers, in declaration order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|(action, _)| action.as_str())
    }

    /// Total listeners currently registered across all channels.
    pub fn total_hooks(&self) -> usize {
        self.channels.iter().map(|(_, channel)| channel.len()).sum()
    }

    /// Accessor for one declared action, exposing `plug` / `shout` /
    /// `unplug` / `release` scoped to it. `None` for undeclared actions.
    pub fn action(&self, action: &str) -> Option<Action<'_, A, R>> {
        let action = slug::underscore(action);
        self.channels
            .iter()
            .find(|(existing, _)| *existing == action)
            .map(|(action, channel)| Action::new(self, action, channel))
    }

    /// Registers `callback` on `action` and returns its descriptor.
    ///
    /// The descriptor carries the registration source location (captured
    /// from the caller) and the diagnostic [`key`](Hook::key); keep it to
    /// [`unplug`](Speaker::unplug) later. Registering the same callback
    /// again produces an independent entry.
    ///
    /// Fails with [`ConfigError::UnknownAction`] for undeclared actions.
    #[track_caller]
    pub fn plug<F>(&self, action: &str, name: &str, callback: F) -> Result<Hook<A, R>, ConfigError>
    where
        F: Fn(&Speaker<A, R>, &A) -> Reply<R> + Send + Sync + 'static,
    {
        let location = Location::caller();
        let action = slug::underscore(action);
        let Some(channel) = self.channel(&action) else {
            return Err(ConfigError::UnknownAction {
                speaker: self.name.clone(),
                action,
            });
        };
        Ok(self.plug_into(channel, &action, name, Arc::new(callback), location))
    }

    /// Re-registers an existing descriptor's callback on its action,
    /// yielding a fresh entry that shares the callback's identity: a later
    /// [`unplug`](Speaker::unplug) of either descriptor removes both
    /// entries.
    #[track_caller]
    pub fn replug(&self, hook: &Hook<A, R>) -> Result<Hook<A, R>, ConfigError> {
        let location = Location::caller();
        let Some(channel) = self.channel(hook.action()) else {
            return Err(ConfigError::UnknownAction {
                speaker: self.name.clone(),
                action: hook.action().to_string(),
            });
        };
        Ok(self.plug_into(
            channel,
            hook.action(),
            hook.name(),
            Arc::clone(hook.callback()),
            location,
        ))
    }

    /// Runs `action`'s listeners in registration order with
    /// `(speaker, args)`, returning the first non-empty result.
    ///
    /// An undeclared action yields `Ok(None)` without error. A listener
    /// failure is routed to the exception policy; absent an override it
    /// propagates unchanged, aborting the remaining listeners.
    pub fn shout(&self, action: &str, args: &A) -> Reply<R> {
        let action = slug::underscore(action);
        match self.channel(&action) {
            Some(channel) => self.shout_channel(&action, channel, args),
            None => {
                trace!(speaker = %self.name, %action, "shout on undeclared action; empty result");
                Ok(None)
            }
        }
    }

    /// Removes every entry in `action`'s channel whose callback is
    /// identity-equal to `hook`'s. No-op when nothing matches or the action
    /// is undeclared.
    pub fn unplug(&self, action: &str, hook: &Hook<A, R>) {
        let action = slug::underscore(action);
        if let Some(channel) = self.channel(&action) {
            let removed = channel.unplug(hook);
            debug!(speaker = %self.name, %action, hook = %hook, removed, "unplug");
        }
    }

    /// Empties one action's channel, or every channel when `action` is
    /// `None`. The speaker itself survives and stays registered.
    pub fn release(&self, action: Option<&str>) {
        match action {
            Some(action) => {
                let action = slug::underscore(action);
                if let Some(channel) = self.channel(&action) {
                    let cleared = channel.clear();
                    debug!(speaker = %self.name, %action, cleared, "release");
                }
            }
            None => {
                for (action, channel) in &self.channels {
                    let cleared = channel.clear();
                    debug!(speaker = %self.name, %action, cleared, "release");
                }
            }
        }
    }

    /// Installs the speaker's exception-handler override.
    ///
    /// At most one override may ever be installed per instance; a second
    /// attempt fails with [`ConfigError::HandlerTaken`] naming both
    /// handlers. There is no uninstall.
    ///
    /// The handler receives `(speaker, error, args)`; its reply participates
    /// in the short-circuit check like a normal listener return, and an
    /// `Err` from the handler itself propagates, bypassing the remaining
    /// listeners.
    pub fn exception_handler<F>(&self, name: &str, handler: F) -> Result<(), ConfigError>
    where
        F: Fn(&Speaker<A, R>, HookError, &A) -> Reply<R> + Send + Sync + 'static,
    {
        let mut slot = self.handler.lock();
        if let Some(existing) = slot.as_ref() {
            return Err(ConfigError::HandlerTaken {
                attempted: name.to_string(),
                existing: existing.name.clone(),
                speaker: self.name.clone(),
            });
        }
        debug!(speaker = %self.name, handler = name, "exception handler installed");
        *slot = Some(NamedHandler {
            name: name.to_string(),
            call: Arc::new(handler),
        });
        Ok(())
    }

    /// Installs a hook run immediately before every listener invocation
    /// (no-op when never set). Used for caller-owned side effects such as
    /// resetting captured output streams.
    pub fn set_prologue<F>(&self, prologue: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.prologue.lock() = Some(Arc::new(prologue));
    }

    fn channel(&self, action: &str) -> Option<&Channel<A, R>> {
        self.channels
            .iter()
            .find(|(existing, _)| existing == action)
            .map(|(_, channel)| channel)
    }

    pub(crate) fn plug_into(
        &self,
        channel: &Channel<A, R>,
        action: &str,
        name: &str,
        callback: Callback<A, R>,
        location: &'static Location<'static>,
    ) -> Hook<A, R> {
        let hook = Hook::new(callback, name, location, &self.name, action);
        debug!(speaker = %self.name, action, hook = %hook, key = hook.key(), "plugged");
        channel.plug(hook.clone());
        hook
    }

    pub(crate) fn shout_channel(
        &self,
        action: &str,
        channel: &Channel<A, R>,
        args: &A,
    ) -> Reply<R> {
        let hooks = channel.snapshot();
        trace!(speaker = %self.name, action, hooks = hooks.len(), "shout");
        let prologue = self.prologue.lock().clone();

        for hook in &hooks {
            if let Some(prologue) = &prologue {
                prologue();
            }
            let value = match (hook.callback())(self, args) {
                Ok(value) => value,
                Err(error) => {
                    let handler = self.handler.lock().clone();
                    match handler {
                        Some(handler) => {
                            debug!(
                                speaker = %self.name,
                                action,
                                hook = %hook,
                                handler = %handler.name,
                                "listener failed; routed to exception handler"
                            );
                            (handler.call)(self, error, args)?
                        }
                        None => {
                            debug!(
                                speaker = %self.name,
                                action,
                                hook = %hook,
                                "listener failed; propagating"
                            );
                            return Err(error);
                        }
                    }
                }
            };
            if value.is_some() {
                trace!(speaker = %self.name, action, hook = %hook, "short-circuit");
                return Ok(value);
            }
        }
        Ok(None)
    }
}

impl<A: 'static, R: 'static> Release for Speaker<A, R> {
    fn name(&self) -> &str {
        Speaker::name(self)
    }

    fn release(&self, action: Option<&str>) {
        Speaker::release(self, action);
    }

    fn total_hooks(&self) -> usize {
        Speaker::total_hooks(self)
    }
}

impl<A: 'static, R: 'static> fmt::Display for Speaker<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actions: Vec<&str> = self.actions().collect();
        write!(
            f,
            "Speaker(name={}, actions=[{}], total_hooks={})",
            self.name,
            actions.join(", "),
            self.total_hooks()
        )
    }
}

impl<A: 'static, R: 'static> fmt::Debug for Speaker<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Speaker")
            .field("name", &self.name)
            .field("actions", &self.actions().collect::<Vec<_>>())
            .field("total_hooks", &self.total_hooks())
            .finish_non_exhaustive()
    }
}
