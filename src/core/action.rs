//! # Per-action accessor.
//!
//! [`Action`] is a borrowed view of one declared channel, obtained via
//! [`Speaker::action`](crate::Speaker::action). It scopes `plug` / `shout` /
//! `unplug` / `release` to that action so call sites read like the action is
//! a first-class handle.
//!
//! ```
//! use speakers::{Registry, Speaker};
//!
//! let registry = Registry::new();
//! let before = Speaker::<u32>::with_registry("before", &["file created"], &registry);
//!
//! let created = before.action("file created").unwrap();
//! created.plug("obeyer", |_speaker, size| Ok(Some(size + 1)));
//!
//! assert_eq!(created.shout(&41).unwrap(), Some(42));
//! ```

use std::panic::Location;
use std::sync::Arc;

use crate::hooks::{Channel, Hook, Reply};

use super::Speaker;

/// Borrowed handle to one declared action of a speaker.
pub struct Action<'a, A, R = A> {
    speaker: &'a Speaker<A, R>,
    name: &'a str,
    channel: &'a Channel<A, R>,
}

impl<'a, A: 'static, R: 'static> Action<'a, A, R> {
    pub(crate) fn new(
        speaker: &'a Speaker<A, R>,
        name: &'a str,
        channel: &'a Channel<A, R>,
    ) -> Self {
        Self {
            speaker,
            name,
            channel,
        }
    }

    /// Normalized action identifier.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Registers `callback` on this action; infallible since the action is
    /// declared by construction. See [`Speaker::plug`].
    #[track_caller]
    pub fn plug<F>(&self, name: &str, callback: F) -> Hook<A, R>
    where
        F: Fn(&Speaker<A, R>, &A) -> Reply<R> + Send + Sync + 'static,
    {
        let location = Location::caller();
        self.speaker
            .plug_into(self.channel, self.name, name, Arc::new(callback), location)
    }

    /// Shouts this action. See [`Speaker::shout`].
    pub fn shout(&self, args: &A) -> Reply<R> {
        self.speaker.shout_channel(self.name, self.channel, args)
    }

    /// Removes every entry matching `hook`'s callback identity.
    pub fn unplug(&self, hook: &Hook<A, R>) {
        self.speaker.unplug(self.name, hook);
    }

    /// Empties this action's channel.
    pub fn release(&self) {
        self.speaker.release(Some(self.name));
    }

    /// Listeners currently registered on this action.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// True when no listener is registered on this action.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
