//! # Action channel: the ordered listener list for one action.
//!
//! Each declared action owns exactly one [`Channel`]. Entries keep
//! registration order; duplicates are permitted (re-registering a hook adds
//! an independent entry sharing the callback's identity).
//!
//! ## Rules
//! - `shout` never iterates the live list: it takes a [`snapshot`](Channel::snapshot)
//!   first, so a listener may unplug itself (or plug new listeners) without
//!   skipping or double-running anyone in the current shout.
//! - Removal rebuilds the retained subset in one pass; adjacent duplicates
//!   are removed together, never alternately.

use parking_lot::Mutex;

use super::Hook;

/// Ordered, mutable list of hooks for one action.
pub(crate) struct Channel<A, R> {
    hooks: Mutex<Vec<Hook<A, R>>>,
}

impl<A, R> Channel<A, R> {
    pub(crate) fn new() -> Self {
        Self {
            hooks: Mutex::new(Vec::new()),
        }
    }

    /// Appends a hook; position = registration order.
    pub(crate) fn plug(&self, hook: Hook<A, R>) {
        self.hooks.lock().push(hook);
    }

    /// Copy of the current entries, in order. The lock is released before
    /// any hook runs.
    pub(crate) fn snapshot(&self) -> Vec<Hook<A, R>> {
        self.hooks.lock().clone()
    }

    /// Removes every entry whose callback is identity-equal to `hook`'s.
    /// Returns how many entries were removed; zero when nothing matched.
    pub(crate) fn unplug(&self, hook: &Hook<A, R>) -> usize {
        let mut hooks = self.hooks.lock();
        let before = hooks.len();
        hooks.retain(|entry| !entry.matches(hook));
        before - hooks.len()
    }

    /// Drops every entry. Returns how many were present.
    pub(crate) fn clear(&self) -> usize {
        let mut hooks = self.hooks.lock();
        let cleared = hooks.len();
        hooks.clear();
        cleared
    }

    pub(crate) fn len(&self) -> usize {
        self.hooks.lock().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.hooks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::Location;
    use std::sync::Arc;

    use super::*;
    use crate::hooks::Callback;

    fn hook(name: &str) -> Hook<(), ()> {
        let cb: Callback<(), ()> = Arc::new(|_, _| Ok(None));
        Hook::new(cb, name, Location::caller(), "sp", "act")
    }

    #[test]
    fn test_plug_preserves_order() {
        let ch = Channel::new();
        ch.plug(hook("a"));
        ch.plug(hook("b"));
        ch.plug(hook("c"));

        let names: Vec<_> = ch.snapshot().iter().map(|h| h.name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_unplug_removes_adjacent_duplicates_in_one_pass() {
        let ch = Channel::new();
        let first = hook("dup");
        ch.plug(first.clone());
        ch.plug(first.clone()); // adjacent duplicate, same identity
        ch.plug(hook("other"));
        ch.plug(first.clone()); // non-adjacent duplicate

        let removed = ch.unplug(&first);
        assert_eq!(removed, 3);
        assert_eq!(ch.len(), 1);
        assert_eq!(ch.snapshot()[0].name(), "other");
    }

    #[test]
    fn test_unplug_unknown_is_noop() {
        let ch = Channel::new();
        ch.plug(hook("a"));
        assert_eq!(ch.unplug(&hook("a")), 0); // same name, different identity
        assert_eq!(ch.len(), 1);
    }

    #[test]
    fn test_clear_empties_channel() {
        let ch = Channel::new();
        ch.plug(hook("a"));
        ch.plug(hook("b"));
        assert_eq!(ch.clear(), 2);
        assert!(ch.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_later_mutation() {
        let ch = Channel::new();
        let h = hook("a");
        ch.plug(h.clone());
        let snap = ch.snapshot();
        ch.unplug(&h);
        assert_eq!(snap.len(), 1);
        assert!(ch.is_empty());
    }
}
