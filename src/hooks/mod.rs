//! Listener plumbing: descriptors and per-action channels.
//!
//! ## Contents
//! - [`Hook`] — descriptor wrapping one registered callback plus identity
//!   metadata and its diagnostic key.
//! - [`Callback`], [`Reply`] — the listener function shape.
//! - `Channel` (crate-private) — the ordered listener list owned by each
//!   declared action.

mod channel;
mod hook;

pub(crate) use channel::Channel;
pub use hook::{Callback, Hook, Reply};
