//! # speakers
//!
//! **Speakers** is a synchronous, in-process signal dispatch library for Rust.
//!
//! Independent modules communicate through named events without importing one
//! another: a [`Speaker`] declares a fixed set of **actions** (event
//! channels), callers **plug** listener functions into an action, and
//! **shouting** an action runs its listeners in registration order,
//! short-circuiting on the first non-empty result.
//!
//! ## Architecture
//! ```text
//!     ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!     │  listener 1 │       │  listener 2 │       │  listener N │
//!     └──────▲──────┘       └──────▲──────┘       └──────▲──────┘
//!            │ (speaker, args)     │ stops here when     │ starved if an
//!            │                     │ 2 returns Some      │ earlier hook
//!            │                     │                     │ returned Some
//! ┌──────────┴─────────────────────┴─────────────────────┴──────────────┐
//! │  Speaker "build"                                                    │
//! │  ├─ Channel "started"   [hook, hook, ...]  (registration order)     │
//! │  ├─ Channel "finished"  [hook, ...]                                 │
//! │  └─ exception policy    (default: propagate; one override, ever)    │
//! └──────────────────────────────────┬──────────────────────────────────┘
//!                                    ▼
//!                     Registry (process-wide, name → speaker,
//!                      insertion-ordered, release_all())
//! ```
//!
//! ## Dispatch contract
//! - Listeners run **synchronously**, in registration order, each receiving
//!   `(speaker, args)`.
//! - The first `Ok(Some(value))` becomes the shout result; later listeners
//!   never run.
//! - A listener `Err` is routed to the speaker's exception policy. The
//!   default policy propagates it unchanged, aborting the shout; an
//!   installed handler may convert it into a reply instead.
//! - Shouting an undeclared action yields `Ok(None)` — deliberately not an
//!   error.
//!
//! ## Example
//! ```
//! use speakers::{Registry, Speaker};
//!
//! # fn main() -> Result<(), speakers::ConfigError> {
//! let registry = Registry::new();
//! let before = Speaker::<String, usize>::with_registry(
//!     "before",
//!     &["file created", "file removed"],
//!     &registry,
//! );
//!
//! before.plug("file created", "audit", |_speaker, path| {
//!     // empty reply: dispatch continues
//!     println!("created: {path}");
//!     Ok(None)
//! })?;
//!
//! before.plug("file created", "sizer", |_speaker, path| {
//!     Ok(Some(path.len()))
//! })?;
//!
//! // "audit" runs first, "sizer" short-circuits with a value:
//! let reply = before.shout("file created", &"a/b.txt".to_string()).unwrap();
//! assert_eq!(reply, Some(7));
//! # Ok(())
//! # }
//! ```

mod core;
mod error;
mod hooks;
mod slug;

// ---- Public re-exports ----

pub use crate::core::{Action, Handler, Registry, Release, Speaker};
pub use error::{ConfigError, HookError};
pub use hooks::{Callback, Hook, Reply};
pub use slug::underscore;

/// Releases every listener of every speaker in the
/// [global registry](Registry::global).
///
/// Speakers stay declared and registered; only their channels are emptied.
pub fn release_all() {
    Registry::global().release_all();
}
