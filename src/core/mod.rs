//! Dispatch engine: speakers, per-action accessors, and the registry.
//!
//! ## Wiring
//! ```text
//! Speaker::new(name, actions)
//!   ├─► one Channel per normalized action        (hooks::Channel)
//!   ├─► exception-handler slot (single override)
//!   └─► Registry::insert(given name)             (global or caller-provided)
//!
//! speaker.plug(action, name, f) ─► Hook          (descriptor, identity)
//! speaker.shout(action, args)   ─► Reply<R>      (ordered, short-circuit)
//! speaker.unplug / release      ─► channel mutation
//! Registry::release_all()       ─► release() on every registered speaker
//! ```

mod action;
mod registry;
mod speaker;

pub use action::Action;
pub use registry::{Registry, Release};
pub use speaker::{Handler, Speaker};
