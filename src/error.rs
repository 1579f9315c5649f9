//! Error types used by the dispatch engine.
//!
//! Two kinds of failure exist:
//!
//! - [`ConfigError`] — misuse of the API surface itself: plugging into an
//!   undeclared action, installing a second exception handler. Always
//!   surfaced at the offending call, never recovered silently.
//! - [`HookError`] — anything a listener fails with during a shout. By
//!   default it propagates unchanged to the shout caller; only an installed
//!   exception handler can convert it into a return value.
//!
//! [`ConfigError`] provides [`as_label`](ConfigError::as_label) /
//! [`as_message`](ConfigError::as_message) helpers for logging.

use std::error::Error;

use thiserror::Error;

/// Boxed failure produced by a listener (or by an exception handler).
///
/// Listeners return whatever error type they like behind this alias; the
/// engine never inspects it, it only routes it.
pub type HookError = Box<dyn Error + Send + Sync + 'static>;

/// # Errors produced by speaker configuration and wiring.
///
/// These represent failures of the calling code, not of listeners, and are
/// never swallowed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A name-taking operation referenced an action the speaker never
    /// declared. Only `shout` tolerates unknown actions (it yields an empty
    /// result); registration does not.
    #[error("speaker {speaker} has no action {action:?}")]
    UnknownAction {
        /// Owning speaker name (normalized).
        speaker: String,
        /// The unknown action, as given by the caller.
        action: String,
    },

    /// A second exception handler was installed on a speaker that already
    /// has one. The override slot is single-assignment for the speaker's
    /// lifetime.
    #[error(
        "attempt to register {attempted} as an exception handler for speaker \
         {speaker}, but it already has {existing} assigned"
    )]
    HandlerTaken {
        /// Display name of the handler the caller tried to install.
        attempted: String,
        /// Display name of the handler already installed.
        existing: String,
        /// Owning speaker name (normalized).
        speaker: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use speakers::ConfigError;
    ///
    /// let err = ConfigError::UnknownAction {
    ///     speaker: "build".into(),
    ///     action: "missing".into(),
    /// };
    /// assert_eq!(err.as_label(), "unknown_action");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::UnknownAction { .. } => "unknown_action",
            ConfigError::HandlerTaken { .. } => "handler_taken",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
