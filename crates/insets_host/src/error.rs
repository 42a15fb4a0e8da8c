//! Typed failures surfaced by [`crate::InsetsService`].

use thiserror::Error;

/// Failure returned from initialization or mask requests.
///
/// The type is `Clone` so a single initialization outcome can be handed to every caller that
/// awaits the shared initialization result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsetsError {
    /// The native bridge rejected the call; the reason is passed through verbatim.
    #[error("{0}")]
    Bridge(String),
    /// The native bridge resolved with something other than an inset record.
    #[error("insets payload could not be decoded: {0}")]
    InvalidPayload(String),
    /// The owning service was dropped before initialization completed.
    #[error("insets initialization was cancelled before it completed")]
    Cancelled,
}

impl InsetsError {
    /// Returns whether the failure originated in the native bridge.
    pub const fn is_bridge_failure(&self) -> bool {
        matches!(self, Self::Bridge(_))
    }
}
