//! Display-inset host contracts and the insets service used by application code.
//!
//! This crate is the platform-agnostic boundary for device display insets (status bar,
//! navigation bar, cutout, IME, gesture areas). It defines the native bridge contract, the inset
//! value model, and [`InsetsService`], which subscribes to native inset changes once, caches the
//! latest insets, and fans changes out to listeners. Concrete webview transports live in
//! `insets_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod insets;
pub mod listeners;
pub mod readiness;
pub mod service;

pub use bridge::{
    BridgeCall, BridgeEvent, BridgeEventHandler, BridgeFuture, MemoryPlatformBridge,
    NoopPlatformBridge, PlatformBridge, SET_LISTENER_METHOD, SET_MASK_METHOD,
};
pub use config::{InsetsConfig, DEFAULT_READY_EVENT, DEFAULT_SERVICE_NAME};
pub use error::InsetsError;
pub use insets::{InsetSnapshot, InsetType, InsetTypeMask};
pub use listeners::{InsetsListener, ListenerRegistry};
pub use readiness::ReadinessSignal;
pub use service::{InitializationPhase, InitializeFuture, InsetsService};
