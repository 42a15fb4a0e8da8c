//! Webview (`wasm32`) transports for [`insets_host`] and the composition root that wires them.
//!
//! The native insets plugin is reached through `cordova.exec`; the bridge glue lives under
//! `bridge::interop` with a non-wasm fallback so the crate builds and tests on any host.
//! Host readiness comes from a DOM event (`deviceready` by default).

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and the insets service composition root.
pub mod adapters;
mod bridge;
pub mod readiness;

pub use adapters::{
    bridge_for_strategy, build_insets_service, platform_bridge, selected_host_strategy,
    HostStrategy, PlatformBridgeAdapter,
};
pub use bridge::{cordova_platform_id, CordovaPlatformBridge};
pub use readiness::document_ready_signal;
