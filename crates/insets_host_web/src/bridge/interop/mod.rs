//! Cordova `exec` transport glue.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the bridge adapter above it.

use insets_host::BridgeEventHandler;
use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

/// Returns `cordova.platformId`, or `None` when Cordova is not loaded.
pub fn platform_id() -> Option<String> {
    imp::platform_id()
}

/// Runs one native action whose success or failure callback fires once.
pub async fn exec(service: &str, action: &str, args: Vec<Value>) -> Result<Value, String> {
    imp::exec(service, action, args).await
}

/// Runs one native action whose callbacks stay installed for the rest of the process.
pub fn exec_persistent(
    service: &str,
    action: &str,
    args: Vec<Value>,
    on_event: BridgeEventHandler,
) {
    imp::exec_persistent(service, action, args, on_event)
}
