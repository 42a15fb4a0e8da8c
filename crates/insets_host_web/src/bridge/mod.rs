//! Cordova-backed [`PlatformBridge`] adapter.

mod interop;

use insets_host::{BridgeEventHandler, BridgeFuture, PlatformBridge};
use serde_json::Value;

/// Cordova platforms whose native plugin side pushes no inset changes.
const PLATFORMS_WITHOUT_LIVE_INSETS: &[&str] = &["ios"];

/// Returns `cordova.platformId` for the running webview, if Cordova is loaded.
pub fn cordova_platform_id() -> Option<String> {
    interop::platform_id()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Native bridge that talks to the insets plugin through `cordova.exec`.
pub struct CordovaPlatformBridge {
    platform_id: Option<String>,
}

impl CordovaPlatformBridge {
    /// Creates a bridge for the Cordova platform detected in the running webview.
    pub fn detect() -> Self {
        Self {
            platform_id: cordova_platform_id(),
        }
    }

    /// Creates a bridge for an explicitly named Cordova platform.
    pub fn with_platform_id(platform_id: impl Into<String>) -> Self {
        Self {
            platform_id: Some(platform_id.into()),
        }
    }

    /// Returns the Cordova platform this bridge targets.
    pub fn platform_id(&self) -> Option<&str> {
        self.platform_id.as_deref()
    }
}

impl PlatformBridge for CordovaPlatformBridge {
    fn supports_live_insets(&self) -> bool {
        self.platform_id
            .as_deref()
            .is_some_and(|id| !PLATFORMS_WITHOUT_LIVE_INSETS.contains(&id))
    }

    fn invoke<'a>(
        &'a self,
        service: &'a str,
        method: &'a str,
        args: Vec<Value>,
    ) -> BridgeFuture<'a, Result<Value, String>> {
        Box::pin(async move { interop::exec(service, method, args).await })
    }

    fn subscribe(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
        on_event: BridgeEventHandler,
    ) {
        interop::exec_persistent(service, method, args, on_event);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use insets_host::{BridgeEvent, SET_LISTENER_METHOD, SET_MASK_METHOD};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn live_insets_follow_platform_id() {
        assert!(CordovaPlatformBridge::with_platform_id("android").supports_live_insets());
        assert!(!CordovaPlatformBridge::with_platform_id("ios").supports_live_insets());
        assert!(!CordovaPlatformBridge::default().supports_live_insets());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_detection_finds_no_cordova() {
        let bridge = CordovaPlatformBridge::detect();
        assert_eq!(bridge.platform_id(), None);
        assert!(!bridge.supports_live_insets());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_calls_fail_through_both_bridge_primitives() {
        let expected =
            "Cordova bridge calls are only available when compiled for wasm32".to_string();
        let bridge = CordovaPlatformBridge::with_platform_id("android");
        let bridge_obj: &dyn PlatformBridge = &bridge;

        assert_eq!(
            block_on(bridge_obj.invoke("Insets", SET_MASK_METHOD, vec![Value::from(1)]))
                .expect_err("invoke should fail"),
            expected
        );

        let seen: Rc<RefCell<Vec<BridgeEvent>>> = Rc::default();
        let sink = seen.clone();
        bridge_obj.subscribe(
            "Insets",
            SET_LISTENER_METHOD,
            Vec::new(),
            Rc::new(move |event| sink.borrow_mut().push(event)),
        );
        let expected_events: Vec<BridgeEvent> = vec![Err(expected)];
        assert_eq!(*seen.borrow(), expected_events);
    }
}
