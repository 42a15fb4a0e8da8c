//! Native call-surface contract used by the insets service.

use std::{future::Future, pin::Pin, rc::Rc};

use serde_json::Value;

/// Native method that applies an inset mask and answers with the resulting insets.
pub const SET_MASK_METHOD: &str = "setMask";
/// Native method that installs the persistent inset-change callback.
pub const SET_LISTENER_METHOD: &str = "setListener";

/// Object-safe boxed future used by [`PlatformBridge`] async methods.
pub type BridgeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One delivery from a persistent subscription: a native payload or a native failure.
pub type BridgeEvent = Result<Value, String>;

/// Callback invoked for every delivery of a persistent subscription.
pub type BridgeEventHandler = Rc<dyn Fn(BridgeEvent)>;

/// Host bridge into the native layer.
///
/// Implementations own the transport. They never reorder subscription deliveries and expose no
/// way to cancel a subscription once it is registered.
pub trait PlatformBridge {
    /// Returns whether the native layer pushes live inset changes on this host.
    ///
    /// Hosts that answer `false` are treated as no-op platforms: nothing is subscribed and mask
    /// requests are answered from the cached snapshot.
    fn supports_live_insets(&self) -> bool;

    /// Performs one named native operation and resolves exactly once.
    fn invoke<'a>(
        &'a self,
        service: &'a str,
        method: &'a str,
        args: Vec<Value>,
    ) -> BridgeFuture<'a, Result<Value, String>>;

    /// Registers a persistent callback that the native layer calls for the rest of the process.
    fn subscribe(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
        on_event: BridgeEventHandler,
    );
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op bridge for hosts without native inset support.
pub struct NoopPlatformBridge;

impl PlatformBridge for NoopPlatformBridge {
    fn supports_live_insets(&self) -> bool {
        false
    }

    fn invoke<'a>(
        &'a self,
        _service: &'a str,
        _method: &'a str,
        _args: Vec<Value>,
    ) -> BridgeFuture<'a, Result<Value, String>> {
        Box::pin(async { Ok(Value::Null) })
    }

    fn subscribe(
        &self,
        _service: &str,
        _method: &str,
        _args: Vec<Value>,
        _on_event: BridgeEventHandler,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;

    #[test]
    fn noop_bridge_reports_no_live_insets_and_never_delivers() {
        let bridge = NoopPlatformBridge;
        let bridge_obj: &dyn PlatformBridge = &bridge;
        let delivered = Rc::new(Cell::new(false));
        let flag = delivered.clone();

        assert!(!bridge_obj.supports_live_insets());
        bridge_obj.subscribe(
            "Insets",
            SET_LISTENER_METHOD,
            Vec::new(),
            Rc::new(move |_: BridgeEvent| flag.set(true)),
        );
        assert_eq!(
            block_on(bridge_obj.invoke("Insets", SET_MASK_METHOD, Vec::new())).expect("invoke"),
            Value::Null
        );
        assert!(!delivered.get());
    }
}
