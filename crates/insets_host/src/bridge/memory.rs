//! Scriptable in-memory bridge for headless hosts and tests.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use serde_json::Value;

use super::platform_bridge::{BridgeEventHandler, BridgeFuture, PlatformBridge};
use crate::InsetSnapshot;

/// One recorded bridge call.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeCall {
    /// Native service name.
    pub service: String,
    /// Native method name.
    pub method: String,
    /// Call arguments.
    pub args: Vec<Value>,
}

struct Subscription {
    call: BridgeCall,
    on_event: BridgeEventHandler,
}

struct MemoryBridgeState {
    live_insets: bool,
    invocations: Vec<BridgeCall>,
    responses: VecDeque<Result<Value, String>>,
    subscriptions: Vec<Subscription>,
}

/// In-memory bridge that records calls and lets the caller play the native side.
///
/// `invoke` answers with the next scripted response; with none queued the returned future
/// never resolves, which models a stalled native call.
#[derive(Clone)]
pub struct MemoryPlatformBridge {
    inner: Rc<RefCell<MemoryBridgeState>>,
}

impl Default for MemoryPlatformBridge {
    fn default() -> Self {
        Self::with_live_insets(true)
    }
}

impl std::fmt::Debug for MemoryPlatformBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("MemoryPlatformBridge")
            .field("live_insets", &state.live_insets)
            .field("invocations", &state.invocations.len())
            .field("queued_responses", &state.responses.len())
            .field("subscriptions", &state.subscriptions.len())
            .finish()
    }
}

impl MemoryPlatformBridge {
    /// Creates a bridge that supports live inset subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bridge with an explicit live-insets capability.
    pub fn with_live_insets(live_insets: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryBridgeState {
                live_insets,
                invocations: Vec::new(),
                responses: VecDeque::new(),
                subscriptions: Vec::new(),
            })),
        }
    }

    /// Queues the response for the next `invoke`.
    pub fn push_response(&self, response: Result<Value, String>) {
        self.inner.borrow_mut().responses.push_back(response);
    }

    /// Queues a successful `invoke` response carrying `insets`.
    pub fn push_insets_response(&self, insets: InsetSnapshot) {
        self.push_response(serde_json::to_value(insets).map_err(|e| e.to_string()));
    }

    /// Delivers a raw native payload to every registered subscription, in registration order.
    pub fn emit(&self, payload: Value) {
        for handler in self.handlers() {
            handler(Ok(payload.clone()));
        }
    }

    /// Delivers `insets` to every registered subscription.
    pub fn emit_insets(&self, insets: InsetSnapshot) {
        match serde_json::to_value(insets) {
            Ok(payload) => self.emit(payload),
            Err(err) => tracing::warn!("memory bridge could not encode insets: {err}"),
        }
    }

    /// Reports a native failure to every registered subscription.
    pub fn fail_subscriptions(&self, reason: &str) {
        for handler in self.handlers() {
            handler(Err(reason.to_string()));
        }
    }

    /// Returns every `invoke` call seen so far.
    pub fn invocations(&self) -> Vec<BridgeCall> {
        self.inner.borrow().invocations.clone()
    }

    /// Returns every `subscribe` call seen so far.
    pub fn subscriptions(&self) -> Vec<BridgeCall> {
        self.inner
            .borrow()
            .subscriptions
            .iter()
            .map(|subscription| subscription.call.clone())
            .collect()
    }

    fn handlers(&self) -> Vec<BridgeEventHandler> {
        self.inner
            .borrow()
            .subscriptions
            .iter()
            .map(|subscription| subscription.on_event.clone())
            .collect()
    }
}

impl PlatformBridge for MemoryPlatformBridge {
    fn supports_live_insets(&self) -> bool {
        self.inner.borrow().live_insets
    }

    fn invoke<'a>(
        &'a self,
        service: &'a str,
        method: &'a str,
        args: Vec<Value>,
    ) -> BridgeFuture<'a, Result<Value, String>> {
        let response = {
            let mut state = self.inner.borrow_mut();
            state.invocations.push(BridgeCall {
                service: service.to_string(),
                method: method.to_string(),
                args,
            });
            state.responses.pop_front()
        };
        Box::pin(async move {
            match response {
                Some(response) => response,
                None => futures::future::pending().await,
            }
        })
    }

    fn subscribe(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
        on_event: BridgeEventHandler,
    ) {
        self.inner.borrow_mut().subscriptions.push(Subscription {
            call: BridgeCall {
                service: service.to_string(),
                method: method.to_string(),
                args,
            },
            on_event,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::{executor::block_on, FutureExt};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::bridge::{BridgeEvent, SET_LISTENER_METHOD, SET_MASK_METHOD};

    #[test]
    fn scripted_responses_are_consumed_in_order_and_recorded() {
        let bridge = MemoryPlatformBridge::new();
        bridge.push_response(Ok(json!({ "top": 1 })));
        bridge.push_response(Err("denied".to_string()));

        assert_eq!(
            block_on(bridge.invoke("Insets", SET_MASK_METHOD, vec![json!(1)])),
            Ok(json!({ "top": 1 }))
        );
        assert_eq!(
            block_on(bridge.invoke("Insets", SET_MASK_METHOD, vec![json!(2)])),
            Err("denied".to_string())
        );
        assert_eq!(
            bridge.invocations(),
            vec![
                BridgeCall {
                    service: "Insets".to_string(),
                    method: SET_MASK_METHOD.to_string(),
                    args: vec![json!(1)],
                },
                BridgeCall {
                    service: "Insets".to_string(),
                    method: SET_MASK_METHOD.to_string(),
                    args: vec![json!(2)],
                },
            ]
        );
    }

    #[test]
    fn invoke_without_scripted_response_stays_pending() {
        let bridge = MemoryPlatformBridge::new();
        assert!(bridge
            .invoke("Insets", SET_MASK_METHOD, Vec::new())
            .now_or_never()
            .is_none());
    }

    #[test]
    fn emit_reaches_every_subscription_repeatedly() {
        let bridge = MemoryPlatformBridge::new();
        let seen: Rc<RefCell<Vec<BridgeEvent>>> = Rc::default();
        let sink = seen.clone();
        bridge.subscribe(
            "Insets",
            SET_LISTENER_METHOD,
            Vec::new(),
            Rc::new(move |event| sink.borrow_mut().push(event)),
        );

        bridge.emit_insets(InsetSnapshot::new(20.0, 0.0, 0.0, 0.0));
        bridge.fail_subscriptions("gone");

        assert_eq!(bridge.subscriptions().len(), 1);
        assert_eq!(
            *seen.borrow(),
            vec![
                Ok(json!({ "top": 20.0, "right": 0.0, "bottom": 0.0, "left": 0.0 })),
                Err("gone".to_string()),
            ]
        );
    }
}
