use std::rc::Rc;

use insets_host::{
    BridgeEventHandler, BridgeFuture, InsetsConfig, InsetsService, NoopPlatformBridge,
    PlatformBridge,
};
use serde_json::Value;

use crate::{cordova_platform_id, document_ready_signal, CordovaPlatformBridge};

#[cfg(all(feature = "host-cordova", feature = "host-stub"))]
compile_error!("features `host-cordova` and `host-stub` are mutually exclusive; enable only one");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for the insets bridge.
pub enum HostStrategy {
    /// Use Cordova when the webview has it loaded, otherwise the no-op bridge.
    Detect,
    /// Always use the Cordova bridge.
    Cordova,
    /// Always use the no-op bridge.
    Stub,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Cordova => "cordova",
            Self::Stub => "stub",
        }
    }
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-cordova")]
    {
        HostStrategy::Cordova
    }

    #[cfg(feature = "host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(any(feature = "host-cordova", feature = "host-stub")))]
    {
        HostStrategy::Detect
    }
}

/// Adapter enum that erases the concrete bridge behind [`PlatformBridge`].
#[derive(Debug, Clone)]
pub enum PlatformBridgeAdapter {
    /// Cordova `exec` transport.
    Cordova(CordovaPlatformBridge),
    /// No-op bridge for hosts without the native plugin.
    Stub(NoopPlatformBridge),
}

impl PlatformBridgeAdapter {
    /// Returns the active adapter label.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cordova(_) => "cordova",
            Self::Stub(_) => "stub",
        }
    }
}

impl PlatformBridge for PlatformBridgeAdapter {
    fn supports_live_insets(&self) -> bool {
        match self {
            Self::Cordova(bridge) => bridge.supports_live_insets(),
            Self::Stub(bridge) => bridge.supports_live_insets(),
        }
    }

    fn invoke<'a>(
        &'a self,
        service: &'a str,
        method: &'a str,
        args: Vec<Value>,
    ) -> BridgeFuture<'a, Result<Value, String>> {
        match self {
            Self::Cordova(bridge) => bridge.invoke(service, method, args),
            Self::Stub(bridge) => bridge.invoke(service, method, args),
        }
    }

    fn subscribe(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
        on_event: BridgeEventHandler,
    ) {
        match self {
            Self::Cordova(bridge) => bridge.subscribe(service, method, args, on_event),
            Self::Stub(bridge) => bridge.subscribe(service, method, args, on_event),
        }
    }
}

/// Builds the bridge adapter for `strategy`.
pub fn bridge_for_strategy(strategy: HostStrategy) -> PlatformBridgeAdapter {
    match strategy {
        HostStrategy::Detect => match cordova_platform_id() {
            Some(platform_id) => {
                PlatformBridgeAdapter::Cordova(CordovaPlatformBridge::with_platform_id(platform_id))
            }
            None => PlatformBridgeAdapter::Stub(NoopPlatformBridge),
        },
        HostStrategy::Cordova => PlatformBridgeAdapter::Cordova(CordovaPlatformBridge::detect()),
        HostStrategy::Stub => PlatformBridgeAdapter::Stub(NoopPlatformBridge),
    }
}

/// Builds the bridge adapter for the compile-time selected strategy.
pub fn platform_bridge() -> PlatformBridgeAdapter {
    bridge_for_strategy(selected_host_strategy())
}

/// Composition root: builds the insets service and wires it to host readiness.
///
/// The returned handle is the one application code should share; `initialize` runs when the
/// configured ready event fires and may also be awaited directly.
pub fn build_insets_service(config: InsetsConfig) -> InsetsService {
    let bridge = platform_bridge();
    tracing::debug!(
        strategy = selected_host_strategy().as_str(),
        bridge = bridge.name(),
        live_insets = bridge.supports_live_insets(),
        "building insets service"
    );
    let ready = document_ready_signal(&config.ready_event);
    let service = InsetsService::with_config(Rc::new(bridge), config);
    service.install(&ready);
    service
}

#[cfg(test)]
mod tests {
    use futures::{executor::block_on, FutureExt};
    use insets_host::{InitializationPhase, InsetSnapshot, InsetTypeMask};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn stub_strategy_selects_noop_bridge() {
        let bridge = bridge_for_strategy(HostStrategy::Stub);
        assert_eq!(bridge.name(), "stub");
        assert!(!bridge.supports_live_insets());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn detect_strategy_without_cordova_falls_back_to_stub() {
        assert_eq!(bridge_for_strategy(HostStrategy::Detect).name(), "stub");
        assert_eq!(bridge_for_strategy(HostStrategy::Cordova).name(), "cordova");
    }

    #[cfg(not(any(feature = "host-cordova", feature = "host-stub")))]
    #[test]
    fn default_build_detects_host() {
        assert_eq!(selected_host_strategy(), HostStrategy::Detect);
        assert_eq!(selected_host_strategy().as_str(), "detect");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_composition_root_is_initialized_and_answers_from_cache() {
        let service = build_insets_service(InsetsConfig::default());

        assert_eq!(service.initialization_phase(), InitializationPhase::Completed);
        assert_eq!(service.initialize().now_or_never(), Some(Ok(())));
        assert_eq!(
            block_on(service.set_mask(InsetTypeMask::SYSTEM_BARS)),
            Ok(InsetSnapshot::ZERO)
        );
    }
}
