//! Native bridge contracts and lightweight adapters.

mod memory;
mod platform_bridge;

pub use memory::{BridgeCall, MemoryPlatformBridge};
pub use platform_bridge::{
    BridgeEvent, BridgeEventHandler, BridgeFuture, NoopPlatformBridge, PlatformBridge,
    SET_LISTENER_METHOD, SET_MASK_METHOD,
};
