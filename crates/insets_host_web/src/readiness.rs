//! Host readiness wiring for webview documents.

use insets_host::ReadinessSignal;

/// Returns a [`ReadinessSignal`] fired by the first `event_name` DOM event on `document`.
///
/// Outside `wasm32` there is no document to wait on and the signal is returned already fired.
/// If the listener cannot be installed the failure is logged and the signal never fires; callers
/// can still initialize directly.
pub fn document_ready_signal(event_name: &str) -> ReadinessSignal {
    let signal = ReadinessSignal::new();

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(err) = listen_for_ready(event_name, &signal) {
            tracing::warn!("host readiness listener install failed: {err}");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::debug!(event = event_name, "no document on this target; host is ready");
        signal.fire();
    }

    signal
}

#[cfg(target_arch = "wasm32")]
fn listen_for_ready(event_name: &str, signal: &ReadinessSignal) -> Result<(), String> {
    use wasm_bindgen::{closure::Closure, JsCast};

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "document unavailable".to_string())?;
    let fire_signal = signal.clone();
    let on_ready = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
        fire_signal.fire();
    }));
    document
        .add_event_listener_with_callback(event_name, on_ready.as_ref().unchecked_ref())
        .map_err(|err| format!("failed to listen for `{event_name}`: {err:?}"))?;
    on_ready.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_signal_is_fired_on_creation() {
        let signal = document_ready_signal("deviceready");
        assert!(signal.is_ready());
        assert!(!signal.fire());
    }
}
