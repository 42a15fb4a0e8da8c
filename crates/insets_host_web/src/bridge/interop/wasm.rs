use super::*;
use js_sys::Promise;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = r#"
const UNAVAILABLE = 'cordova is unavailable in this webview';

function cordovaHandle() {
  return typeof cordova === 'undefined' ? null : cordova;
}

export function jsCordovaPlatformId() {
  const handle = cordovaHandle();
  return handle && typeof handle.platformId === 'string' ? handle.platformId : undefined;
}

export function jsCordovaExec(service, action, args) {
  return new Promise((resolve, reject) => {
    const handle = cordovaHandle();
    if (!handle) {
      reject(new Error(UNAVAILABLE));
      return;
    }
    handle.exec(resolve, reject, service, action, args);
  });
}

export function jsCordovaExecPersistent(service, action, args, onEvent, onError) {
  const handle = cordovaHandle();
  if (!handle) {
    onError(new Error(UNAVAILABLE));
    return;
  }
  handle.exec((value) => onEvent(value), (err) => onError(err), service, action, args);
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsCordovaPlatformId)]
    fn js_cordova_platform_id() -> Option<String>;
    #[wasm_bindgen(js_name = jsCordovaExec)]
    fn js_cordova_exec(service: &str, action: &str, args: JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsCordovaExecPersistent)]
    fn js_cordova_exec_persistent(
        service: &str,
        action: &str,
        args: JsValue,
        on_event: &Closure<dyn FnMut(JsValue)>,
        on_error: &Closure<dyn FnMut(JsValue)>,
    );
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn to_js_args(args: &[Value]) -> Result<JsValue, String> {
    args.serialize(&Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

fn from_js_payload(value: JsValue) -> Result<Value, String> {
    if value.is_null() || value.is_undefined() {
        return Ok(Value::Null);
    }
    from_value(value).map_err(|e| e.to_string())
}

pub fn platform_id() -> Option<String> {
    js_cordova_platform_id()
}

pub async fn exec(service: &str, action: &str, args: Vec<Value>) -> Result<Value, String> {
    let args = to_js_args(&args)?;
    let value = JsFuture::from(js_cordova_exec(service, action, args))
        .await
        .map_err(js_error_to_string)?;
    from_js_payload(value)
}

pub fn exec_persistent(
    service: &str,
    action: &str,
    args: Vec<Value>,
    on_event: BridgeEventHandler,
) {
    let args = match to_js_args(&args) {
        Ok(args) => args,
        Err(err) => {
            on_event(Err(err));
            return;
        }
    };

    let event_handler = on_event.clone();
    let on_value = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |value: JsValue| {
        match from_js_payload(value) {
            Ok(payload) => event_handler(Ok(payload)),
            Err(err) => tracing::warn!("dropping unreadable native insets event: {err}"),
        }
    }));
    let on_error = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |err: JsValue| {
        on_event(Err(js_error_to_string(err)));
    }));
    js_cordova_exec_persistent(service, action, args, &on_value, &on_error);
    // Cordova keeps both callbacks for the process lifetime; there is no unsubscribe.
    on_value.forget();
    on_error.forget();
}
