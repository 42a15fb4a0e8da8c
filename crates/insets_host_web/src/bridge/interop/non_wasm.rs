use super::*;

fn unsupported() -> String {
    "Cordova bridge calls are only available when compiled for wasm32".to_string()
}

pub fn platform_id() -> Option<String> {
    None
}

pub async fn exec(_service: &str, _action: &str, _args: Vec<Value>) -> Result<Value, String> {
    Err(unsupported())
}

pub fn exec_persistent(
    _service: &str,
    _action: &str,
    _args: Vec<Value>,
    on_event: BridgeEventHandler,
) {
    on_event(Err(unsupported()));
}
