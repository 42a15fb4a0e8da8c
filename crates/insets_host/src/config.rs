//! Bridge naming configuration for the insets service.

use serde::{Deserialize, Serialize};

/// Native service name registered by the insets plugin.
pub const DEFAULT_SERVICE_NAME: &str = "Insets";
/// Host event that marks the native bridge as usable.
pub const DEFAULT_READY_EVENT: &str = "deviceready";

/// Names used when talking to the native bridge and waiting for host readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetsConfig {
    /// Native service name passed to every bridge call.
    pub service_name: String,
    /// Host event name that fires the readiness signal.
    pub ready_event: String,
}

impl Default for InsetsConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            ready_event: DEFAULT_READY_EVENT.to_string(),
        }
    }
}

impl InsetsConfig {
    /// Parses a config from JSON text; omitted fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a valid config object.
    pub fn from_json_str(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(
            InsetsConfig::from_json_str("{}").expect("parse"),
            InsetsConfig::default()
        );
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config =
            InsetsConfig::from_json_str(r#"{"service_name":"WindowInsets"}"#).expect("parse");
        assert_eq!(config.service_name, "WindowInsets");
        assert_eq!(config.ready_event, DEFAULT_READY_EVENT);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(InsetsConfig::from_json_str("[]").is_err());
    }
}
