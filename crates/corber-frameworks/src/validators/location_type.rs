//! Router location strategy check
//!
//! Hybrid apps load `index.html` from the device filesystem, where the
//! history API cannot resolve application routes. Only hash-based (or
//! disabled) routing works.

use serde_json::Value;

use super::Check;

/// Location types that work when served from `file://`
const SUPPORTED_LOCATION_TYPES: &[&str] = &["hash", "none"];

/// Ember's default when `locationType` is not set
const DEFAULT_LOCATION_TYPE: &str = "auto";

#[derive(Debug, Clone, PartialEq)]
pub struct LocationTypeValidator {
    pub config: Value,
    pub force: Option<bool>,
}

impl LocationTypeValidator {
    pub const ID: &'static str = "location-type";

    pub fn new(config: Value, force: Option<bool>) -> Self {
        Self { config, force }
    }

    pub fn validate(&self) -> Check {
        let location_type = self
            .config
            .get("locationType")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LOCATION_TYPE);

        if SUPPORTED_LOCATION_TYPES.contains(&location_type) {
            return Check::Pass;
        }

        let message = format!(
            "locationType is '{}' but hybrid builds need 'hash'. \
             Set ENV.locationType = 'hash' in config/environment.js",
            location_type
        );

        if self.force == Some(true) {
            Check::Warn(message)
        } else {
            Check::Fail(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_and_none_pass() {
        for location in ["hash", "none"] {
            let v = LocationTypeValidator::new(json!({ "locationType": location }), None);
            assert_eq!(v.validate(), Check::Pass);
        }
    }

    #[test]
    fn test_history_fails() {
        let v = LocationTypeValidator::new(json!({ "locationType": "history" }), None);
        match v.validate() {
            Check::Fail(message) => assert!(message.contains("'history'")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_location_type_is_auto() {
        let v = LocationTypeValidator::new(json!({}), Some(false));
        match v.validate() {
            Check::Fail(message) => assert!(message.contains("'auto'")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_force_downgrades_to_warning() {
        let v = LocationTypeValidator::new(json!({ "locationType": "history" }), Some(true));
        assert!(matches!(v.validate(), Check::Warn(_)));
    }
}
