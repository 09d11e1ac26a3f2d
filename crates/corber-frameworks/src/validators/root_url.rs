//! Root URL check
//!
//! Assets in a hybrid build are resolved relative to `index.html`, so every
//! root URL setting the framework recognises must be the empty string.

use serde_json::Value;

use super::Check;

/// Config keys frameworks use for the application root URL
pub const ROOT_URL_PROPS: [&str; 4] = ["baseURL", "rootURL", "baseUrl", "rootUrl"];

#[derive(Debug, Clone, PartialEq)]
pub struct RootUrlValidator {
    pub config: Value,
    pub root_props: Vec<String>,
    /// Project-relative config file named in messages
    pub path: String,
    pub force: Option<bool>,
}

impl RootUrlValidator {
    pub const ID: &'static str = "root-url";

    /// Validator over the standard [`ROOT_URL_PROPS`]
    pub fn new(config: Value, path: impl Into<String>, force: Option<bool>) -> Self {
        Self {
            config,
            root_props: ROOT_URL_PROPS.iter().map(|p| p.to_string()).collect(),
            path: path.into(),
            force,
        }
    }

    pub fn validate(&self) -> Check {
        let offending: Vec<String> = self
            .root_props
            .iter()
            .filter_map(|prop| {
                let value = self.config.get(prop)?;
                match value {
                    Value::String(s) if s.is_empty() => None,
                    Value::Null => None,
                    other => Some(format!("{} is {}", prop, other)),
                }
            })
            .collect();

        if offending.is_empty() {
            return Check::Pass;
        }

        let message = format!(
            "{}: {}; hybrid builds need an empty root URL ('')",
            self.path,
            offending.join(", ")
        );

        if self.force == Some(true) {
            Check::Warn(message)
        } else {
            Check::Fail(message)
        }
    }
}
