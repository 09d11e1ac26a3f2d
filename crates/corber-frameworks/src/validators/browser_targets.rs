//! Browser target check
//!
//! Ember transpiles for the browsers listed in `config/targets.js`. A list
//! that only names desktop browsers produces bundles the device webview may
//! not run, so at least one query has to reach iOS or Android webviews.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{FrameworkError, Result};

use super::Check;

/// Project-relative location of the browser targets module
pub const TARGETS_PATH: &str = "config/targets.js";

/// Fragments of browserslist queries that include a mobile webview.
/// Generic queries (`last 2 versions`, `> 0.5%`, `defaults`) cover mobile
/// browsers as well.
const MOBILE_QUERY_HINTS: &[&str] = &[
    "ios",
    "safari",
    "android",
    "and_chr",
    "chrome",
    "last ",
    ">",
    "defaults",
    "cover ",
    "since ",
];

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserTargetsValidator {
    pub config: Value,
    pub root: PathBuf,
}

impl BrowserTargetsValidator {
    pub const ID: &'static str = "browser-targets";

    pub fn new(config: Value, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    pub fn validate(&self) -> Result<Check> {
        let targets_path = self.root.join(TARGETS_PATH);
        if !targets_path.is_file() {
            debug!(path = %targets_path.display(), "no browser targets, using framework defaults");
            return Ok(Check::Pass);
        }

        let source = read_targets(&targets_path)?;
        let Some(browsers) = parse_browsers(&source) else {
            debug!(path = %targets_path.display(), "browsers list not statically readable");
            return Ok(Check::Pass);
        };

        if browsers.iter().any(|query| covers_mobile(query)) {
            return Ok(Check::Pass);
        }

        let environment = self
            .config
            .get("environment")
            .and_then(Value::as_str)
            .unwrap_or("development");

        Ok(Check::Fail(format!(
            "{} targets [{}] for the {} build, none of which run in a mobile webview. \
             Add a query such as 'last 2 iOS versions' or 'last 2 ChromeAndroid versions'",
            TARGETS_PATH,
            browsers.join(", "),
            environment
        )))
    }
}

fn read_targets(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        FrameworkError::context(format!("reading {}", path.display()), e.to_string())
    })
}

fn browsers_list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)browsers\s*[:=]\s*\[(?P<list>[^\]]*)\]").expect("valid browsers regex")
    })
}

fn quoted_string_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"['"`](?P<q>[^'"`]+)['"`]"#).expect("valid string regex"))
}

/// Extract the literal entries of the first `browsers` array
fn parse_browsers(source: &str) -> Option<Vec<String>> {
    let list = browsers_list_regex().captures(source)?.name("list")?.as_str();
    let browsers: Vec<String> = quoted_string_regex()
        .captures_iter(list)
        .filter_map(|c| c.name("q").map(|m| m.as_str().trim().to_string()))
        .collect();

    if browsers.is_empty() {
        None
    } else {
        Some(browsers)
    }
}

/// Whether a browserslist query selects browsers used by mobile webviews.
///
/// `not` queries only exclude browsers, so they never count, and neither does
/// the excluded half of an `and not` combination.
fn covers_mobile(query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.starts_with("not ") {
        return false;
    }
    let selected = query.split(" and not ").next().unwrap_or_default();
    MOBILE_QUERY_HINTS.iter().any(|hint| selected.contains(hint))
}
