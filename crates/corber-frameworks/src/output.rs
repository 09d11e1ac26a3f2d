//! Structured output for CI/CD integration
//!
//! Every orchestrated operation produces an [`Output`]. Interactive runs
//! render it as short human-readable text, CI runs as JSON.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::validators::ValidationIssue;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text (default for interactive)
    #[default]
    Text,
    /// JSON (default for CI)
    Json,
}

impl OutputFormat {
    /// Detect format from environment
    pub fn from_env() -> Self {
        if std::env::var("CI").is_ok() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Structured output that can be rendered in multiple formats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    /// Whether the operation succeeded
    pub success: bool,

    /// Primary message
    pub message: String,

    /// Operation that was performed
    pub operation: String,

    /// Duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Warnings
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    /// Values for scripts and CI steps (output path, port, ...)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, String>,

    /// Additional metadata
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Output {
    fn new(success: bool, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            operation: operation.into(),
            duration_ms: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            outputs: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Create a success output
    pub fn success(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(true, operation, message)
    }

    /// Create a failure output
    pub fn failure(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(false, operation, message)
    }

    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Add validation warnings, one line per issue
    pub fn with_issues_as_warnings(mut self, issues: &[ValidationIssue]) -> Self {
        self.warnings.extend(issues.iter().map(|i| i.to_string()));
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.insert(key.into(), value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.render_text(),
            OutputFormat::Json => self.render_json(),
        }
    }

    /// Print output to stdout
    pub fn print(&self, format: OutputFormat) {
        print!("{}", self.render(format));
    }

    /// Print output to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W, format: OutputFormat) -> std::io::Result<()> {
        write!(writer, "{}", self.render(format))
    }

    fn render_text(&self) -> String {
        let mut out = String::new();

        let status = if self.success { "✓" } else { "✗" };
        out.push_str(&format!("{} {}\n", status, self.message));

        if let Some(ms) = self.duration_ms {
            out.push_str(&format!("  Duration: {}ms\n", ms));
        }

        for (key, value) in &self.outputs {
            out.push_str(&format!("  {}: {}\n", key, value));
        }

        for warning in &self.warnings {
            out.push_str(&format!("⚠ {}\n", warning));
        }

        for error in &self.errors {
            out.push_str(&format!("✗ {}\n", error));
        }

        out
    }

    fn render_json(&self) -> String {
        let mut json = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        json.push('\n');
        json
    }
}
