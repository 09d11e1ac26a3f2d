//! Framework detection
//!
//! Factories inspect a project directory and report how sure they are that
//! it uses their framework.

use std::path::Path;

use serde_json::Value;

/// Detection result from a factory
#[derive(Debug, Clone)]
pub enum Detection {
    /// Framework definitely not present
    No,
    /// Framework might be present with confidence 0-100
    Maybe(u8),
    /// Framework definitely present with confidence 0-100
    Yes(u8),
}

impl Detection {
    /// Create a confident detection (80-100)
    pub fn confident(confidence: u8) -> Self {
        Self::Yes(confidence.min(100))
    }

    /// Create a possible detection (40-79)
    pub fn possible(confidence: u8) -> Self {
        Self::Maybe(confidence.min(100))
    }

    /// Get the confidence score (0-100)
    pub fn confidence(&self) -> u8 {
        match self {
            Self::No => 0,
            Self::Maybe(c) | Self::Yes(c) => *c,
        }
    }

    /// Check if detected (Maybe or Yes)
    pub fn detected(&self) -> bool {
        !matches!(self, Self::No)
    }

    /// Check if confident (Yes with high confidence)
    pub fn is_confident(&self) -> bool {
        matches!(self, Self::Yes(c) if *c >= 80)
    }
}

impl PartialEq for Detection {
    fn eq(&self, other: &Self) -> bool {
        self.confidence() == other.confidence()
    }
}

impl Eq for Detection {}

impl PartialOrd for Detection {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Detection {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.confidence().cmp(&other.confidence())
    }
}

/// Result of running one factory's detection
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub framework_id: String,
    pub framework_name: String,
    pub detection: Detection,
}

// -----------------------------------------------------------------------------
// Detection helpers
// -----------------------------------------------------------------------------

/// Check if a file exists at the path
pub fn file_exists(path: &Path, filename: &str) -> bool {
    path.join(filename).exists()
}

/// Check if any of the files exist at the path
pub fn any_file_exists(path: &Path, filenames: &[&str]) -> bool {
    filenames.iter().any(|f| file_exists(path, f))
}

/// Check if package.json has a dependency
pub fn has_npm_dependency(path: &Path, package: &str) -> bool {
    let Some(json) = read_package_json(path) else {
        return false;
    };

    ["dependencies", "devDependencies", "peerDependencies"]
        .iter()
        .filter_map(|key| json.get(*key).and_then(|v| v.as_object()))
        .any(|deps| deps.contains_key(package))
}

fn read_package_json(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path.join("package.json")).ok()?;
    serde_json::from_str(&content).ok()
}
