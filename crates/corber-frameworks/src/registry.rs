//! Framework registry
//!
//! Central registry of framework factories. Handles registration, lookup and
//! detection, and builds the adapter for a project.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::context::FrameworkOptions;
use crate::detection::DetectionResult;
use crate::error::{FrameworkError, Result};
use crate::traits::{FrameworkAdapter, FrameworkFactory};

/// Registry of framework factories
pub struct FrameworkRegistry {
    /// Factories by ID
    factories: HashMap<String, Arc<dyn FrameworkFactory>>,

    /// Registration order, used as detection priority
    detection_order: Vec<String>,
}

impl FrameworkRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            detection_order: Vec::new(),
        }
    }

    /// Create a registry with all built-in frameworks
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::frameworks::register_all(&mut registry);
        registry
    }

    /// Register a framework factory
    pub fn register<F: FrameworkFactory + 'static>(&mut self, factory: F) {
        let id = factory.id().to_string();
        debug!(framework = %id, "registering framework");
        if self.factories.insert(id.clone(), Arc::new(factory)).is_none() {
            self.detection_order.push(id);
        }
    }

    /// Get a factory by ID
    pub fn get(&self, id: &str) -> Option<Arc<dyn FrameworkFactory>> {
        self.factories.get(id).cloned()
    }

    /// Registered framework IDs, in detection order
    pub fn ids(&self) -> Vec<&str> {
        self.detection_order.iter().map(|s| s.as_str()).collect()
    }

    /// Detect frameworks for a project, most confident first
    pub fn detect(&self, path: &Path) -> Vec<DetectionResult> {
        debug!(path = %path.display(), "detecting frameworks");
        let mut results: Vec<_> = self
            .detection_order
            .iter()
            .filter_map(|id| {
                let factory = self.factories.get(id)?;
                let detection = factory.detect(path);
                if detection.detected() {
                    Some(DetectionResult {
                        framework_id: factory.id().to_string(),
                        framework_name: factory.name().to_string(),
                        detection,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stable sort keeps registration order among equal confidences
        results.sort_by(|a, b| b.detection.cmp(&a.detection));
        if let Some(best) = results.first() {
            info!(
                detected_count = results.len(),
                best = %best.framework_name,
                confidence = best.detection.confidence(),
                "framework detection complete"
            );
        }
        results
    }

    /// Resolve a factory by name or by detecting the project at `path`
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn resolve(&self, path: &Path, name: Option<&str>) -> Result<Arc<dyn FrameworkFactory>> {
        if let Some(name) = name {
            return self.get(name).ok_or_else(|| FrameworkError::UnknownFramework {
                name: name.to_string(),
                supported: self.ids().join(", "),
            });
        }

        let detections = self.detect(path);

        if detections.is_empty() {
            return Err(FrameworkError::NoFrameworkDetected {
                path: path.to_path_buf(),
                supported: self.ids().join(", "),
            });
        }

        if detections.len() > 1 {
            let first = &detections[0];
            let second = &detections[1];

            // If confidence is too close, it's ambiguous
            if first.detection.confidence() < second.detection.confidence() + 20 {
                warn!(
                    first = %first.framework_name,
                    second = %second.framework_name,
                    "ambiguous framework detection"
                );
                return Err(FrameworkError::AmbiguousFramework {
                    frameworks: detections.iter().map(|d| d.framework_name.clone()).collect(),
                });
            }
        }

        self.get(&detections[0].framework_id).ok_or_else(|| {
            FrameworkError::context("framework resolution", "detected framework not registered")
        })
    }

    /// Resolve the framework for a project and build its adapter
    pub fn create(
        &self,
        name: Option<&str>,
        options: FrameworkOptions,
    ) -> Result<Box<dyn FrameworkAdapter>> {
        let factory = self.resolve(options.project.root(), name)?;
        info!(framework = factory.id(), "using framework");
        Ok(factory.create(options))
    }
}

impl Default for FrameworkRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
