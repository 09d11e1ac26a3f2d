//! Framework adapter implementations
//!
//! Each framework knows how to detect its projects and how to build, serve and
//! validate them with its own native tooling.

pub mod ember;

pub use ember::{EmberFactory, EmberFramework};

use crate::registry::FrameworkRegistry;

/// Register all built-in frameworks
pub fn register_all(registry: &mut FrameworkRegistry) {
    // Order matters for detection priority
    registry.register(EmberFactory::new());
}
