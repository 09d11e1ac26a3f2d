//! Project configuration validators
//!
//! A validator is a single configuration check built from the project's
//! current configuration. Adapters assemble an ordered list of
//! [`ValidatorDescriptor`]s and hand it to a [`ValidationRunner`], which runs
//! every check and reports all failures together.

mod browser_targets;
mod location_type;
mod root_url;
mod runner;

use std::fmt;

use serde::Serialize;

use crate::error::Result;

pub use browser_targets::BrowserTargetsValidator;
pub use location_type::LocationTypeValidator;
pub use root_url::{RootUrlValidator, ROOT_URL_PROPS};
pub use runner::{SequentialRunner, ValidationRunner};

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Configuration is compatible
    Pass,
    /// Configuration is incompatible but the caller forced the operation
    Warn(String),
    /// Configuration is incompatible
    Fail(String),
}

/// A configuration check, ready to run
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorDescriptor {
    BrowserTargets(BrowserTargetsValidator),
    LocationType(LocationTypeValidator),
    RootUrl(RootUrlValidator),
}

impl ValidatorDescriptor {
    /// Stable identifier used in reports
    pub fn id(&self) -> &'static str {
        match self {
            Self::BrowserTargets(_) => BrowserTargetsValidator::ID,
            Self::LocationType(_) => LocationTypeValidator::ID,
            Self::RootUrl(_) => RootUrlValidator::ID,
        }
    }

    /// Run the check
    ///
    /// Expected configuration problems come back as [`Check::Fail`]; `Err` is
    /// reserved for conditions such as an unreadable file.
    pub fn validate(&self) -> Result<Check> {
        match self {
            Self::BrowserTargets(v) => v.validate(),
            Self::LocationType(v) => Ok(v.validate()),
            Self::RootUrl(v) => Ok(v.validate()),
        }
    }
}

impl From<BrowserTargetsValidator> for ValidatorDescriptor {
    fn from(v: BrowserTargetsValidator) -> Self {
        Self::BrowserTargets(v)
    }
}

impl From<LocationTypeValidator> for ValidatorDescriptor {
    fn from(v: LocationTypeValidator) -> Self {
        Self::LocationType(v)
    }
}

impl From<RootUrlValidator> for ValidatorDescriptor {
    fn from(v: RootUrlValidator) -> Self {
        Self::RootUrl(v)
    }
}

/// A warning or failure attributed to one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub validator: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.validator, self.message)
    }
}

/// Outcome of a successful validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Validators that ran, in order
    pub checked: Vec<String>,
    /// Problems downgraded to warnings
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
