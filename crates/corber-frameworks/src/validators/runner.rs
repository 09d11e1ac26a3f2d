//! Validator execution

use tracing::{debug, info, warn};

use crate::error::{FrameworkError, Result};

use super::{Check, ValidationIssue, ValidationReport, ValidatorDescriptor};

/// Executes an ordered list of validators
///
/// Adapters receive a runner at construction time so tests can substitute a
/// recording implementation.
pub trait ValidationRunner: Send + Sync {
    fn run(&self, validators: Vec<ValidatorDescriptor>) -> Result<ValidationReport>;
}

/// Runs validators one after another and aggregates every failure
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialRunner;

impl ValidationRunner for SequentialRunner {
    fn run(&self, validators: Vec<ValidatorDescriptor>) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();
        let mut failures = Vec::new();

        for validator in &validators {
            let id = validator.id();
            debug!(validator = id, "running validator");
            report.checked.push(id.to_string());

            match validator.validate() {
                Ok(Check::Pass) => {}
                Ok(Check::Warn(message)) => {
                    warn!(validator = id, %message, "validation warning");
                    report.warnings.push(ValidationIssue::new(id, message));
                }
                Ok(Check::Fail(message)) => {
                    failures.push(ValidationIssue::new(id, message));
                }
                // Still reported alongside the other checks.
                Err(e) => {
                    warn!(validator = id, error = %e, "validator could not run");
                    failures.push(ValidationIssue::new(id, e.to_string()));
                }
            }
        }

        if !failures.is_empty() {
            info!(
                failed = failures.len(),
                total = validators.len(),
                "configuration validation failed"
            );
            return Err(FrameworkError::ValidationFailed { failures });
        }

        debug!(total = validators.len(), warnings = report.warnings.len(), "validation passed");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{LocationTypeValidator, RootUrlValidator};
    use serde_json::json;

    #[test]
    fn test_empty_list_passes() {
        let report = SequentialRunner.run(Vec::new()).unwrap();
        assert!(report.checked.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_aggregates_all_failures() {
        let config = json!({ "locationType": "history", "rootURL": "/" });
        let validators = vec![
            LocationTypeValidator::new(config.clone(), None).into(),
            RootUrlValidator::new(config, "config/environment.js", None).into(),
        ];

        match SequentialRunner.run(validators) {
            Err(FrameworkError::ValidationFailed { failures }) => {
                let ids: Vec<_> = failures.iter().map(|f| f.validator.as_str()).collect();
                assert_eq!(ids, vec!["location-type", "root-url"]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_forced_failures_become_warnings() {
        let config = json!({ "locationType": "auto", "rootURL": "/" });
        let validators = vec![
            LocationTypeValidator::new(config.clone(), Some(true)).into(),
            RootUrlValidator::new(config, "config/environment.js", Some(true)).into(),
        ];

        let report = SequentialRunner.run(validators).unwrap();
        assert_eq!(report.checked, vec!["location-type", "root-url"]);
        assert_eq!(report.warnings.len(), 2);
    }
}
