//! Aggregation of many validator results into one operator-facing report.

use crate::error::{Validation, ValidationError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Collects the failures of independent validators.
///
/// Validators know nothing about each other; the caller records each result here and
/// decides afterwards whether the failures are fatal.
///
/// # Examples
///
/// ```rust
/// use preflight_config::prelude::*;
///
/// let options = Options::new();
/// let mut report = ValidationReport::new();
/// report.record(validate_required_string("db.example", "host", "Database"));
/// report.record(validate_certs_present(&options, &["ca"], "TLS"));
///
/// assert!(!report.is_ok());
/// assert_eq!(report.errors().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a validator result. Returns whether it passed.
    pub fn record(&mut self, result: Validation) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.errors.push(err);
                false
            }
        }
    }

    /// Whether no failure was recorded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded failures in recording order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Failures grouped by field group, groups sorted by name.
    pub fn by_field_group(&self) -> BTreeMap<&str, Vec<&ValidationError>> {
        let mut groups: BTreeMap<&str, Vec<&ValidationError>> = BTreeMap::new();
        for err in &self.errors {
            groups.entry(err.field_group.as_str()).or_default().push(err);
        }
        groups
    }

    /// `Ok(())` if nothing failed, otherwise the report itself.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }

    /// Render the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Extend<Validation> for ValidationReport {
    fn extend<I: IntoIterator<Item = Validation>>(&mut self, iter: I) {
        for result in iter {
            self.record(result);
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return writeln!(f, "All validations passed");
        }
        writeln!(f, "{} validation error(s):", self.errors.len())?;
        for (group, errors) in self.by_field_group() {
            writeln!(f, "[{}]", group)?;
            for err in errors {
                writeln!(f, "  - {} ({})", err.message, err.tags.join(", "))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}
