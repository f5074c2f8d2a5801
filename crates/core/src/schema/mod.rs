//! Theme document validation.
//!
//! [`parse_theme`] turns a candidate JSON document into a typed [`Theme`],
//! and [`validate_theme`] re-checks a theme that was built in code. Neither
//! stops at the first problem: every violation is collected with the path
//! where it was found.

mod checks;
mod document;

use serde_json::Value;
use tekton_contract::Theme;

pub use document::{ValidationReport, Violation, ViolationKind};

pub(crate) use checks::is_valid_id;

/// Validates a candidate theme document.
pub fn validate(candidate: &Value) -> Result<(), ValidationReport> {
    parse_theme(candidate).map(|_| ())
}

/// Parses and validates a candidate theme document.
pub fn parse_theme(candidate: &Value) -> Result<Theme, ValidationReport> {
    let parsed = document::parse(candidate);
    let mut violations = parsed.violations;
    // Header fields that were missing or mistyped are already reported.
    for violation in checks::check_header(&parsed.theme) {
        if !violations.iter().any(|v| v.path == violation.path) {
            violations.push(violation);
        }
    }
    violations.extend(checks::check_tokens(&parsed.theme, &parsed.rejected));
    if violations.is_empty() {
        Ok(parsed.theme)
    } else {
        Err(ValidationReport { violations })
    }
}

/// Validates a theme that already exists in typed form.
pub fn validate_theme(theme: &Theme) -> Result<(), ValidationReport> {
    let mut violations = checks::check_header(theme);
    violations.extend(checks::check_tokens(theme, &Default::default()));
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport { violations })
    }
}
