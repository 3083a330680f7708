//! `skillkit validate` command implementation

use crate::CliError;
use skillkit_core::{ValidationPolicy, validate_package};
use std::path::Path;

/// Execute the `skillkit validate` command
pub fn run(
    path: &Path,
    policy: &ValidationPolicy,
    strict: bool,
    json: bool,
) -> Result<(), CliError> {
    let report = validate_package(path, policy);

    if json {
        println!("{}", report.to_json(strict)?);
    } else {
        print!("{}", report.text(strict));
    }

    if !report.errors.is_empty() {
        return Err(CliError::ValidationFailed(format!(
            "skill validation failed with {} error(s)",
            report.errors.len()
        )));
    }
    if !report.passes(strict) {
        return Err(CliError::ValidationFailed(format!(
            "strict mode failed with {} warning(s)",
            report.warnings.len()
        )));
    }

    Ok(())
}
