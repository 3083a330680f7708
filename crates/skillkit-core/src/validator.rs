//! Validation driver: loader, frontmatter parser, rules, report

use crate::diagnostic::Diagnostic;
use crate::frontmatter;
use crate::loader::{SkillPackage, package_name};
use crate::policy::ValidationPolicy;
use crate::report::ValidationReport;
use crate::rules::{self, RuleContext};
use std::path::Path;
use tracing::info;

/// Rule id for fencing failures
pub const FRONTMATTER: &str = "frontmatter";
/// Rule id for required fields absent from the frontmatter
pub const REQUIRED_FIELD: &str = "required-field";

/// Validate the skill package at `path`.
///
/// Never fails: structural problems (missing directory, missing
/// `SKILL.md`, broken fencing) come back as the report's only error.
pub fn validate_package(path: impl AsRef<Path>, policy: &ValidationPolicy) -> ValidationReport {
    let path = path.as_ref();
    let display_path = path.display().to_string();
    info!("Validating skill package at {}", display_path);

    let package = match SkillPackage::load(path) {
        Ok(package) => package,
        Err(err) => {
            return ValidationReport::new(
                package_name(path),
                display_path,
                [Diagnostic::error(err.rule(), err.to_string())],
            );
        }
    };

    let parsed = match frontmatter::parse(&package.descriptor) {
        Ok(parsed) => parsed,
        Err(err) => {
            return ValidationReport::new(
                package.dir_name,
                display_path,
                [Diagnostic::error(FRONTMATTER, err.to_string())],
            );
        }
    };

    let mut diagnostics: Vec<Diagnostic> = parsed
        .frontmatter
        .missing_required()
        .into_iter()
        .map(|field| {
            Diagnostic::error(
                REQUIRED_FIELD,
                format!("SKILL.md frontmatter missing '{field}' field"),
            )
        })
        .collect();

    let ctx = RuleContext {
        package: &package,
        frontmatter: &parsed.frontmatter,
        body: &parsed.body,
        policy,
    };
    diagnostics.extend(rules::evaluate(&ctx));

    let report = ValidationReport::new(package.dir_name.clone(), display_path, diagnostics);
    info!(
        "Skill '{}' validated: {} ({} errors, {} warnings)",
        report.skill,
        report.verdict(),
        report.errors.len(),
        report.warnings.len()
    );
    report
}
