//! Report assembly
//!
//! Splits the diagnostics of one run into errors and warnings, derives the
//! [`Verdict`], and renders text or JSON. Strict mode lives only here.

use crate::diagnostic::Diagnostic;
use colored::Colorize;
use serde::Serialize;
use std::fmt::{self, Write};

/// Width of the header rule line
const RULE_WIDTH: usize = 60;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Valid,
    ValidWithWarnings,
    Invalid,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Valid => "valid",
            Self::ValidWithWarnings => "valid-with-warnings",
            Self::Invalid => "invalid",
        };
        write!(f, "{value}")
    }
}

/// Complete outcome of one validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Package directory name
    pub skill: String,
    pub path: String,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
}

/// Serialisable view of a report under a given strictness
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub skill: &'a str,
    pub path: &'a str,
    pub verdict: Verdict,
    pub strict: bool,
    pub passed: bool,
    pub summary: ReportSummary,
    pub errors: &'a [Diagnostic],
    pub warnings: &'a [Diagnostic],
}

impl ValidationReport {
    /// Build a report, keeping each severity in arrival order
    pub fn new(
        skill: impl Into<String>,
        path: impl Into<String>,
        diagnostics: impl IntoIterator<Item = Diagnostic>,
    ) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            diagnostics.into_iter().partition(Diagnostic::is_error);
        Self {
            skill: skill.into(),
            path: path.into(),
            errors,
            warnings,
        }
    }

    pub fn verdict(&self) -> Verdict {
        if !self.errors.is_empty() {
            Verdict::Invalid
        } else if !self.warnings.is_empty() {
            Verdict::ValidWithWarnings
        } else {
            Verdict::Valid
        }
    }

    /// Whether the run succeeds; strict mode also fails on warnings
    pub fn passes(&self, strict: bool) -> bool {
        self.errors.is_empty() && !(strict && !self.warnings.is_empty())
    }

    /// Process exit code for this report
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.passes(strict) { 0 } else { 1 }
    }

    pub fn document(&self, strict: bool) -> ReportDocument<'_> {
        ReportDocument {
            skill: &self.skill,
            path: &self.path,
            verdict: self.verdict(),
            strict,
            passed: self.passes(strict),
            summary: ReportSummary {
                errors: self.errors.len(),
                warnings: self.warnings.len(),
            },
            errors: &self.errors,
            warnings: &self.warnings,
        }
    }

    pub fn to_json(&self, strict: bool) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.document(strict))
    }

    /// Human-readable report: header, errors, warnings, summary
    pub fn render(&self, strict: bool) -> String {
        self.text(strict).to_string()
    }

    /// Text form of the report, for use with `write!`/`print!`
    pub fn text(&self, strict: bool) -> ReportText<'_> {
        ReportText {
            report: self,
            strict,
        }
    }

    fn write_text(&self, out: &mut impl fmt::Write, strict: bool) -> fmt::Result {
        writeln!(out)?;
        writeln!(out, "📋 Validating skill: {}", self.skill.cyan())?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

        if !self.errors.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "❌ Errors:".red())?;
            for error in &self.errors {
                writeln!(out, "  ❌ {}", error.message)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "⚠️  Warnings:".yellow())?;
            for warning in &self.warnings {
                writeln!(out, "  ⚠️  {}", warning.message)?;
            }
        }

        writeln!(out)?;
        match self.verdict() {
            Verdict::Valid => writeln!(out, "{}", "✅ Skill is valid!".green())?,
            Verdict::ValidWithWarnings => {
                writeln!(out, "{}", "✅ Skill is valid (with warnings)".green())?
            }
            Verdict::Invalid => writeln!(
                out,
                "{}",
                format!(
                    "❌ Skill validation failed with {} error(s)",
                    self.errors.len()
                )
                .red()
            )?,
        }

        if strict && self.errors.is_empty() && !self.warnings.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "❌ Failed in strict mode due to warnings".red())?;
        }

        Ok(())
    }
}

/// [`Display`](fmt::Display) adapter returned by [`ValidationReport::text`]
pub struct ReportText<'a> {
    report: &'a ValidationReport,
    strict: bool,
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.report.write_text(f, self.strict)
    }
}
