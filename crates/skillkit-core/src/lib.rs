//! Skillkit core
//!
//! Validation engine for skill packages: a directory holding a `SKILL.md`
//! descriptor plus optional `references/`, `scripts/` and `assets/` folders.
//!
//! A run flows one way through four stages:
//!
//! 1. [`loader`] reads the package from disk,
//! 2. [`frontmatter`] splits the descriptor into metadata and body,
//! 3. [`rules`] runs the fixed rule battery,
//! 4. [`report`] folds the diagnostics into a [`Verdict`].
//!
//! [`validate_package`] drives all four.

pub mod diagnostic;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod policy;
pub mod report;
pub mod rules;
pub mod validator;

pub use diagnostic::{Diagnostic, Severity};
pub use error::{SkillError, SkillResult};
pub use frontmatter::{Frontmatter, FrontmatterError, ParsedDescriptor};
pub use loader::{DESCRIPTOR_FILE, LoadError, ScriptFile, SkillPackage};
pub use policy::ValidationPolicy;
pub use report::{ReportText, ValidationReport, Verdict};
pub use validator::validate_package;
