//! Rule battery
//!
//! Each rule is a plain function from [`RuleContext`] to the diagnostics it
//! finds. Rules never see each other's output and never abort the run; the
//! evaluator folds over [`RULES`] in order, which fixes the report order.

use crate::diagnostic::Diagnostic;
use crate::frontmatter::Frontmatter;
use crate::loader::SkillPackage;
use crate::policy::ValidationPolicy;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

pub const NAME_FORMAT: &str = "name-format";
pub const NAME_DIRECTORY: &str = "name-directory";
pub const NAME_LENGTH: &str = "name-length";
pub const DESCRIPTION_LENGTH: &str = "description-length";
pub const DESCRIPTION_GUIDANCE: &str = "description-guidance";
pub const BODY_LENGTH: &str = "body-length";
pub const PLACEHOLDERS: &str = "placeholders";
pub const REFERENCES: &str = "references";
pub const SCRIPTS: &str = "scripts";
pub const ASSETS: &str = "assets";

static KEBAB_CASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub package: &'a SkillPackage,
    pub frontmatter: &'a Frontmatter,
    pub body: &'a str,
    pub policy: &'a ValidationPolicy,
}

pub type RuleFn = fn(&RuleContext<'_>) -> Vec<Diagnostic>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub check: RuleFn,
}

/// The battery, in report order
pub const RULES: &[Rule] = &[
    Rule { id: NAME_FORMAT, check: check_name_format },
    Rule { id: NAME_DIRECTORY, check: check_name_directory },
    Rule { id: NAME_LENGTH, check: check_name_length },
    Rule { id: DESCRIPTION_LENGTH, check: check_description_length },
    Rule { id: DESCRIPTION_GUIDANCE, check: check_description_guidance },
    Rule { id: BODY_LENGTH, check: check_body_length },
    Rule { id: PLACEHOLDERS, check: check_placeholders },
    Rule { id: REFERENCES, check: check_references },
    Rule { id: SCRIPTS, check: check_scripts },
    Rule { id: ASSETS, check: check_assets },
];

/// Run every rule and concatenate their findings
pub fn evaluate(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    RULES
        .iter()
        .flat_map(|rule| {
            let found = (rule.check)(ctx);
            debug!("Rule {} produced {} diagnostic(s)", rule.id, found.len());
            found
        })
        .collect()
}

fn check_name_format(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    match ctx.frontmatter.name() {
        Some(name) if !KEBAB_CASE.is_match(name) => vec![Diagnostic::error(
            NAME_FORMAT,
            format!("Skill name must be lowercase kebab-case: '{name}'"),
        )],
        _ => vec![],
    }
}

fn check_name_directory(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    match ctx.frontmatter.name() {
        Some(name) if name != ctx.package.dir_name => vec![Diagnostic::warning(
            NAME_DIRECTORY,
            format!(
                "Skill name '{name}' doesn't match directory name '{}'",
                ctx.package.dir_name
            ),
        )],
        _ => vec![],
    }
}

fn check_name_length(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let Some(name) = ctx.frontmatter.name() else {
        return vec![];
    };

    let len = name.chars().count();
    if len > ctx.policy.name_max_len {
        vec![Diagnostic::error(
            NAME_LENGTH,
            format!(
                "Skill name too long (max {} chars): {len}",
                ctx.policy.name_max_len
            ),
        )]
    } else {
        vec![]
    }
}

fn check_description_length(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let Some(description) = ctx.frontmatter.description() else {
        return vec![];
    };

    let len = description.chars().count();
    if len > ctx.policy.description_max_len {
        vec![Diagnostic::error(
            DESCRIPTION_LENGTH,
            format!(
                "Description too long (max {} chars): {len}",
                ctx.policy.description_max_len
            ),
        )]
    } else if len < ctx.policy.description_min_len {
        vec![Diagnostic::warning(
            DESCRIPTION_LENGTH,
            "Description is very short (consider adding more detail)",
        )]
    } else {
        vec![]
    }
}

fn check_description_guidance(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let Some(description) = ctx.frontmatter.description() else {
        return vec![];
    };

    let lowered = description.to_lowercase();
    let has_guidance = ctx.policy.guidance_keywords.is_empty()
        || ctx
            .policy
            .guidance_keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()));

    if has_guidance {
        vec![]
    } else {
        vec![Diagnostic::warning(
            DESCRIPTION_GUIDANCE,
            "Consider adding 'when to use' guidance to description",
        )]
    }
}

fn check_body_length(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    if ctx.body.trim().chars().count() < ctx.policy.body_min_len {
        vec![Diagnostic::warning(BODY_LENGTH, "SKILL.md body is very short")]
    } else {
        vec![]
    }
}

fn check_placeholders(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let found = ctx
        .policy
        .placeholder_markers
        .iter()
        .any(|marker| ctx.body.contains(marker.as_str()));

    if found {
        vec![Diagnostic::warning(
            PLACEHOLDERS,
            "SKILL.md contains TODO placeholders",
        )]
    } else {
        vec![]
    }
}

fn check_references(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let Some(files) = &ctx.package.references else {
        return vec![];
    };

    if files.is_empty() {
        return vec![Diagnostic::warning(
            REFERENCES,
            "references/ directory exists but is empty",
        )];
    }

    files
        .iter()
        .filter(|file| !ctx.package.descriptor.contains(file.as_str()))
        .map(|file| {
            Diagnostic::warning(
                REFERENCES,
                format!("Reference file '{file}' not mentioned in SKILL.md"),
            )
        })
        .collect()
}

fn check_scripts(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let Some(scripts) = &ctx.package.scripts else {
        return vec![];
    };

    if scripts.is_empty() {
        return vec![Diagnostic::warning(
            SCRIPTS,
            "scripts/ directory exists but is empty",
        )];
    }

    let mut diagnostics = vec![];
    for script in scripts {
        let Some(first_line) = &script.first_line else {
            diagnostics.push(Diagnostic::warning(
                SCRIPTS,
                format!("Script could not be read: {}", script.file_name),
            ));
            continue;
        };
        if !script.executable {
            diagnostics.push(Diagnostic::warning(
                SCRIPTS,
                format!("Script is not executable: {}", script.file_name),
            ));
        }
        if !first_line.starts_with("#!") {
            diagnostics.push(Diagnostic::warning(
                SCRIPTS,
                format!("Script missing shebang: {}", script.file_name),
            ));
        }
    }
    diagnostics
}

fn check_assets(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    match &ctx.package.assets {
        Some(entries) if entries.is_empty() => vec![Diagnostic::warning(
            ASSETS,
            "assets/ directory exists but is empty",
        )],
        _ => vec![],
    }
}
