//! `skillkit init` command implementation

use crate::CliError;
use colored::Colorize;
use skillkit_core::DESCRIPTOR_FILE;
use std::path::{Path, PathBuf};

/// Where skills land when only `--name` is given
const DEFAULT_SKILLS_DIR: &str = ".claude/skills";
const DEFAULT_DESCRIPTION: &str = "TODO: Add description";

/// Execute the `skillkit init` command
pub fn run(
    name: Option<&str>,
    description: Option<&str>,
    path: Option<&Path>,
) -> Result<PathBuf, CliError> {
    let (skill_dir, name) = match (path, name) {
        (Some(path), _) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    CliError::InitError(format!("Cannot derive a skill name from {}", path.display()))
                })?;
            (path.to_path_buf(), name)
        }
        (None, Some(name)) => (Path::new(DEFAULT_SKILLS_DIR).join(name), name.to_string()),
        (None, None) => {
            return Err(CliError::InitError(
                "either --name or --path is required".to_string(),
            ));
        }
    };

    check_name(&name)?;
    let description = description.unwrap_or(DEFAULT_DESCRIPTION);

    println!("{} Creating new skill: {}", "→".green(), name.cyan());
    println!("  Directory: {}", skill_dir.display());

    create_skill(&skill_dir, &name, description)?;

    println!("{} Skill created at: {}", "✓".green(), skill_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/{DESCRIPTOR_FILE} with your skill instructions", skill_dir.display());
    println!("  2. Add detailed documentation to references/");
    println!("  3. Add executable scripts to scripts/");
    println!("  4. Remove example files you don't need");
    println!();
    println!("Validate with: skillkit validate {}", skill_dir.display());

    Ok(skill_dir)
}

fn check_name(name: &str) -> Result<(), CliError> {
    let stripped: String = name.chars().filter(|c| *c != '-' && *c != '_').collect();
    if stripped.is_empty() || !stripped.chars().all(char::is_alphanumeric) {
        return Err(CliError::InitError(format!(
            "Skill name must be kebab-case alphanumeric: {name}"
        )));
    }
    if name != name.to_lowercase() {
        return Err(CliError::InitError(format!(
            "Skill name must be lowercase: {name}"
        )));
    }
    Ok(())
}

/// `database-patterns` -> `Database Patterns`
fn title_case(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn create_skill(skill_dir: &Path, name: &str, description: &str) -> Result<(), CliError> {
    for sub in ["references", "scripts", "assets"] {
        std::fs::create_dir_all(skill_dir.join(sub))?;
    }

    let title = title_case(name);

    let skill_md = format!(
        r#"---
name: {name}
description: {description}
---

# {title}

## Overview

[Provide a brief overview of what this skill does and when to use it]

## Quick Start

```typescript
// Example code showing basic usage
```

## Core Patterns

### Pattern 1: [Name]

[Describe the pattern]

```typescript
// Code example
```

### Pattern 2: [Name]

[Describe the pattern]

```typescript
// Code example
```

## Advanced Usage

For detailed information, see:
- [references/detailed-guide.md](references/detailed-guide.md)

## Scripts

- `scripts/example.py`: Description of what this script does

## Notes

- Important note 1
- Important note 2
"#
    );
    std::fs::write(skill_dir.join(DESCRIPTOR_FILE), skill_md)?;

    let reference_md = format!(
        r#"# {title} Reference

## Section 1

Content here...

## Section 2

Content here...
"#
    );
    std::fs::write(skill_dir.join("references/detailed-guide.md"), reference_md)?;

    let script_py = r#"#!/usr/bin/env python3
"""
Description of what this script does.

Usage:
    python example.py
"""


def main():
    print("Script executed successfully")


if __name__ == "__main__":
    main()
"#;
    let script_path = skill_dir.join("scripts/example.py");
    std::fs::write(&script_path, script_py)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))?;
    }

    let readme_md = format!(
        r#"# {title}

{description}

## Structure

- `SKILL.md` - Main skill instructions
- `references/` - Detailed documentation loaded as needed
- `scripts/` - Executable code for deterministic operations
- `assets/` - Templates, images, or other resources
"#
    );
    std::fs::write(skill_dir.join("README.md"), readme_md)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillkit_core::{ValidationPolicy, Verdict, validate_package};
    use tempfile::tempdir;

    #[test]
    fn title_case_splits_on_dashes() {
        assert_eq!(title_case("database-patterns"), "Database Patterns");
        assert_eq!(title_case("pdf"), "Pdf");
    }

    #[test]
    fn name_checks() {
        assert!(check_name("database-patterns").is_ok());
        assert!(check_name("snake_case").is_ok());
        assert!(check_name("Upper").is_err());
        assert!(check_name("has space").is_err());
        assert!(check_name("--").is_err());
    }

    #[test]
    fn requires_name_or_path() {
        assert!(matches!(run(None, None, None), Err(CliError::InitError(_))));
    }

    #[test]
    fn scaffold_has_standard_layout() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("pdf-tools");
        run(None, Some("Process PDFs. Use when handling documents."), Some(&dir)).unwrap();

        assert!(dir.join("SKILL.md").is_file());
        assert!(dir.join("README.md").is_file());
        assert!(dir.join("references/detailed-guide.md").is_file());
        assert!(dir.join("scripts/example.py").is_file());
        assert!(dir.join("assets").is_dir());

        let skill_md = std::fs::read_to_string(dir.join("SKILL.md")).unwrap();
        assert!(skill_md.starts_with("---\nname: pdf-tools\n"));
        assert!(skill_md.contains("# Pdf Tools"));
    }

    #[test]
    fn scaffold_is_flagged_until_edited() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("pdf-tools");
        run(None, Some("Process PDFs. Use when handling documents."), Some(&dir)).unwrap();

        let report = validate_package(&dir, &ValidationPolicy::default());
        assert_eq!(report.verdict(), Verdict::ValidWithWarnings, "{report:?}");
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.message == "SKILL.md contains TODO placeholders")
        );
    }
}
