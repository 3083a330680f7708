//! `skillkit package` command - zip a validated skill for distribution

use crate::CliError;
use colored::Colorize;
use skillkit_core::loader::package_name;
use skillkit_core::{DESCRIPTOR_FILE, ValidationPolicy, validate_package};
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// File name suffixes never shipped in an archive
const EXCLUDED_SUFFIXES: [&str; 4] = [".pyc", ".pyo", ".swp", "~"];
/// Entry names never shipped in an archive
const EXCLUDED_NAMES: [&str; 2] = ["__pycache__", ".DS_Store"];

/// Execute the `skillkit package` command
pub fn run(
    path: &Path,
    output_dir: &Path,
    skip_validation: bool,
    policy: &ValidationPolicy,
) -> Result<PathBuf, CliError> {
    if !path.exists() {
        return Err(CliError::PackageError(format!(
            "Skill directory does not exist: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(CliError::PackageError(format!(
            "Path is not a directory: {}",
            path.display()
        )));
    }
    if !path.join(DESCRIPTOR_FILE).exists() {
        return Err(CliError::PackageError(format!(
            "{DESCRIPTOR_FILE} not found in {}",
            path.display()
        )));
    }

    if skip_validation {
        warn!("Skipping validation for {}", path.display());
    } else {
        println!("{} Validating skill...", "🔍".cyan());
        let report = validate_package(path, policy);
        print!("{}", report.text(false));
        if !report.passes(false) {
            return Err(CliError::ValidationFailed(
                "Validation failed. Fix errors before packaging.".to_string(),
            ));
        }
    }

    let archive = write_archive(path, output_dir)?;

    let size_kb = fs::metadata(&archive)?.len() as f64 / 1024.0;
    println!();
    println!("{} Skill packaged successfully!", "✅".green());
    println!("   File: {}", archive.display());
    println!("   Size: {size_kb:.1} KB");

    Ok(archive)
}

/// Files to ship, relative to `root`, in walk order
pub fn collect_files(root: &Path, skip: Option<&Path>) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let excluded = entry
                .path()
                .strip_prefix(root)
                .map(is_excluded)
                .unwrap_or(false);
            let skipped = skip.is_some_and(|dir| entry.path().starts_with(dir));
            !excluded && !skipped
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }

    Ok(files)
}

/// Hidden components, byte-compiled output and editor leftovers
fn is_excluded(relative: &Path) -> bool {
    let hidden = relative.components().any(|component| match component {
        Component::Normal(part) => {
            let part = part.to_string_lossy();
            part.starts_with('.') || EXCLUDED_NAMES.contains(&part.as_ref())
        }
        _ => false,
    });
    if hidden {
        return true;
    }

    relative
        .file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            EXCLUDED_SUFFIXES
                .iter()
                .any(|suffix| name.ends_with(suffix))
        })
        .unwrap_or(false)
}

/// Archive entry name: `<skill>/<relative path>` with `/` separators
fn entry_name(skill: &str, relative: &Path) -> String {
    let mut name = skill.to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            name.push('/');
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

fn write_archive(root: &Path, output_dir: &Path) -> Result<PathBuf, CliError> {
    let skill = package_name(root);
    println!("{} Packaging skill: {}", "📦".cyan(), skill.cyan());

    fs::create_dir_all(output_dir)?;
    let output_dir = fs::canonicalize(output_dir)?;
    let root = fs::canonicalize(root)?;
    let archive_path = output_dir.join(format!("{skill}.zip"));

    let files = collect_files(&root, Some(&output_dir))?;

    let mut zip = ZipWriter::new(File::create(&archive_path)?);
    for relative in files {
        let source = root.join(&relative);
        let name = entry_name(&skill, &relative);

        let mut options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            options = options.unix_permissions(fs::metadata(&source)?.permissions().mode());
        }

        zip.start_file(name.as_str(), options)?;
        std::io::copy(&mut File::open(&source)?, &mut zip)?;
        debug!("Added {} to archive", source.display());
        println!("  + {name}");
    }
    zip.finish()?;

    Ok(archive_path)
}
