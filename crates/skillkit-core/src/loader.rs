//! Skill package loader
//!
//! Reads the `SKILL.md` descriptor and lists the optional `references/`,
//! `scripts/` and `assets/` folders. Everything the rules need from disk is
//! captured here, so the rules themselves never touch the filesystem.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Descriptor file name, relative to the package root
pub const DESCRIPTOR_FILE: &str = "SKILL.md";
pub const REFERENCES_DIR: &str = "references";
pub const SCRIPTS_DIR: &str = "scripts";
pub const ASSETS_DIR: &str = "assets";

/// Structural failures. Each one ends the run before any rule executes.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Skill directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("SKILL.md file not found")]
    MissingDescriptor,

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Rule id reported for this failure
    pub fn rule(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::NotADirectory(_) => "package-dir",
            Self::MissingDescriptor | Self::Read { .. } => "descriptor",
        }
    }
}

/// A `*.py` or `*.sh` file found under `scripts/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub file_name: String,
    /// Any of the owner/group/other execute bits is set
    pub executable: bool,
    /// First line of the file without its line terminator. `None` when the
    /// file could not be read.
    pub first_line: Option<String>,
}

/// Snapshot of a skill package taken at load time.
///
/// A subdirectory listing is `None` when the folder does not exist and
/// `Some(vec![])` when it exists but holds nothing relevant.
#[derive(Debug, Clone)]
pub struct SkillPackage {
    pub root: PathBuf,
    /// Base name of the package directory
    pub dir_name: String,
    /// Raw descriptor text, line endings normalised to `\n`
    pub descriptor: String,
    pub references: Option<Vec<String>>,
    pub scripts: Option<Vec<ScriptFile>>,
    pub assets: Option<Vec<String>>,
}

impl SkillPackage {
    /// Load a package rooted at `root`
    pub fn load(root: impl AsRef<Path>) -> Result<Self, LoadError> {
        let root = root.as_ref();

        if !root.exists() {
            return Err(LoadError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(LoadError::NotADirectory(root.to_path_buf()));
        }

        let descriptor_path = root.join(DESCRIPTOR_FILE);
        if !descriptor_path.is_file() {
            return Err(LoadError::MissingDescriptor);
        }

        let descriptor = fs::read_to_string(&descriptor_path)
            .map_err(|source| LoadError::Read {
                path: descriptor_path.clone(),
                source,
            })?
            .replace("\r\n", "\n");

        let references = list_files(&root.join(REFERENCES_DIR), &["md"]);

        let scripts_dir = root.join(SCRIPTS_DIR);
        let scripts = list_files(&scripts_dir, &["py", "sh"]).map(|names| {
            names
                .into_iter()
                .map(|name| inspect_script(&scripts_dir, name))
                .collect()
        });

        let assets = list_entries(&root.join(ASSETS_DIR));

        let package = Self {
            root: root.to_path_buf(),
            dir_name: package_name(root),
            descriptor,
            references,
            scripts,
            assets,
        };
        debug!(
            "Loaded skill package '{}' from {}",
            package.dir_name,
            root.display()
        );
        Ok(package)
    }
}

/// Base name of the package directory.
///
/// The path is canonicalised first so that `.` or `..` resolve to a real
/// directory name.
pub fn package_name(root: &Path) -> String {
    let resolved = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    resolved
        .file_name()
        .or_else(|| root.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Direct children of `dir`, dotfiles included, sorted by name
fn read_children(dir: &Path) -> Vec<walkdir::DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                None
            }
        })
        .collect()
}

/// Regular files in `dir` with one of `extensions`, grouped by extension in
/// the order given. `None` if `dir` is not a directory.
fn list_files(dir: &Path, extensions: &[&str]) -> Option<Vec<String>> {
    if !dir.is_dir() {
        return None;
    }

    let children = read_children(dir);
    let files = extensions
        .iter()
        .flat_map(|ext| {
            let suffix = format!(".{ext}");
            children.iter().filter(move |entry| {
                entry.path().is_file() && entry.file_name().to_string_lossy().ends_with(&suffix)
            })
        })
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    Some(files)
}

/// Every entry in `dir`. `None` if `dir` is not a directory.
fn list_entries(dir: &Path) -> Option<Vec<String>> {
    if !dir.is_dir() {
        return None;
    }

    Some(
        read_children(dir)
            .iter()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
    )
}

/// Exec bits and first line of a script. Read failures are logged and
/// recorded on the result; they never abort the load.
fn inspect_script(scripts_dir: &Path, file_name: String) -> ScriptFile {
    let path = scripts_dir.join(&file_name);

    let executable = match fs::metadata(&path) {
        Ok(metadata) => is_executable(&metadata),
        Err(err) => {
            warn!("Failed to stat {}: {}", path.display(), err);
            false
        }
    };

    let first_line = match read_first_line(&path) {
        Ok(line) => Some(line),
        Err(err) => {
            warn!("Failed to read {}: {}", path.display(), err);
            None
        }
    };

    ScriptFile {
        file_name,
        executable,
        first_line,
    }
}

fn read_first_line(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    Ok(String::from_utf8_lossy(&line)
        .trim_end_matches(['\n', '\r'])
        .to_string())
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_descriptor(dir: &Path) {
        fs::write(
            dir.join(DESCRIPTOR_FILE),
            "---\r\nname: demo\r\ndescription: Demo skill\r\n---\r\nBody\r\n",
        )
        .unwrap();
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = tempdir().unwrap();
        let err = SkillPackage::load(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert_eq!(err.rule(), "package-dir");
    }

    #[test]
    fn file_root_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let err = SkillPackage::load(&file).unwrap_err();
        assert!(matches!(err, LoadError::NotADirectory(_)));
    }

    #[test]
    fn missing_descriptor_is_reported() {
        let dir = tempdir().unwrap();
        let err = SkillPackage::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingDescriptor));
        assert_eq!(err.to_string(), "SKILL.md file not found");
    }

    #[test]
    fn descriptor_line_endings_are_normalised() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let package = SkillPackage::load(dir.path()).unwrap();
        assert!(package.descriptor.starts_with("---\nname: demo\n"));
        assert!(!package.descriptor.contains('\r'));
    }

    #[test]
    fn absent_subdirectories_are_none() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let package = SkillPackage::load(dir.path()).unwrap();
        assert!(package.references.is_none());
        assert!(package.scripts.is_none());
        assert!(package.assets.is_none());
    }

    #[test]
    fn references_list_markdown_files_sorted() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let refs = dir.path().join(REFERENCES_DIR);
        fs::create_dir_all(refs.join("nested.md")).unwrap();
        fs::write(refs.join("zeta.md"), "z").unwrap();
        fs::write(refs.join("alpha.md"), "a").unwrap();
        fs::write(refs.join("notes.txt"), "n").unwrap();
        fs::write(refs.join(".hidden.md"), "h").unwrap();

        let package = SkillPackage::load(dir.path()).unwrap();
        assert_eq!(
            package.references,
            Some(vec![
                ".hidden.md".to_string(),
                "alpha.md".to_string(),
                "zeta.md".to_string()
            ])
        );
    }

    #[test]
    fn scripts_list_python_before_shell() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let scripts = dir.path().join(SCRIPTS_DIR);
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("a.sh"), "#!/bin/sh\necho a\n").unwrap();
        fs::write(scripts.join("b.py"), "print('b')\n").unwrap();
        fs::write(scripts.join("c.rb"), "puts 'c'\n").unwrap();

        let package = SkillPackage::load(dir.path()).unwrap();
        let scripts = package.scripts.unwrap();
        let names: Vec<_> = scripts.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["b.py", "a.sh"]);
        assert_eq!(scripts[0].first_line.as_deref(), Some("print('b')"));
        assert_eq!(scripts[1].first_line.as_deref(), Some("#!/bin/sh"));
    }

    #[cfg(unix)]
    #[test]
    fn script_executable_bit_is_detected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let scripts = dir.path().join(SCRIPTS_DIR);
        fs::create_dir_all(&scripts).unwrap();
        let run = scripts.join("run.sh");
        let plain = scripts.join("plain.sh");
        fs::write(&run, "#!/bin/bash\n").unwrap();
        fs::write(&plain, "echo hi\n").unwrap();
        fs::set_permissions(&run, fs::Permissions::from_mode(0o755)).unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

        let package = SkillPackage::load(dir.path()).unwrap();
        let scripts = package.scripts.unwrap();
        let plain = scripts.iter().find(|s| s.file_name == "plain.sh").unwrap();
        let run = scripts.iter().find(|s| s.file_name == "run.sh").unwrap();
        assert!(!plain.executable);
        assert!(run.executable);
    }

    #[test]
    fn dotfile_in_assets_counts_as_content() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let assets = dir.path().join(ASSETS_DIR);
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join(".gitkeep"), "").unwrap();

        let package = SkillPackage::load(dir.path()).unwrap();
        assert_eq!(package.assets, Some(vec![".gitkeep".to_string()]));
    }

    #[test]
    fn dotfile_scripts_are_listed() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let scripts = dir.path().join(SCRIPTS_DIR);
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join(".hook.sh"), "echo hook\n").unwrap();

        let package = SkillPackage::load(dir.path()).unwrap();
        let scripts = package.scripts.unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].file_name, ".hook.sh");
        assert_eq!(scripts[0].first_line.as_deref(), Some("echo hook"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn unreadable_script_does_not_abort_load() {
        let dir = tempdir().unwrap();
        write_descriptor(dir.path());
        let scripts = dir.path().join(SCRIPTS_DIR);
        fs::create_dir_all(&scripts).unwrap();
        // Reading offset 0 of /proc/self/mem fails with EIO
        std::os::unix::fs::symlink("/proc/self/mem", scripts.join("run.sh")).unwrap();

        let package = SkillPackage::load(dir.path()).unwrap();
        let scripts = package.scripts.unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].file_name, "run.sh");
        assert_eq!(scripts[0].first_line, None);
    }

    #[test]
    fn package_name_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let skill = dir.path().join("my-skill");
        fs::create_dir_all(skill.join("sub")).unwrap();
        assert_eq!(package_name(&skill.join("sub").join("..")), "my-skill");
    }
}
