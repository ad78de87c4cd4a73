//! Shared utilities for command implementations.

use crate::error::{CliError, Result};
use mokia_graph::ModuleFormat;
use std::path::{Path, PathBuf};

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().map_err(CliError::Io)
}

/// Turn the `ENTRY` argument into the path of a configuration module.
///
/// A directory stands for its `index.toml` (or `index.json`). The file itself
/// does not have to exist yet; in watch mode the server starts once it does.
///
/// # Errors
///
/// Returns an error if a directory has no index module or the extension is
/// not a module format.
pub fn resolve_entry(entry: &Path, cwd: &Path) -> Result<PathBuf> {
    let path = mokia_graph::absolutize(&resolve_path(entry, cwd));

    if path.is_dir() {
        return ModuleFormat::EXTENSIONS
            .iter()
            .map(|ext| path.join(format!("index.{ext}")))
            .find(|index| index.is_file())
            .ok_or_else(|| CliError::FileNotFound(path.join("index.toml")));
    }

    if ModuleFormat::from_path(&path).is_none() {
        return Err(CliError::InvalidArgument(format!(
            "Entry must be a .toml or .json module: {}",
            path.display()
        )));
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_path() {
        let cwd = Path::new("/project");
        assert_eq!(resolve_path(Path::new("mock/index.toml"), cwd), PathBuf::from("/project/mock/index.toml"));
        assert_eq!(resolve_path(Path::new("/abs/index.toml"), cwd), PathBuf::from("/abs/index.toml"));
    }

    #[test]
    fn test_resolve_entry_directory_uses_index() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("mock")).unwrap();
        std::fs::write(temp.path().join("mock/index.json"), "{}").unwrap();

        let entry = resolve_entry(Path::new("mock"), temp.path()).unwrap();
        assert_eq!(entry, temp.path().join("mock/index.json"));
    }

    #[test]
    fn test_resolve_entry_directory_without_index() {
        let temp = TempDir::new().unwrap();
        let err = resolve_entry(Path::new("."), temp.path()).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_resolve_entry_missing_file_is_allowed() {
        let temp = TempDir::new().unwrap();
        let entry = resolve_entry(Path::new("./later.toml"), temp.path()).unwrap();
        assert_eq!(entry, temp.path().join("later.toml"));
    }

    #[test]
    fn test_resolve_entry_rejects_other_formats() {
        let temp = TempDir::new().unwrap();
        let err = resolve_entry(Path::new("mock.yaml"), temp.path()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
