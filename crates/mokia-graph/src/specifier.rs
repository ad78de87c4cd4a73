//! Specifier resolution.
//!
//! Turns the strings found in `imports` and `file` entries into absolute
//! paths, trying module extensions and index files the same way for every
//! specifier kind.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::error::{GraphError, Result};
use crate::module::ModuleFormat;

/// Directory searched for library (bare) specifiers.
pub const DEFAULT_LIBRARY_DIR: &str = "mock_modules";

/// How a specifier is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `./x` or `../x`, relative to the importing file
    Relative,
    /// `/x`
    Absolute,
    /// `name/x`, looked up in the library directory of the importer or any ancestor
    Library,
}

impl SpecifierKind {
    pub fn of(specifier: &str) -> Self {
        let relative = specifier == "."
            || specifier == ".."
            || ["./", "../", ".\\", "..\\"]
                .iter()
                .any(|prefix| specifier.starts_with(prefix));

        if relative {
            SpecifierKind::Relative
        } else if Path::new(specifier).is_absolute() || specifier.starts_with('/') {
            SpecifierKind::Absolute
        } else {
            SpecifierKind::Library
        }
    }
}

/// Resolves specifiers to files on disk.
#[derive(Debug, Clone)]
pub struct SpecifierResolver {
    library_dir: String,
}

impl Default for SpecifierResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_DIR)
    }
}

impl SpecifierResolver {
    pub fn new(library_dir: impl Into<String>) -> Self {
        Self {
            library_dir: library_dir.into(),
        }
    }

    /// Resolve `specifier` as written in the file `from`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::ResolutionFailed` when no candidate file exists.
    pub fn resolve(&self, specifier: &str, from: &Path) -> Result<PathBuf> {
        let base = from.parent().unwrap_or_else(|| Path::new(""));

        let resolved = match SpecifierKind::of(specifier) {
            SpecifierKind::Relative => try_candidates(&base.join(specifier).clean()),
            SpecifierKind::Absolute => try_candidates(&PathBuf::from(specifier).clean()),
            SpecifierKind::Library => base.ancestors().find_map(|dir| {
                try_candidates(&dir.join(&self.library_dir).join(specifier).clean())
            }),
        };

        resolved.ok_or_else(|| GraphError::ResolutionFailed {
            specifier: specifier.to_string(),
            from: from.to_path_buf(),
        })
    }

    /// The file a relative or absolute `specifier` would most likely name
    /// once it exists: the path itself when it has an extension, otherwise
    /// the path with the first module extension appended.
    ///
    /// Library specifiers have no single location and yield `None`.
    pub fn expected_path(&self, specifier: &str, from: &Path) -> Option<PathBuf> {
        let base = from.parent().unwrap_or_else(|| Path::new(""));

        let path = match SpecifierKind::of(specifier) {
            SpecifierKind::Relative => base.join(specifier).clean(),
            SpecifierKind::Absolute => PathBuf::from(specifier).clean(),
            SpecifierKind::Library => return None,
        };

        if path.extension().is_some() {
            Some(path)
        } else {
            let mut with_ext = path.into_os_string();
            with_ext.push(".");
            with_ext.push(ModuleFormat::EXTENSIONS[0]);
            Some(PathBuf::from(with_ext))
        }
    }
}

/// Try `candidate`, then with each module extension appended, then as a
/// directory containing an index module.
fn try_candidates(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }

    for ext in ModuleFormat::EXTENSIONS {
        let mut with_ext = candidate.as_os_str().to_owned();
        with_ext.push(".");
        with_ext.push(ext);
        let with_ext = PathBuf::from(with_ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }

    if candidate.is_dir() {
        for ext in ModuleFormat::EXTENSIONS {
            let index = candidate.join(format!("index.{ext}"));
            if index.is_file() {
                return Some(index);
            }
        }
    }

    None
}

/// Make `path` absolute against the current directory and normalize it.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.clean();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path).clean(),
        Err(_) => path.clean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_specifier_kind() {
        assert_eq!(SpecifierKind::of("./user"), SpecifierKind::Relative);
        assert_eq!(SpecifierKind::of("../shared/user"), SpecifierKind::Relative);
        assert_eq!(SpecifierKind::of("/etc/mock.toml"), SpecifierKind::Absolute);
        assert_eq!(SpecifierKind::of("presets/auth"), SpecifierKind::Library);
    }

    #[test]
    fn test_resolve_exact_file() {
        let temp = TempDir::new().unwrap();
        let entry = touch(temp.path(), "index.toml");
        let data = touch(temp.path(), "fixtures/users.txt");

        let resolved = SpecifierResolver::default()
            .resolve("./fixtures/users.txt", &entry)
            .unwrap();
        assert_eq!(resolved, data);
    }

    #[test]
    fn test_resolve_tries_extensions_in_order() {
        let temp = TempDir::new().unwrap();
        let entry = touch(temp.path(), "index.toml");
        let toml = touch(temp.path(), "user.toml");
        touch(temp.path(), "user.json");

        let resolved = SpecifierResolver::default().resolve("./user", &entry).unwrap();
        assert_eq!(resolved, toml);
    }

    #[test]
    fn test_resolve_directory_index() {
        let temp = TempDir::new().unwrap();
        let entry = touch(temp.path(), "index.toml");
        let index = touch(temp.path(), "user/index.json");

        let resolved = SpecifierResolver::default().resolve("./user", &entry).unwrap();
        assert_eq!(resolved, index);
    }

    #[test]
    fn test_resolve_parent_directory() {
        let temp = TempDir::new().unwrap();
        let nested = touch(temp.path(), "api/v1/index.toml");
        let shared = touch(temp.path(), "shared.toml");

        let resolved = SpecifierResolver::default()
            .resolve("../../shared", &nested)
            .unwrap();
        assert_eq!(resolved, shared);
    }

    #[test]
    fn test_resolve_library_from_ancestor() {
        let temp = TempDir::new().unwrap();
        let nested = touch(temp.path(), "api/index.toml");
        let lib = touch(temp.path(), "mock_modules/presets/auth.toml");

        let resolved = SpecifierResolver::default()
            .resolve("presets/auth", &nested)
            .unwrap();
        assert_eq!(resolved, lib);
    }

    #[test]
    fn test_resolve_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let entry = touch(temp.path(), "index.toml");

        let err = SpecifierResolver::default()
            .resolve("./nope", &entry)
            .unwrap_err();
        assert!(matches!(err, GraphError::ResolutionFailed { .. }));
    }

    #[test]
    fn test_expected_path_for_missing_specifiers() {
        let temp = TempDir::new().unwrap();
        let entry = touch(temp.path(), "index.toml");
        let resolver = SpecifierResolver::default();

        assert_eq!(
            resolver.expected_path("./users", &entry),
            Some(temp.path().join("users.toml"))
        );
        assert_eq!(
            resolver.expected_path("./fixtures/users.json", &entry),
            Some(temp.path().join("fixtures/users.json"))
        );
        assert_eq!(resolver.expected_path("presets/auth", &entry), None);
    }

    #[test]
    fn test_absolutize_cleans_dots() {
        let path = absolutize(Path::new("/project/./api/../index.toml"));
        assert_eq!(path, PathBuf::from("/project/index.toml"));
    }
}
