//! Static dependency discovery.
//!
//! Walks the import graph of a configuration module breadth-first, without
//! evaluating anything, and collects every local file the module depends on.
//! Failures are local to a single edge: a module that cannot be read or parsed
//! stays in the set but is not descended, and the walk carries on. A relative
//! import whose target does not exist yet is recorded under the path it would
//! have once created.

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::module::{static_references, ModuleFormat, References};
use crate::specifier::{absolutize, SpecifierResolver};

/// Default ignore pattern: vendored library modules are never watched.
pub const DEFAULT_IGNORE: &str = "mock_modules";

/// Absolute paths of every local file reachable from an entry module.
pub type DependencySet = BTreeSet<PathBuf>;

/// Computes the [`DependencySet`] of an entry module.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    ignore: Option<Regex>,
    specifiers: SpecifierResolver,
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new(Regex::new(DEFAULT_IGNORE).ok())
    }
}

impl DependencyResolver {
    /// Create a resolver; paths matching `ignore` are excluded from results.
    pub fn new(ignore: Option<Regex>) -> Self {
        Self {
            ignore,
            specifiers: SpecifierResolver::default(),
        }
    }

    pub fn ignore(&self) -> Option<&Regex> {
        self.ignore.as_ref()
    }

    /// Check whether `path` is excluded by the ignore pattern.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|re| re.is_match(&path.to_string_lossy()))
    }

    /// Resolve the dependency set of `entry`, including `entry` itself.
    pub fn resolve(&self, entry: &Path) -> DependencySet {
        let entry = absolutize(entry);

        let mut visited = DependencySet::new();
        let mut queue = VecDeque::new();
        visited.insert(entry.clone());
        queue.push_back(entry);

        while let Some(current) = queue.pop_front() {
            let refs = match self.references(&current) {
                Ok(refs) => refs,
                Err(err) => {
                    debug!(path = %current.display(), error = %err, "skipping unreadable module");
                    continue;
                }
            };

            for specifier in &refs.imports {
                if let Some(path) = self.follow(specifier, &current) {
                    if visited.insert(path.clone()) && ModuleFormat::from_path(&path).is_some() {
                        queue.push_back(path);
                    }
                }
            }

            // Data files are leaves.
            for specifier in &refs.files {
                if let Some(path) = self.follow(specifier, &current) {
                    visited.insert(path);
                }
            }
        }

        visited
    }

    /// Path a specifier refers to. An unresolved relative or absolute
    /// specifier yields the file it would name, so creating it is observed.
    fn follow(&self, specifier: &str, from: &Path) -> Option<PathBuf> {
        let path = match self.specifiers.resolve(specifier, from) {
            Ok(path) => path,
            Err(err) => {
                debug!(error = %err, "unresolved dependency");
                self.specifiers.expected_path(specifier, from)?
            }
        };

        if self.is_ignored(&path) {
            debug!(specifier, path = %path.display(), "ignored dependency");
            return None;
        }
        Some(path)
    }

    fn references(&self, path: &Path) -> Result<References> {
        let Some(format) = ModuleFormat::from_path(path) else {
            return Ok(References::default());
        };

        let source = std::fs::read_to_string(path).map_err(|source| GraphError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(static_references(&format.parse_value(&source, path)?))
    }
}

/// Resolve the dependency set of `entry`, excluding paths matching `ignore`.
pub fn resolve(entry: &Path, ignore: &Regex) -> DependencySet {
    DependencyResolver::new(Some(ignore.clone())).resolve(entry)
}
