//! # mokia-graph
//!
//! Configuration module graph for the mokia mock server.
//!
//! This crate knows how configuration modules are written, how they refer to
//! each other, and how they are evaluated. It has no knowledge of HTTP or of
//! file watching.
//!
//! ## Overview
//!
//! - [`DependencyResolver`] statically walks a module's `imports` (and the data
//!   files its routes read) and returns the set of local files it depends on.
//! - [`ModuleCache`] evaluates modules into [`ConfigModule`] values and caches
//!   them; [`ModuleCache::invalidate`] marks files stale so the next load
//!   re-reads them.
//! - [`SpecifierResolver`] maps import specifiers to files on disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mokia_graph::{DependencyResolver, ModuleCache};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entry = Path::new("mock/index.toml");
//!
//! let deps = DependencyResolver::default().resolve(entry);
//! println!("watching {} files", deps.len());
//!
//! let mut cache = ModuleCache::new();
//! let module = cache.load(entry)?;
//! println!("{} routes", module.routes.len());
//!
//! // After an edit, drop everything the module was built from.
//! cache.invalidate(&deps);
//! let module = cache.load(entry)?;
//! # let _ = module;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod module;
pub mod resolver;
pub mod specifier;

pub use cache::ModuleCache;
pub use error::{GraphError, Result};
pub use module::{
    split_list, ConfigModule, ModuleFormat, ModuleSettings, ResponseBody, RouteDef, RouteKey,
    METHODS,
};
pub use resolver::{resolve, DependencyResolver, DependencySet, DEFAULT_IGNORE};
pub use specifier::{absolutize, SpecifierKind, SpecifierResolver, DEFAULT_LIBRARY_DIR};
