//! Module loader with explicit, generation-based invalidation.
//!
//! Every path known to the cache has a generation counter. An evaluated
//! module records the generation of each file it was built from (itself, its
//! transitive imports and the data files its routes captured). The cached
//! value is reused only while all of those generations are unchanged, so
//! bumping a single file's generation makes every module that observed it
//! stale, no matter how indirectly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{GraphError, Result};
use crate::module::{
    ConfigModule, ModuleFormat, ModuleSettings, RawModule, RawResponse, RawRoute, ResponseBody,
    RouteDef, RouteKey, Sources,
};
use crate::specifier::{absolutize, SpecifierResolver};

#[derive(Debug)]
struct CachedModule {
    module: Arc<ConfigModule>,
    sources: Sources,
}

/// Loads configuration modules and caches the evaluated result.
#[derive(Debug, Default)]
pub struct ModuleCache {
    specifiers: SpecifierResolver,
    generations: HashMap<PathBuf, u64>,
    entries: HashMap<PathBuf, CachedModule>,
    evaluations: u64,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the module at `path`, evaluating it (and any stale import) if the
    /// cached value is missing or out of date.
    ///
    /// # Errors
    ///
    /// Any read, parse, validation or resolution failure of the module or one
    /// of its imports. Nothing is cached for a module whose load failed.
    pub fn load(&mut self, path: &Path) -> Result<Arc<ConfigModule>> {
        let path = absolutize(path);
        let mut stack = Vec::new();
        self.load_inner(&path, &mut stack).map(|(module, _)| module)
    }

    /// Mark every path in `paths` as stale.
    ///
    /// The next [`load`](Self::load) of any module built from one of these
    /// files re-reads it from disk.
    pub fn invalidate<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = absolutize(path.as_ref());
            self.entries.remove(&path);
            let generation = self.generations.entry(path).or_insert(0);
            *generation += 1;
        }
    }

    /// Current generation of `path` (0 if never invalidated).
    pub fn generation(&self, path: &Path) -> u64 {
        self.generations.get(path).copied().unwrap_or(0)
    }

    /// Whether a fresh evaluated module is cached for `path`.
    pub fn is_cached(&self, path: &Path) -> bool {
        self.entries
            .get(&absolutize(path))
            .is_some_and(|cached| self.is_fresh(cached))
    }

    /// Number of module evaluations performed so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, cached: &CachedModule) -> bool {
        cached
            .sources
            .iter()
            .all(|(path, generation)| self.generation(path) == *generation)
    }

    fn load_inner(
        &mut self,
        path: &Path,
        stack: &mut Vec<PathBuf>,
    ) -> Result<(Arc<ConfigModule>, Sources)> {
        if let Some(cached) = self.entries.get(path) {
            if self.is_fresh(cached) {
                trace!(path = %path.display(), "module cache hit");
                return Ok((cached.module.clone(), cached.sources.clone()));
            }
        }

        if let Some(pos) = stack.iter().position(|p| p == path) {
            let mut chain: Vec<String> = stack[pos..]
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            chain.push(path.display().to_string());
            return Err(GraphError::CircularImport {
                cycle: chain.join(" -> "),
            });
        }

        stack.push(path.to_path_buf());
        let result = self.evaluate(path, stack);
        stack.pop();

        let (module, sources) = result?;
        let module = Arc::new(module);
        self.entries.insert(
            path.to_path_buf(),
            CachedModule {
                module: module.clone(),
                sources: sources.clone(),
            },
        );
        Ok((module, sources))
    }

    fn evaluate(&mut self, path: &Path, stack: &mut Vec<PathBuf>) -> Result<(ConfigModule, Sources)> {
        debug!(path = %path.display(), "evaluating module");
        self.evaluations += 1;

        let format =
            ModuleFormat::from_path(path).ok_or_else(|| GraphError::UnsupportedFormat(path.to_path_buf()))?;
        let mut sources = vec![(path.to_path_buf(), self.generation(path))];
        let source = read(path)?;
        let value = format.parse_value(&source, path)?;
        let raw: RawModule = serde_json::from_value(value).map_err(|e| GraphError::InvalidModule {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut settings = ModuleSettings::default();
        let mut routes = IndexMap::new();

        for specifier in &raw.imports {
            let import = self.specifiers.resolve(specifier, path)?;
            let (module, import_sources) = self.load_inner(&import, stack)?;
            settings.overlay(&module.settings);
            routes.extend(module.routes.iter().map(|(k, v)| (k.clone(), v.clone())));
            for source in import_sources {
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }

        settings.overlay(&raw.settings());

        for (key, route) in raw.routes {
            let route = self.evaluate_route(path, &key, route, &mut sources)?;
            routes.insert(route.key.to_string(), route);
        }

        Ok((
            ConfigModule {
                path: path.to_path_buf(),
                settings,
                routes,
            },
            sources,
        ))
    }

    fn evaluate_route(
        &self,
        path: &Path,
        key: &str,
        route: RawRoute,
        sources: &mut Sources,
    ) -> Result<RouteDef> {
        let invalid = |reason: String| GraphError::InvalidRoute {
            path: path.to_path_buf(),
            key: key.to_string(),
            reason,
        };

        let route_key = RouteKey::parse(key).map_err(&invalid)?;

        let response = match route {
            RawRoute::Text(text) => return Ok(RouteDef::text(route_key, text)),
            RawRoute::Detailed(response) => response,
        };

        let RawResponse {
            status,
            headers,
            json,
            body,
            file,
            delay,
        } = response;

        let status = status.unwrap_or(200);
        if !(100..=599).contains(&status) {
            return Err(invalid(format!("status {status} is out of range")));
        }

        let body = match (json, body, file) {
            (None, None, None) => ResponseBody::Empty,
            (Some(json), None, None) => ResponseBody::Json(json),
            (None, Some(text), None) => ResponseBody::Text(text),
            (None, None, Some(specifier)) => {
                let data = self.specifiers.resolve(&specifier, path)?;
                let content = read(&data)?;
                let generation = self.generation(&data);
                if !sources.iter().any(|(p, _)| p == &data) {
                    sources.push((data.clone(), generation));
                }

                if ModuleFormat::from_path(&data) == Some(ModuleFormat::Json) {
                    ResponseBody::Json(serde_json::from_str(&content).map_err(|e| GraphError::Parse {
                        path: data.clone(),
                        message: e.to_string(),
                    })?)
                } else {
                    ResponseBody::Text(content)
                }
            }
            _ => {
                return Err(invalid(
                    "only one of 'json', 'body' or 'file' may be set".to_string(),
                ))
            }
        };

        Ok(RouteDef {
            key: route_key,
            status,
            headers,
            body,
            delay: delay.map(Duration::from_millis),
        })
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| GraphError::Read {
        path: path.to_path_buf(),
        source,
    })
}
