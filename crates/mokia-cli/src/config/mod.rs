//! Server configuration, merged from several sources.
//!
//! Priority: CLI overrides > `MOKIA_*` environment > module settings > defaults

mod defaults;
mod loading;

use indexmap::IndexMap;
use mokia_graph::{ConfigModule, RouteDef, RouteKey};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, Result};

pub use defaults::*;

/// Scalar server settings after merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port; `0` asks the OS for a free one
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub prefix: String,

    /// Route keys matched before every other route
    #[serde(default)]
    pub priority: Vec<String>,

    /// Suppress request log lines
    #[serde(default)]
    pub silent: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            prefix: String::new(),
            priority: Vec::new(),
            silent: false,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
}

/// Everything the server engine needs to serve one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Normalized: empty, or starts with `/` and has no trailing `/`
    pub prefix: String,
    /// Normalized route keys, each present in `routes`
    pub priority: Vec<String>,
    pub silent: bool,
    pub routes: IndexMap<String, RouteDef>,
}

impl ServerConfig {
    /// Build the server configuration for an evaluated module.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a merged value has the wrong type
    /// or the prefix is malformed.
    pub fn from_module(module: &ConfigModule, overrides: &Overrides) -> Result<Self> {
        let settings = ServerSettings::load(&module.settings, overrides)?;

        Ok(Self {
            prefix: normalize_prefix(&settings.prefix)?,
            priority: validate_priority(&settings.priority, &module.routes),
            host: settings.host,
            port: settings.port,
            silent: settings.silent,
            routes: module.routes.clone(),
        })
    }

    /// `host:port` as passed to the listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_priority(&self, key: &str) -> bool {
        self.priority.iter().any(|p| p == key)
    }
}

/// Normalize a route prefix to `""` or `/segment[/segment...]`.
pub fn normalize_prefix(prefix: &str) -> Result<String> {
    let trimmed = prefix.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: "prefix".to_string(),
            value: prefix.to_string(),
            hint: "Prefixes cannot contain whitespace".to_string(),
        }
        .into());
    }

    let trimmed = trimmed.trim_matches('/');
    if trimmed.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("/{trimmed}"))
    }
}

/// Keep the priority entries that name a known route, in order, once each.
fn validate_priority(priority: &[String], routes: &IndexMap<String, RouteDef>) -> Vec<String> {
    let mut valid: Vec<String> = Vec::new();

    for entry in priority {
        let key = match RouteKey::parse(entry) {
            Ok(key) => key.to_string(),
            Err(reason) => {
                warn!(entry = %entry, %reason, "ignoring malformed priority route");
                continue;
            }
        };

        if !routes.contains_key(&key) {
            warn!(route = %key, "ignoring priority route that is not defined");
            continue;
        }

        if !valid.contains(&key) {
            valid.push(key);
        }
    }

    valid
}
