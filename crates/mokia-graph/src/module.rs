//! Configuration module format.
//!
//! A module is a `.toml` or `.json` document:
//!
//! ```toml
//! imports = ["./users", "shared/auth"]
//! port = 3000
//! prefix = "/api"
//! priority = ["GET /users/me"]
//!
//! [routes."GET /users/:id"]
//! file = "./fixtures/user.json"
//! delay = 150
//!
//! [routes]
//! "GET /ping" = "pong"
//! ```
//!
//! Parsing happens in two stages: the source is first read into an untyped
//! [`serde_json::Value`] (shared by the static dependency scan, which must
//! tolerate modules that do not type-check), then deserialized into the raw
//! module shape used by the loader.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{GraphError, Result};

/// HTTP methods accepted in route keys.
pub const METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// On-disk format of a module, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    Toml,
    Json,
}

impl ModuleFormat {
    /// Extensions tried, in order, when a specifier omits one.
    pub const EXTENSIONS: [&'static str; 2] = ["toml", "json"];

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Parse module source into an untyped value.
    pub fn parse_value(self, source: &str, path: &Path) -> Result<Value> {
        let parse_err = |message: String| GraphError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match self {
            Self::Toml => {
                let table: toml::Table = toml::from_str(source).map_err(|e| parse_err(e.to_string()))?;
                serde_json::to_value(table).map_err(|e| parse_err(e.to_string()))
            }
            Self::Json => serde_json::from_str(source).map_err(|e| parse_err(e.to_string())),
        }
    }
}

/// Specifiers a module refers to, found without evaluating it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    /// Other modules listed under `imports`
    pub imports: Vec<String>,
    /// Data files referenced by a route's `file`
    pub files: Vec<String>,
}

/// Extract import and data-file specifiers from an untyped module value.
///
/// Entries with an unexpected shape are skipped rather than reported.
pub fn static_references(value: &Value) -> References {
    let mut refs = References::default();

    if let Some(imports) = value.get("imports").and_then(Value::as_array) {
        refs.imports = imports
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }

    if let Some(routes) = value.get("routes").and_then(Value::as_object) {
        refs.files = routes
            .values()
            .filter_map(|route| route.get("file"))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }

    refs
}

/// Server settings declared by a module. `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
}

impl ModuleSettings {
    /// Apply every field set in `other` on top of `self`.
    pub fn overlay(&mut self, other: &ModuleSettings) {
        if other.host.is_some() {
            self.host.clone_from(&other.host);
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.prefix.is_some() {
            self.prefix.clone_from(&other.prefix);
        }
        if other.priority.is_some() {
            self.priority.clone_from(&other.priority);
        }
        if other.silent.is_some() {
            self.silent = other.silent;
        }
    }
}

/// Parsed route key: `"GET /users/:id"` or `"/health"` (any method).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    /// Upper-case method, `None` matches every method
    pub method: Option<String>,
    pub path: String,
}

impl RouteKey {
    pub fn parse(key: &str) -> std::result::Result<Self, String> {
        let key = key.trim();
        let (method, path) = match key.split_once(char::is_whitespace) {
            Some((method, path)) => (Some(method.to_ascii_uppercase()), path.trim()),
            None => (None, key),
        };

        if let Some(method) = &method {
            if !METHODS.contains(&method.as_str()) {
                return Err(format!(
                    "unknown method '{method}', expected one of {}",
                    METHODS.join(", ")
                ));
            }
        }

        if !path.starts_with('/') {
            return Err(format!("path '{path}' must start with '/'"));
        }

        Ok(Self {
            method,
            path: path.to_string(),
        })
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{method} {}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Body returned by a mock route.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Text(String),
    Json(Value),
}

/// A fully evaluated route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDef {
    pub key: RouteKey,
    pub status: u16,
    pub headers: IndexMap<String, String>,
    pub body: ResponseBody,
    pub delay: Option<Duration>,
}

impl RouteDef {
    pub fn text(key: RouteKey, body: impl Into<String>) -> Self {
        Self {
            key,
            status: 200,
            headers: IndexMap::new(),
            body: ResponseBody::Text(body.into()),
            delay: None,
        }
    }
}

/// An evaluated configuration module with its imports merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigModule {
    /// Absolute path of the module
    pub path: PathBuf,
    pub settings: ModuleSettings,
    /// Routes keyed by their normalized key (`RouteKey` display form)
    pub routes: IndexMap<String, RouteDef>,
}

/// Typed module shape as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawModule {
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_port")]
    pub port: Option<u16>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default, deserialize_with = "deserialize_priority")]
    pub priority: Option<Vec<String>>,
    #[serde(default)]
    pub silent: Option<bool>,
    #[serde(default)]
    pub routes: IndexMap<String, RawRoute>,
}

impl RawModule {
    pub fn settings(&self) -> ModuleSettings {
        ModuleSettings {
            host: self.host.clone(),
            port: self.port,
            prefix: self.prefix.clone(),
            priority: self.priority.clone(),
            silent: self.silent,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawRoute {
    Text(String),
    Detailed(RawResponse),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawResponse {
    pub status: Option<u16>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    pub json: Option<Value>,
    pub body: Option<String>,
    pub file: Option<String>,
    /// Milliseconds
    pub delay: Option<u64>,
}

fn deserialize_port<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<u16>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match Option::<PortValue>::deserialize(de)? {
        None => Ok(None),
        Some(PortValue::Number(port)) => Ok(Some(port)),
        Some(PortValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid port '{text}'"))),
    }
}

fn deserialize_priority<'de, D: Deserializer<'de>>(
    de: D,
) -> std::result::Result<Option<Vec<String>>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriorityValue {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<PriorityValue>::deserialize(de)? {
        None => None,
        Some(PriorityValue::List(list)) => Some(list),
        Some(PriorityValue::Text(text)) => Some(split_list(&text)),
    })
}

/// Split a comma separated list, dropping blank entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Paths read while evaluating a module, used for cache freshness checks.
pub(crate) type Sources = Vec<(PathBuf, u64)>;
