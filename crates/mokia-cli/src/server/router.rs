//! Two-tier route matching.
//!
//! Routes named in `priority` live in their own `matchit` router which is
//! consulted first; everything else goes into the second tier. Inside a tier,
//! a route registered for the request method beats an any-method route on the
//! same path.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use indexmap::IndexMap;
use mokia_graph::{ResponseBody, RouteDef};
use std::time::Duration;
use tracing::warn;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// A route converted to ready-to-send HTTP parts.
#[derive(Debug, Clone)]
pub struct PreparedRoute {
    /// Normalized route key, e.g. `GET /users/:id`
    pub key: String,
    pub method: Option<Method>,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub delay: Option<Duration>,
}

impl PreparedRoute {
    pub fn new(key: &str, route: &RouteDef) -> Result<Self, ServerError> {
        let invalid = |reason: String| ServerError::InvalidRoute {
            key: key.to_string(),
            reason,
        };

        let method = route
            .key
            .method
            .as_deref()
            .map(|m| Method::from_bytes(m.as_bytes()).map_err(|e| invalid(e.to_string())))
            .transpose()?;
        let status = StatusCode::from_u16(route.status).map_err(|e| invalid(e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &route.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.insert(name, value);
        }

        let (body, content_type) = match &route.body {
            ResponseBody::Empty => (Bytes::new(), None),
            ResponseBody::Text(text) => (
                Bytes::from(text.clone()),
                Some("text/plain; charset=utf-8"),
            ),
            ResponseBody::Json(value) => (
                Bytes::from(serde_json::to_vec(value).map_err(|e| invalid(e.to_string()))?),
                Some("application/json"),
            ),
        };
        if let Some(content_type) = content_type {
            if !headers.contains_key(header::CONTENT_TYPE) {
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
        }

        Ok(Self {
            key: key.to_string(),
            method,
            status,
            headers,
            body,
            delay: route.delay,
        })
    }
}

/// Route table for one server instance.
pub struct RouteTable {
    prefix: String,
    tiers: [matchit::Router<Vec<usize>>; 2],
    routes: Vec<PreparedRoute>,
}

impl RouteTable {
    /// Build the table for `config`.
    ///
    /// Routes whose path conflicts with an already registered pattern are
    /// skipped with a warning.
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let mut routes = Vec::with_capacity(config.routes.len());
        let mut groups: [IndexMap<String, Vec<usize>>; 2] = Default::default();

        for (key, def) in &config.routes {
            let tier = if config.is_priority(key) { 0 } else { 1 };
            groups[tier]
                .entry(to_matchit_path(&def.key.path))
                .or_default()
                .push(routes.len());
            routes.push(PreparedRoute::new(key, def)?);
        }

        let mut tiers = [matchit::Router::new(), matchit::Router::new()];
        for (tier, group) in tiers.iter_mut().zip(groups) {
            for (pattern, indices) in group {
                if let Err(err) = tier.insert(pattern.as_str(), indices) {
                    warn!(pattern = %pattern, error = %err, "skipping conflicting route");
                }
            }
        }

        Ok(Self {
            prefix: config.prefix.clone(),
            tiers,
            routes,
        })
    }

    /// Find the route answering `method path`, honouring the prefix.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&PreparedRoute> {
        let path = self.strip_prefix(path)?;

        self.tiers.iter().find_map(|tier| {
            let matched = tier.at(path).ok()?;
            let candidates = matched.value.iter().map(|&i| &self.routes[i]);

            let mut fallback = None;
            for route in candidates {
                match &route.method {
                    Some(m) if m == method => return Some(route),
                    None if fallback.is_none() => fallback = Some(route),
                    _ => {}
                }
            }
            fallback
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.prefix.is_empty() {
            return Some(path);
        }

        match path.strip_prefix(self.prefix.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

/// Convert `/users/:id/*` into matchit syntax, `/users/{p0}/{*rest}`.
///
/// Parameters are named by position, so routes of the same shape share one
/// pattern regardless of how the module spells their parameter names.
fn to_matchit_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut params = 0;

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if segment.len() > 1 && segment.starts_with(':') {
                params += 1;
                format!("{{p{}}}", params - 1)
            } else if i == last && segment.starts_with('*') {
                "{*rest}".to_string()
            } else {
                segment.replace('{', "{{").replace('}', "}}")
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
