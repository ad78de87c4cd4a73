//! Shared fixtures for mokia-cli integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mokia_cli::config::ServerConfig;
use mokia_cli::dev::ChangeWatcher;
use mokia_cli::server::{ServerEngine, ServerHandle, Teardown};
use mokia_cli::ServerError;
use mokia_graph::DependencySet;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Ordered record of engine and watcher calls, shared between test doubles.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Entry importing `./a` and `./b`, each contributing one route.
pub fn create_entry_with_two_modules(temp: &TempDir) -> PathBuf {
    let root = temp.path();
    write_file(
        root,
        "a.toml",
        r#"
[routes]
"GET /a" = "from a"
"#,
    );
    write_file(
        root,
        "b.toml",
        r#"
[routes."GET /b"]
json = { source = "b" }
"#,
    );
    write_file(
        root,
        "index.toml",
        r#"
imports = ["./a", "./b"]
port = 3000
"#,
    )
}

/// Engine that records calls instead of binding sockets.
///
/// Teardown sleeps briefly before logging so that a create issued before the
/// teardown finished would show up out of order.
#[derive(Clone)]
pub struct RecordingEngine {
    pub log: Log,
    pub configs: Arc<Mutex<Vec<ServerConfig>>>,
    next_port: Arc<Mutex<u16>>,
}

impl RecordingEngine {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            configs: Arc::new(Mutex::new(Vec::new())),
            next_port: Arc::new(Mutex::new(40_000)),
        }
    }

    pub fn last_config(&self) -> Option<ServerConfig> {
        self.configs.lock().last().cloned()
    }
}

#[async_trait]
impl ServerEngine for RecordingEngine {
    async fn create(&self, config: ServerConfig) -> Result<ServerHandle, ServerError> {
        let port = {
            let mut next = self.next_port.lock();
            *next += 1;
            *next
        };
        self.log.lock().push(format!("create:{port}"));
        self.configs.lock().push(config);
        Ok(ServerHandle::new(
            port,
            RecordingTeardown {
                port,
                log: self.log.clone(),
                done: false,
            },
        ))
    }
}

struct RecordingTeardown {
    port: u16,
    log: Log,
    done: bool,
}

#[async_trait]
impl Teardown for RecordingTeardown {
    async fn destroy(&mut self) -> Result<(), ServerError> {
        if self.done {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.done = true;
        self.log.lock().push(format!("destroy:{}", self.port));
        Ok(())
    }
}

/// Watcher that keeps the registration in memory.
pub struct RecordingWatcher {
    pub log: Log,
    registered: DependencySet,
}

impl RecordingWatcher {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            registered: DependencySet::new(),
        }
    }
}

impl ChangeWatcher for RecordingWatcher {
    fn add(&mut self, paths: &DependencySet) {
        self.registered.extend(paths.iter().cloned());
        self.log.lock().push(format!("add:{}", paths.len()));
    }

    fn clear(&mut self) {
        self.registered.clear();
        self.log.lock().push("clear".to_string());
    }

    fn watched(&self) -> DependencySet {
        self.registered.clone()
    }
}

/// Minimal HTTP/1.1 request; returns the status code and body.
pub async fn http_request(port: u16, method: &str, path: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: 0\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8_lossy(&raw).into_owned();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap_or(0);
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

pub async fn http_get(port: u16, path: &str) -> (u16, String) {
    http_request(port, "GET", path).await
}
