use std::{path::Path, str::FromStr};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Directory holding `index.html`, `admin.html` and the `/static` assets.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            static_dir: default_static_dir(),
        }
    }
}

/// Which record store backs the coffee catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Airtable,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "local" => Ok(Self::Sqlite),
            "airtable" | "hosted" => Ok(Self::Airtable),
            other => Err(anyhow!("unknown store backend `{other}` (expected sqlite or airtable)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub sqlite: SqliteConfig,
    #[serde(default)]
    pub airtable: AirtableConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    #[serde(default = "default_sqlite_path")]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self { path: default_sqlite_path(), max_connections: default_max_connections() }
    }
}

impl SqliteConfig {
    /// Connection URL understood by SeaORM; `mode=rwc` creates the file when missing.
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirtableConfig {
    #[serde(default = "default_airtable_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default)]
    pub table_id: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_url: default_airtable_api_url(),
            api_token: String::new(),
            base_id: String::new(),
            table_id: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_static_dir() -> String { "frontend".into() }
fn default_sqlite_path() -> String { "coffees.db".into() }
fn default_max_connections() -> u32 { 5 }
fn default_airtable_api_url() -> String { "https://api.airtable.com/v0".into() }
fn default_timeout() -> u64 { 30 }

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_with(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides through `lookup`, then fix up empty values.
    pub fn normalize_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.server.normalize_with(&lookup)?;
        self.store.normalize_with(&lookup)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.store.validate()
    }
}

impl ServerConfig {
    fn normalize_with<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port.parse().map_err(|e| anyhow!("SERVER_PORT `{port}` is not a port: {e}"))?;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.static_dir = dir;
        }
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StoreConfig {
    fn normalize_with<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("STORE_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.sqlite.path = path;
        }
        if self.sqlite.path.trim().is_empty() {
            self.sqlite.path = default_sqlite_path();
        }
        if self.sqlite.max_connections == 0 {
            self.sqlite.max_connections = default_max_connections();
        }

        let airtable = &mut self.airtable;
        if let Some(url) = lookup("AIRTABLE_API_URL") {
            airtable.api_url = url;
        }
        if let Some(token) = lookup("AIRTABLE_API_TOKEN") {
            airtable.api_token = token;
        }
        if let Some(base) = lookup("AIRTABLE_BASE_ID") {
            airtable.base_id = base;
        }
        if let Some(table) = lookup("AIRTABLE_TABLE_ID") {
            airtable.table_id = table;
        }
        airtable.api_url = airtable.api_url.trim_end_matches('/').to_string();
        if airtable.timeout_secs == 0 {
            airtable.timeout_secs = default_timeout();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend != StoreBackend::Airtable {
            return Ok(());
        }
        let a = &self.airtable;
        let missing: Vec<&str> = [
            ("AIRTABLE_API_TOKEN", &a.api_token),
            ("AIRTABLE_BASE_ID", &a.base_id),
            ("AIRTABLE_TABLE_ID", &a.table_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();
        if !missing.is_empty() {
            return Err(anyhow!("airtable backend selected but {} not set", missing.join(", ")));
        }
        let lower = a.api_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("store.airtable.api_url must start with http:// or https://"));
        }
        Ok(())
    }
}
