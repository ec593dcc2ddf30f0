use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

impl StorageConfig {
    pub fn routers_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join("routers")
    }

    pub fn services_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join("services")
    }

    pub fn middlewares_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join("middlewares")
    }
}

fn default_request_timeout() -> u64 { 10 }
fn default_data_dir() -> String { "data".to_string() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
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
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        if self.storage.data_dir.trim().is_empty() {
            self.storage.data_dir = default_data_dir();
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            _ => {}
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.request_timeout_secs, 10);
        assert_eq!(cfg.storage.routers_dir(), PathBuf::from("data/routers"));
        assert_eq!(cfg.storage.middlewares_dir(), PathBuf::from("data/middlewares"));
    }

    #[test]
    fn normalize_fills_missing_values() {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = ""
            port = 9000
            worker_threads = 0
            request_timeout_secs = 0

            [storage]
            data_dir = "  "
            "#,
        )
        .expect("parse");
        cfg.normalize_and_validate().expect("normalize");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.server.request_timeout_secs, 10);
        assert_eq!(cfg.storage.data_dir, "data");
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg: AppConfig =
            toml::from_str("[server]\nhost = \"0.0.0.0\"\nport = 0\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }
}
