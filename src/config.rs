use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_PATH: &str = "conf/server.conf";
pub const DEFAULT_NEWS_API_URL: &str = "https://newsdata.io/api/1/news";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub news_api_url: String,
    pub news_api_key: Option<String>,
    pub news_timeout: u64,
    pub news_page_size: u8,
    pub store_dir: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            news_api_url: DEFAULT_NEWS_API_URL.to_string(),
            news_api_key: None,
            news_timeout: 10,
            news_page_size: 10,
            store_dir: None,
            log_level: LogLevel::Info,
        }
    }
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config_map = parse_config(&content)?;
        Ok(Self::from_map(&config_map))
    }

    fn from_map(config_map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let host = config_map.get("host")
            .cloned()
            .unwrap_or(defaults.host);

        let port = config_map.get("port")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let news_api_url = config_map.get("news_api_url")
            .cloned()
            .unwrap_or(defaults.news_api_url);

        let news_api_key = config_map.get("news_api_key")
            .filter(|k| !k.is_empty())
            .cloned();

        let news_timeout = config_map.get("news_timeout")
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(defaults.news_timeout);

        let news_page_size = config_map.get("news_page_size")
            .and_then(|s| s.parse::<u8>().ok())
            .unwrap_or(defaults.news_page_size);

        let store_dir = config_map.get("store_dir")
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);

        let log_level = config_map.get("log_level")
            .and_then(|l| LogLevel::parse(l))
            .unwrap_or(defaults.log_level);

        ServerConfig {
            host,
            port,
            news_api_url,
            news_api_key,
            news_timeout,
            news_page_size,
            store_dir,
            log_level,
        }
    }

    /// Environment variables take precedence over the config file
    pub fn apply_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("NEWS_API_KEY").filter(|k| !k.is_empty()) {
            self.news_api_key = Some(key);
        }
        if let Some(url) = lookup("NEWS_API_URL").filter(|u| !u.is_empty()) {
            self.news_api_url = url;
        }
        if let Some(dir) = lookup("GAMES_STORE_DIR").filter(|d| !d.is_empty()) {
            self.store_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn load_from_or_default<P: AsRef<Path>>(config_path: P) -> Self {
        let config_path = config_path.as_ref();
        let config = match Self::from_file(config_path) {
            Ok(config) => {
                println!("📄 Loaded configuration from {}", config_path.display());
                config
            }
            Err(e) => {
                println!("⚠️  Could not load config from {}: {}. Using defaults.", config_path.display(), e);
                Self::default()
            }
        };
        config.apply_env_overrides()
    }

    /// `host:port` as handed to the listener; `host` may be an address or a hostname
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse key = value pairs
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            config.insert(key, value);
        }
    }

    Ok(config)
}
