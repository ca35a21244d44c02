use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// System configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// File the settings store persists to
    #[serde(rename = "settings_path")]
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    12394
}

fn default_settings_path() -> String {
    "settings.json".to_string()
}

impl SystemConfig {
    pub fn settings_path(&self) -> PathBuf {
        PathBuf::from(&self.settings_path)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let host = if self.host == "localhost" { "127.0.0.1" } else { self.host.as_str() };
        let addr = format!("{}:{}", host, self.port).parse()?;
        Ok(addr)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            settings_path: default_settings_path(),
        }
    }
}
