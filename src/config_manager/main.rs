use serde::{Deserialize, Serialize};
use crate::config_manager::system::SystemConfig;
use crate::config_manager::translator::TranslatorConfig;

/// Main configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "@context")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    #[serde(rename = "system_config")]
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(rename = "translator_config")]
    #[serde(default)]
    pub translator_config: TranslatorConfig,
}

impl Config {
    /// Load configuration from a YAML, JSON or JSON-LD file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        use crate::config_manager::utils::{read_config_value, validate_config};
        let value = read_config_value(path)?;
        validate_config(&value)
    }
}
