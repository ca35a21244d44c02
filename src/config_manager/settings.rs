use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config_manager::utils::{load_text_file_with_guess_encoding, save_json};

pub const NAMESPACE: &str = "spanish-valencian-translator";
pub const MARK_UNKNOWN_KEY: &str = "spanish-valencian-translator.markUnknown";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Setting {key} expects a {expected} value")]
    WrongType { key: String, expected: &'static str },

    #[error("Failed to persist settings: {0}")]
    Persist(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Boolean,
}

/// Schema entry for a user-facing option
#[derive(Debug, Clone, Serialize)]
pub struct SettingSchema {
    pub key: String,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    pub default: Value,
}

impl SettingSchema {
    fn accepts(&self, value: &Value) -> bool {
        match self.setting_type {
            SettingType::Boolean => value.is_boolean(),
        }
    }
}

/// Persistent settings keyed by namespaced name
pub struct SettingsStore {
    path: Option<PathBuf>,
    schema: Vec<SettingSchema>,
    values: DashMap<String, Value>,
    // Serializes write-then-insert so the file and the map agree
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// In-memory store with the given `markUnknown` default
    pub fn new(mark_unknown_default: bool) -> Self {
        Self {
            path: None,
            schema: vec![SettingSchema {
                key: MARK_UNKNOWN_KEY.to_string(),
                title: "Mark unknown words",
                description: "If active will mark with a star(*) the words that could not be translated",
                setting_type: SettingType::Boolean,
                default: Value::Bool(mark_unknown_default),
            }],
            values: DashMap::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load stored values from `path`. A missing file yields an empty store
    /// that will be written on the first `set`.
    pub fn load(path: &Path, mark_unknown_default: bool) -> anyhow::Result<Self> {
        let mut store = Self::new(mark_unknown_default);
        store.path = Some(path.to_path_buf());

        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Ok(store);
        }

        let content = load_text_file_with_guess_encoding(&path.to_string_lossy())?;
        let stored: BTreeMap<String, Value> = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)?
        };

        for (key, value) in stored {
            match store.schema_for(&key) {
                Some(schema) if schema.accepts(&value) => {
                    store.values.insert(key, value);
                }
                Some(_) => warn!("Ignoring stored setting {} with wrong type", key),
                None => warn!("Ignoring unknown stored setting {}", key),
            }
        }

        debug!("Loaded {} settings from {:?}", store.values.len(), path);
        Ok(store)
    }

    pub fn schema(&self) -> &[SettingSchema] {
        &self.schema
    }

    fn schema_for(&self, key: &str) -> Option<&SettingSchema> {
        self.schema.iter().find(|s| s.key == key)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .get(key)
            .map(|v| v.value().clone())
            .or_else(|| self.schema_for(key).map(|s| s.default.clone()))
    }

    /// Stored value, then schema default, then `false`
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn mark_unknown(&self) -> bool {
        self.get_bool(MARK_UNKNOWN_KEY)
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let schema = self
            .schema_for(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        if !schema.accepts(&value) {
            return Err(SettingsError::WrongType {
                key: key.to_string(),
                expected: "boolean",
            });
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        // The map only changes once the file holds the new value
        let mut stored: serde_json::Map<String, Value> = self
            .values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        stored.insert(key.to_string(), value.clone());
        self.persist(stored)?;

        info!("Setting {} = {}", key, value);
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Current value of every known setting
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.schema
            .iter()
            .filter_map(|s| self.get(&s.key).map(|v| (s.key.clone(), v)))
            .collect()
    }

    fn persist(&self, stored: serde_json::Map<String, Value>) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        save_json(&Value::Object(stored), path).map_err(|e| SettingsError::Persist(e.to_string()))
    }
}
