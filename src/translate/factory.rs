use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::info;

use crate::config_manager::translator::TranslatorConfig;
use super::client::ApertiumClient;
use super::interface::Translator;

/// Factory for creating translator clients
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator based on configuration
    ///
    /// # Arguments
    /// * `translator_config` - Translator section of the loaded configuration
    ///
    /// # Returns
    /// Shared Translator implementation
    pub fn create_translator(translator_config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
        info!("Initializing translator: endpoint={}", translator_config.endpoint);

        let timeout = translator_config.request_timeout_secs.map(Duration::from_secs);
        let client = ApertiumClient::new(translator_config.endpoint.clone(), timeout)?;

        Ok(Arc::new(client))
    }
}
