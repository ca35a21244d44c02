use std::sync::Arc;

use crate::commands::CommandRegistry;
use crate::config_manager::{Config, SettingsStore};
use crate::editor::Session;
use crate::translate::{Translator, TranslatorFactory};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub settings: Arc<SettingsStore>,
    pub commands: Arc<CommandRegistry>,
    pub session: Session,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let translator = TranslatorFactory::create_translator(&config.translator_config)?;
        let settings = Arc::new(SettingsStore::load(
            &config.system_config.settings_path(),
            config.translator_config.mark_unknown,
        )?);
        Ok(Self::with_parts(config, translator, settings))
    }

    pub fn with_parts(
        config: Config,
        translator: Arc<dyn Translator>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        let session = Session::new(
            translator,
            settings.clone(),
            config.translator_config.selection_mode,
        );

        Self {
            config,
            settings,
            commands: Arc::new(CommandRegistry::with_defaults()),
            session,
        }
    }
}
