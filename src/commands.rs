use futures::future::BoxFuture;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

use crate::config_manager::settings::NAMESPACE;
use crate::editor::{CommandReport, EditorError, EditorHost, Selection, Session, TextBuffer};
use crate::translate::LanguagePair;

pub type Handler = Box<
    dyn for<'a> Fn(&'a Session, &'a mut dyn EditorHost) -> BoxFuture<'a, CommandReport> + Send + Sync,
>;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// A registered command
pub struct Command {
    pub title: &'static str,
    pub pair: LanguagePair,
    handler: Handler,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub id: String,
    pub title: &'static str,
    pub source: String,
    pub target: String,
}

fn handler<F>(f: F) -> Handler
where
    F: for<'a> Fn(&'a Session, &'a mut dyn EditorHost) -> BoxFuture<'a, CommandReport>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn translate_handler(pair: LanguagePair) -> Handler {
    handler(move |session, host| {
        let pair = pair.clone();
        Box::pin(async move { session.translate_selections(host, &pair).await })
    })
}

/// Dispatch table from command id to handler
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// The two translation commands
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            "spanish-valencian",
            "Translate Spanish to Valencian",
            LanguagePair::new("spa", "cat_valencia"),
        );
        registry.register(
            "valencian-spanish",
            "Translate Valencian to Spanish",
            LanguagePair::new("cat", "spa"),
        );
        registry
    }

    /// Register `name` under the crate namespace, bound to `pair`
    pub fn register(&mut self, name: &str, title: &'static str, pair: LanguagePair) {
        let id = format!("{}:{}", NAMESPACE, name);
        info!("Registering command {} ({}|{})", id, pair.source, pair.target);
        self.commands.insert(
            id,
            Command {
                title,
                handler: translate_handler(pair.clone()),
                pair,
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.get(id)
    }

    pub fn list(&self) -> Vec<CommandInfo> {
        self.commands
            .iter()
            .map(|(id, command)| CommandInfo {
                id: id.clone(),
                title: command.title,
                source: command.pair.source.clone(),
                target: command.pair.target.clone(),
            })
            .collect()
    }

    pub async fn dispatch(
        &self,
        id: &str,
        session: &Session,
        host: &mut dyn EditorHost,
    ) -> Result<CommandReport, CommandError> {
        let command = self
            .commands
            .get(id)
            .ok_or_else(|| CommandError::Unknown(id.to_string()))?;
        Ok((command.handler)(session, host).await)
    }

    /// Run a command against a fresh buffer built from `text` and `selections`
    pub async fn run_on_buffer(
        &self,
        id: &str,
        session: &Session,
        text: String,
        selections: Vec<Selection>,
    ) -> Result<(TextBuffer, CommandReport), CommandError> {
        if self.get(id).is_none() {
            return Err(CommandError::Unknown(id.to_string()));
        }

        let mut buffer = TextBuffer::new(text, selections)?;
        let report = self.dispatch(id, session, &mut buffer).await?;
        Ok((buffer, report))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
