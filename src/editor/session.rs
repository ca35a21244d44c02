use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config_manager::{SelectionMode, SettingsStore};
use crate::translate::{LanguagePair, TranslateError, TranslationRequest, Translator};
use super::interface::{Edit, EditorHost, Notification, Selection};

/// What a command did to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    pub applied: usize,
    pub notification: Option<Notification>,
}

impl CommandReport {
    fn applied(count: usize) -> Self {
        Self {
            applied: count,
            notification: None,
        }
    }

    fn failed(notification: Notification) -> Self {
        Self {
            applied: 0,
            notification: Some(notification),
        }
    }
}

/// Explicit state for one host integration: the translator, the settings it
/// reads from and how selections are handled.
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    translator: Arc<dyn Translator>,
    settings: Arc<SettingsStore>,
    selection_mode: SelectionMode,
}

impl Session {
    pub fn new(
        translator: Arc<dyn Translator>,
        settings: Arc<SettingsStore>,
        selection_mode: SelectionMode,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            translator,
            settings,
            selection_mode,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    /// Translate one text without touching any host
    async fn translate_text(
        &self,
        text: &str,
        pair: &LanguagePair,
        mark_unknown: bool,
    ) -> Result<String, TranslateError> {
        let request = TranslationRequest::for_pair(text, pair.clone(), mark_unknown)?;
        self.translate(&request).await
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        self.translator.translate(request).await
    }

    /// Translate the host's selections and replace them with the results.
    ///
    /// Failures are reported to the host as a notification and never modify
    /// the buffer.
    pub async fn translate_selections<H>(&self, host: &mut H, pair: &LanguagePair) -> CommandReport
    where
        H: EditorHost + ?Sized,
    {
        let span = info_span!("session", id = %self.id, langpair = %format!("{}|{}", pair.source, pair.target));
        async move {
            let mark_unknown = self.settings.mark_unknown();

            let selections = match self.selection_mode {
                SelectionMode::Single => host.selections().into_iter().take(1).collect::<Vec<_>>(),
                SelectionMode::Multi => host.selections(),
            };

            if selections.is_empty() && self.selection_mode == SelectionMode::Single {
                return Self::report_error(host, &TranslateError::EmptyInput);
            }

            let texts: Vec<String> = selections
                .iter()
                .map(|s| host.selected_text(s).unwrap_or_default())
                .collect();

            let translated = match self.translate_all(&texts, pair, mark_unknown).await {
                Ok(translated) => translated,
                Err(err) => return Self::report_error(host, &err),
            };

            let edits: Vec<Edit> = selections
                .into_iter()
                .zip(translated)
                .map(|(selection, text): (Selection, String)| Edit { selection, text })
                .collect();
            let count = edits.len();

            match host.apply_edits(edits) {
                Ok(()) => {
                    info!("Replaced {} selections", count);
                    CommandReport::applied(count)
                }
                Err(err) => {
                    warn!("Could not apply translations: {}", err);
                    let notification = Notification::error(err.to_string());
                    host.notify(notification.clone());
                    CommandReport::failed(notification)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run every translation concurrently; the first failure to settle wins
    /// and the results are returned in input order.
    async fn translate_all(
        &self,
        texts: &[String],
        pair: &LanguagePair,
        mark_unknown: bool,
    ) -> Result<Vec<String>, TranslateError> {
        try_join_all(
            texts
                .iter()
                .map(|text| self.translate_text(text, pair, mark_unknown)),
        )
        .await
    }

    fn report_error<H>(host: &mut H, err: &TranslateError) -> CommandReport
    where
        H: EditorHost + ?Sized,
    {
        warn!("Translation failed: {}", err);
        let notification = Notification::from(err);
        host.notify(notification.clone());
        CommandReport::failed(notification)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::editor::buffer::TextBuffer;
    use crate::translate::Severity;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Translator that answers from a table after a per-text delay
    #[derive(Default)]
    pub(crate) struct FakeTranslator {
        answers: HashMap<String, (Result<String, TranslateError>, u64)>,
        pub calls: AtomicUsize,
        pub requests: Mutex<Vec<TranslationRequest>>,
        in_flight: AtomicUsize,
        pub peak: AtomicUsize,
    }

    impl FakeTranslator {
        pub(crate) fn with(mut self, text: &str, answer: Result<&str, TranslateError>, delay_ms: u64) -> Self {
            self.answers
                .insert(text.to_string(), (answer.map(str::to_string), delay_ms));
            self
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let (answer, delay) = self
                .answers
                .get(&request.source_text)
                .cloned()
                .unwrap_or_else(|| (Err(TranslateError::NoTranslation { text: request.source_text.clone() }), 0));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            answer
        }
    }

    fn session(translator: Arc<FakeTranslator>, mode: SelectionMode) -> Session {
        Session::new(translator, Arc::new(SettingsStore::new(true)), mode)
    }

    fn pair() -> LanguagePair {
        LanguagePair::new("spa", "cat_valencia")
    }

    fn three_word_buffer() -> TextBuffer {
        TextBuffer::new(
            "uno dos tres",
            vec![Selection::new(0, 3), Selection::new(4, 7), Selection::new(8, 12)],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn results_match_selections_regardless_of_completion_order() {
        let translator = Arc::new(
            FakeTranslator::default()
                .with("uno", Ok("un"), 60)
                .with("dos", Ok("dos!"), 30)
                .with("tres", Ok("tres?"), 0),
        );
        let mut buffer = three_word_buffer();

        let report = session(translator.clone(), SelectionMode::Multi)
            .translate_selections(&mut buffer, &pair())
            .await;

        assert_eq!(report, CommandReport::applied(3));
        assert_eq!(buffer.text(), "un dos! tres?");
        assert!(buffer.notifications().is_empty());
        assert_eq!(translator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn multi_selection_requests_run_concurrently() {
        let translator = Arc::new(
            FakeTranslator::default()
                .with("uno", Ok("un"), 50)
                .with("dos", Ok("dos"), 50)
                .with("tres", Ok("tres"), 50),
        );
        let mut buffer = three_word_buffer();

        let report = session(translator.clone(), SelectionMode::Multi)
            .translate_selections(&mut buffer, &pair())
            .await;

        assert_eq!(report, CommandReport::applied(3));
        assert_eq!(translator.peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn one_failure_leaves_every_region_untouched() {
        let translator = Arc::new(
            FakeTranslator::default()
                .with("uno", Ok("un"), 0)
                .with("dos", Err(TranslateError::NoTranslation { text: "dos".to_string() }), 20)
                .with("tres", Ok("tres"), 40),
        );
        let mut buffer = three_word_buffer();

        let report = session(translator, SelectionMode::Multi)
            .translate_selections(&mut buffer, &pair())
            .await;

        assert_eq!(report.applied, 0);
        assert_eq!(buffer.text(), "uno dos tres");
        assert_eq!(
            buffer.notifications(),
            &[Notification::error("Unable to get translation from dos")]
        );
    }

    #[tokio::test]
    async fn earliest_failure_is_reported() {
        let translator = Arc::new(
            FakeTranslator::default()
                .with("uno", Err(TranslateError::Transport("slow failure".to_string())), 50)
                .with("dos", Err(TranslateError::Transport("fast failure".to_string())), 0)
                .with("tres", Ok("tres"), 0),
        );
        let mut buffer = three_word_buffer();

        let report = session(translator, SelectionMode::Multi)
            .translate_selections(&mut buffer, &pair())
            .await;

        assert_eq!(report.notification, Some(Notification::error("fast failure")));
        assert_eq!(buffer.text(), "uno dos tres");
    }

    #[tokio::test]
    async fn blank_selection_warns_without_modifying() {
        let translator = Arc::new(FakeTranslator::default().with("hola", Ok("hola"), 10));
        let mut buffer =
            TextBuffer::new("hola   ", vec![Selection::new(0, 4), Selection::new(4, 7)]).unwrap();

        let report = session(translator, SelectionMode::Multi)
            .translate_selections(&mut buffer, &pair())
            .await;

        assert_eq!(
            report.notification,
            Some(Notification::warning("Must select a text to translate"))
        );
        assert_eq!(report.notification.unwrap().level, Severity::Warning);
        assert_eq!(buffer.text(), "hola   ");
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_network() {
        let translator = Arc::new(FakeTranslator::default());
        let mut buffer = TextBuffer::new(" \n ", vec![Selection::new(0, 3)]).unwrap();

        for mode in [SelectionMode::Single, SelectionMode::Multi] {
            let report = session(translator.clone(), mode)
                .translate_selections(&mut buffer, &pair())
                .await;
            assert_eq!(report.applied, 0);
        }
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn single_mode_only_translates_primary_selection() {
        let translator = Arc::new(
            FakeTranslator::default()
                .with("tres", Ok("TRES"), 0)
                .with("uno", Ok("UNO"), 0),
        );
        let mut buffer = TextBuffer::new(
            "uno dos tres",
            vec![Selection::new(8, 12), Selection::new(0, 3)],
        )
        .unwrap();

        let report = session(translator.clone(), SelectionMode::Single)
            .translate_selections(&mut buffer, &pair())
            .await;

        assert_eq!(report, CommandReport::applied(1));
        assert_eq!(buffer.text(), "uno dos TRES");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_selection_behaviour_depends_on_mode() {
        let translator = Arc::new(FakeTranslator::default());

        let mut buffer = TextBuffer::new("hola", vec![]).unwrap();
        let report = session(translator.clone(), SelectionMode::Single)
            .translate_selections(&mut buffer, &pair())
            .await;
        assert_eq!(report.notification, Some(Notification::warning("Must select a text to translate")));

        let mut buffer = TextBuffer::new("hola", vec![]).unwrap();
        let report = session(translator, SelectionMode::Multi)
            .translate_selections(&mut buffer, &pair())
            .await;
        assert_eq!(report, CommandReport::applied(0));
        assert!(buffer.notifications().is_empty());
    }

    #[tokio::test]
    async fn mark_unknown_comes_from_settings() {
        let translator = Arc::new(FakeTranslator::default().with("hola", Ok("hola"), 0));
        let settings = Arc::new(SettingsStore::new(true));
        let session = Session::new(translator.clone(), settings.clone(), SelectionMode::Multi);

        let mut buffer = TextBuffer::new("hola", vec![Selection::new(0, 4)]).unwrap();
        session.translate_selections(&mut buffer, &pair()).await;
        settings
            .set(crate::config_manager::settings::MARK_UNKNOWN_KEY, serde_json::json!(false))
            .unwrap();
        session.translate_selections(&mut buffer, &pair()).await;

        let requests = translator.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].mark_unknown);
        assert!(!requests[1].mark_unknown);
        assert_eq!(requests[0].pair, pair());
    }

    #[tokio::test]
    async fn transport_error_without_message_uses_fallback() {
        let translator = Arc::new(
            FakeTranslator::default().with("hola", Err(TranslateError::Transport(String::new())), 0),
        );
        let mut buffer = TextBuffer::new("hola", vec![Selection::new(0, 4)]).unwrap();

        let report = session(translator, SelectionMode::Single)
            .translate_selections(&mut buffer, &pair())
            .await;

        assert_eq!(report.notification, Some(Notification::error("Oops.. that's an error for sure")));
    }
}
