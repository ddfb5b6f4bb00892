//! One editing session: the form state plus everything export needs.

use std::sync::atomic::{AtomicBool, Ordering};

use budget_core::{
    AppNotification, BudgetError, BudgetState, ExportFormat, FormEvent, Language,
    NotificationStore, NotificationType, Totals,
};
use budget_docs::{DocumentEncoder, FileSink, SavedFile, encoder_for, export_document};
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{error, info, warn};

/// What became of an export request.
#[derive(Debug)]
pub enum ExportOutcome {
    Saved(SavedFile),
    /// The export failed; the user has been alerted.
    Failed(BudgetError),
    /// Another export was still running, so nothing was done.
    Busy,
}

/// Clears the exporting flag when dropped, whatever the export's outcome.
struct ExportGuard<'a>(&'a AtomicBool);

impl<'a> ExportGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct BudgetSession {
    state: BudgetState,
    encoder: Box<dyn DocumentEncoder>,
    sink: Box<dyn FileSink>,
    /// Shared by both languages: one pending export blocks every other.
    exporting: AtomicBool,
    notifications: Mutex<NotificationStore>,
}

impl BudgetSession {
    pub fn new(encoder: Box<dyn DocumentEncoder>, sink: Box<dyn FileSink>) -> Self {
        Self {
            state: BudgetState::new(),
            encoder,
            sink,
            exporting: AtomicBool::new(false),
            notifications: Mutex::new(NotificationStore::new()),
        }
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.state)
    }

    pub fn dispatch(&mut self, event: FormEvent) {
        let current = std::mem::take(&mut self.state);
        self.state = current.apply(event);
    }

    /// Reseed the form if `confirm` agrees. Returns whether it did.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            info!("Form reset cancelled");
            return false;
        }
        self.dispatch(FormEvent::Reset {
            today: Utc::now().date_naive(),
        });
        info!("Form reset to defaults");
        true
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::SeqCst)
    }

    /// Export in the session's default format.
    pub async fn export(&self, lang: Language) -> ExportOutcome {
        self.export_using(lang, self.encoder.as_ref()).await
    }

    /// Export in `format`, which may differ from the session default.
    pub async fn export_as(&self, lang: Language, format: ExportFormat) -> ExportOutcome {
        if format == self.encoder.format() {
            return self.export(lang).await;
        }
        let encoder = encoder_for(format);
        self.export_using(lang, encoder.as_ref()).await
    }

    async fn export_using(&self, lang: Language, encoder: &dyn DocumentEncoder) -> ExportOutcome {
        let Some(_guard) = ExportGuard::claim(&self.exporting) else {
            warn!("Export ({lang}) ignored: another export is in progress");
            return ExportOutcome::Busy;
        };

        let snapshot = self.state.clone();
        let totals = Totals::compute(&snapshot);

        match export_document(&snapshot, lang, &totals, encoder, self.sink.as_ref()).await {
            Ok(saved) => {
                self.notifications.lock().push(
                    AppNotification::new(
                        NotificationType::Success,
                        format!("Saved {}", saved.location.display()),
                    )
                    .with_title("Export"),
                );
                ExportOutcome::Saved(saved)
            }
            Err(e) => {
                error!(category = ?e.category(), "Export ({lang}) failed: {e}");
                self.notifications.lock().push(
                    AppNotification::new(NotificationType::Error, e.user_message())
                        .with_title("Export"),
                );
                ExportOutcome::Failed(e)
            }
        }
    }

    /// Next unseen notification, oldest first.
    pub fn take_notification(&self) -> Option<AppNotification> {
        self.notifications.lock().take_unread()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use budget_core::ProjectField;
    use std::path::PathBuf;
    use std::time::Duration;

    struct SlowSink(Duration);

    #[async_trait]
    impl FileSink for SlowSink {
        async fn save(&self, file_name: &str, _bytes: &[u8]) -> Result<PathBuf> {
            tokio::time::sleep(self.0).await;
            Ok(PathBuf::from("/mem").join(file_name))
        }
    }

    struct BrokenEncoder;

    impl DocumentEncoder for BrokenEncoder {
        fn format(&self) -> ExportFormat {
            ExportFormat::Docx
        }

        fn encode(&self, _doc: &budget_docs::Document) -> Result<Vec<u8>> {
            bail!("no encoder")
        }
    }

    fn session_with(encoder: Box<dyn DocumentEncoder>, delay: Duration) -> BudgetSession {
        BudgetSession::new(encoder, Box::new(SlowSink(delay)))
    }

    #[tokio::test]
    async fn export_saves_and_notifies() {
        let mut session = session_with(encoder_for(ExportFormat::Markdown), Duration::ZERO);
        session.dispatch(FormEvent::Project(ProjectField::Name("Casa".into())));

        let ExportOutcome::Saved(saved) = session.export(Language::Es).await else {
            panic!("expected a saved file");
        };
        assert_eq!(saved.file_name, "Casa_es.md");
        assert!(!session.is_exporting());

        let note = session.take_notification().unwrap();
        assert_eq!(note.notification_type, NotificationType::Success);
        assert!(session.take_notification().is_none());
    }

    #[tokio::test]
    async fn second_export_while_pending_is_busy() {
        let session = session_with(encoder_for(ExportFormat::Html), Duration::from_millis(50));

        let (first, second) = tokio::join!(session.export(Language::Es), session.export(Language::En));
        assert!(matches!(first, ExportOutcome::Saved(_)));
        assert!(matches!(second, ExportOutcome::Busy));
        assert!(!session.is_exporting());

        // Gate released: the next export goes through.
        assert!(matches!(session.export(Language::En).await, ExportOutcome::Saved(_)));
    }

    #[tokio::test]
    async fn failed_export_alerts_and_keeps_state() {
        let mut session = session_with(Box::new(BrokenEncoder), Duration::ZERO);
        session.dispatch(FormEvent::AddMaterial);
        let before = session.state().clone();

        let outcome = session.export(Language::Es).await;
        assert!(matches!(outcome, ExportOutcome::Failed(BudgetError::Encode(_))));
        assert_eq!(session.state(), &before);
        assert!(!session.is_exporting());

        let note = session.take_notification().unwrap();
        assert_eq!(note.notification_type, NotificationType::Error);
        assert_eq!(note.message, "Error generating the document.");
    }

    #[tokio::test]
    async fn export_as_overrides_format() {
        let session = session_with(encoder_for(ExportFormat::Docx), Duration::ZERO);
        let ExportOutcome::Saved(saved) = session.export_as(Language::En, ExportFormat::Html).await
        else {
            panic!("expected a saved file");
        };
        assert_eq!(saved.file_name, "Presupuesto_en.html");
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut session = session_with(encoder_for(ExportFormat::Docx), Duration::ZERO);
        session.dispatch(FormEvent::AddMaterial);
        let edited = session.state().materials.len();

        assert!(!session.reset(|| false));
        assert_eq!(session.state().materials.len(), edited);

        assert!(session.reset(|| true));
        assert_eq!(
            session.state().materials.len(),
            budget_core::model::SEED_MATERIAL_ROWS
        );
    }
}
