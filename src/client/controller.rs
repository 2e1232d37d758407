//! Modal create/edit controller
//!
//! State machine behind every "Add"/"Edit" dialog:
//!
//! ```text
//! Closed --open--> Open --submit--> Submitting --ok--> Closed (+ reload)
//!                   ^                    |
//!                   +------- err --------+
//! ```
//!
//! Invalid input never leaves `Open`. Cancel is allowed from `Open` and
//! `Submitting`; a completion that arrives after cancel is ignored.

use crate::client::loader::CollectionLoader;
use crate::error::{JourneyError, Result};
use crate::traits::{CollectionBackend, JourneyRecord};
use crate::validation::ValidationErrors;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, warn};

/// Modal dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
    Submitting,
}

impl ModalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::Submitting => "submitting",
        }
    }
}

impl fmt::Display for ModalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the dialog creates a new record or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Form backing a modal dialog.
///
/// Forms hold raw user input (strings as typed) and turn it into a draft
/// payload when valid.
pub trait RecordForm<R: JourneyRecord>: Default + Clone + Send + Sync {
    /// Seed the form with an existing record's values for editing
    fn from_record(record: &R) -> Self;

    /// Check required fields and formats, producing the backend payload
    fn validate(&self) -> std::result::Result<R::Draft, ValidationErrors>;
}

/// A validated submission waiting for the backend
#[derive(Debug, Clone)]
pub struct SubmitTicket<R: JourneyRecord> {
    session: u64,
    mode: FormMode,
    draft: R::Draft,
}

impl<R: JourneyRecord> SubmitTicket<R> {
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    /// Send the draft as a create or update, bounded by `timeout`
    pub async fn send(&self, backend: &dyn CollectionBackend<R>, timeout: Duration) -> Result<R> {
        let call = async {
            match &self.mode {
                FormMode::Create => backend.create(&self.draft).await,
                FormMode::Edit { id } => backend.update(id, &self.draft).await,
            }
        };
        tokio::time::timeout(timeout, call)
            .await
            .unwrap_or(Err(JourneyError::Timeout(timeout.as_millis() as u64)))
    }
}

/// Result of a submit as seen by the dialog
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// Saved; the modal closed and the collection was reloaded
    Saved(R),
    /// Local validation failed; nothing was sent
    Invalid(ValidationErrors),
    /// Backend rejected the write; the modal is open again with input intact
    Failed(String),
    /// The modal was cancelled before the backend answered
    Ignored,
}

/// Open/submit/close state machine for one page's dialog
pub struct ModalCrudController<R: JourneyRecord, F: RecordForm<R>> {
    state: ModalState,
    mode: FormMode,
    form: F,
    field_errors: ValidationErrors,
    error: Option<String>,
    /// Bumped on every open/cancel so late completions can be recognized
    session: u64,
    _record: PhantomData<fn() -> R>,
}

impl<R: JourneyRecord, F: RecordForm<R>> Default for ModalCrudController<R, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: JourneyRecord, F: RecordForm<R>> ModalCrudController<R, F> {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            mode: FormMode::Create,
            form: F::default(),
            field_errors: ValidationErrors::new(),
            error: None,
            session: 0,
            _record: PhantomData,
        }
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ModalState::Closed
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Mutable form access while the dialog accepts input
    pub fn form_mut(&mut self) -> Option<&mut F> {
        (self.state == ModalState::Open).then_some(&mut self.form)
    }

    /// Backend error from the last failed submit
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Per-field errors from the last invalid submit
    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    /// Open an empty form for a new record
    pub fn open_create(&mut self) -> Result<()> {
        self.open(FormMode::Create, F::default())
    }

    /// Open a form seeded from an existing record
    pub fn open_edit(&mut self, record: &R) -> Result<()> {
        self.open(
            FormMode::Edit {
                id: record.record_id().to_string(),
            },
            F::from_record(record),
        )
    }

    /// Close without side effects; an in-flight submit will be ignored
    pub fn cancel(&mut self) {
        if self.state == ModalState::Closed {
            return;
        }
        debug!(collection = R::collection(), from = %self.state, "Modal cancelled");
        self.session += 1;
        self.reset(ModalState::Closed);
    }

    /// Validate locally and move to `Submitting`.
    ///
    /// Invalid input keeps the dialog `Open`, stores the field errors and
    /// returns `JourneyError::Validation` without touching the backend.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<R>> {
        self.require(ModalState::Open, "submit")?;

        match self.form.validate() {
            Err(errors) => {
                debug!(
                    collection = R::collection(),
                    fields = errors.len(),
                    "Form invalid, not submitting"
                );
                self.field_errors = errors.clone();
                Err(JourneyError::Validation(errors))
            }
            Ok(draft) => {
                self.field_errors = ValidationErrors::new();
                self.error = None;
                self.state = ModalState::Submitting;
                Ok(SubmitTicket {
                    session: self.session,
                    mode: self.mode.clone(),
                    draft,
                })
            }
        }
    }

    /// Apply the backend's answer to a ticket.
    ///
    /// On success the modal closes and the loader reloads once; on failure
    /// the modal reopens with the error and the user's input untouched.
    pub async fn finish(
        &mut self,
        ticket: SubmitTicket<R>,
        result: Result<R>,
        loader: &CollectionLoader<R>,
    ) -> SubmitOutcome<R> {
        if self.state != ModalState::Submitting || ticket.session != self.session {
            debug!(collection = R::collection(), "Ignoring completion for a closed modal");
            return SubmitOutcome::Ignored;
        }

        match result {
            Ok(record) => {
                debug!(collection = R::collection(), id = record.record_id(), "Record saved");
                self.reset(ModalState::Closed);
                loader.reload().await;
                SubmitOutcome::Saved(record)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(collection = R::collection(), error = %message, "Save failed");
                self.state = ModalState::Open;
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Validate, send through the loader's backend and apply the answer
    pub async fn submit(&mut self, loader: &CollectionLoader<R>) -> Result<SubmitOutcome<R>> {
        let ticket = match self.begin_submit() {
            Ok(ticket) => ticket,
            Err(JourneyError::Validation(errors)) => return Ok(SubmitOutcome::Invalid(errors)),
            Err(err) => return Err(err),
        };

        let result = ticket
            .send(loader.backend().as_ref(), loader.config().timeout)
            .await;
        Ok(self.finish(ticket, result, loader).await)
    }

    // === Private Implementation ===

    fn open(&mut self, mode: FormMode, form: F) -> Result<()> {
        self.require(ModalState::Closed, "open")?;
        self.session += 1;
        self.mode = mode;
        self.form = form;
        self.field_errors = ValidationErrors::new();
        self.error = None;
        self.state = ModalState::Open;
        Ok(())
    }

    fn reset(&mut self, state: ModalState) {
        self.state = state;
        self.mode = FormMode::Create;
        self.form = F::default();
        self.field_errors = ValidationErrors::new();
        self.error = None;
    }

    fn require(&self, expected: ModalState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(JourneyError::InvalidTransition {
                from: self.state.to_string(),
                action: action.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{LoaderConfig, MemoryBackend};
    use crate::domains::goal::{Goal, GoalForm};
    use std::sync::Arc;

    type GoalModal = ModalCrudController<Goal, GoalForm>;

    fn filled_form() -> GoalForm {
        GoalForm {
            title: "Visit Kyoto".into(),
            target_date: "2026-04-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_only_from_closed() {
        let mut modal = GoalModal::new();
        modal.open_create().unwrap();
        assert_eq!(modal.state(), ModalState::Open);

        let err = modal.open_create().unwrap_err();
        assert!(matches!(err, JourneyError::InvalidTransition { .. }));
    }

    #[test]
    fn test_submit_requires_open() {
        let mut modal = GoalModal::new();
        assert!(matches!(
            modal.begin_submit(),
            Err(JourneyError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_invalid_form_stays_open_with_field_errors() {
        let mut modal = GoalModal::new();
        modal.open_create().unwrap();

        let err = modal.begin_submit().unwrap_err();
        assert!(matches!(err, JourneyError::Validation(_)));
        assert_eq!(modal.state(), ModalState::Open);
        assert!(modal.field_errors().has("title"));
    }

    #[test]
    fn test_form_mut_only_while_open() {
        let mut modal = GoalModal::new();
        assert!(modal.form_mut().is_none());

        modal.open_create().unwrap();
        modal.form_mut().unwrap().title = "Typed".into();
        assert_eq!(modal.form().title, "Typed");
    }

    #[test]
    fn test_cancel_resets_form() {
        let mut modal = GoalModal::new();
        modal.open_create().unwrap();
        *modal.form_mut().unwrap() = filled_form();

        modal.cancel();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(modal.form().title.is_empty());
    }

    #[tokio::test]
    async fn test_completion_after_cancel_is_ignored() {
        let backend = Arc::new(MemoryBackend::<Goal>::new());
        let loader = CollectionLoader::new(backend.clone(), LoaderConfig::default());
        let mut modal = GoalModal::new();

        modal.open_create().unwrap();
        *modal.form_mut().unwrap() = filled_form();
        let ticket = modal.begin_submit().unwrap();
        assert_eq!(modal.state(), ModalState::Submitting);

        modal.cancel();
        let result = ticket.send(backend.as_ref(), Duration::from_secs(1)).await;
        let outcome = modal.finish(ticket, result, &loader).await;

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(loader.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_edit_sends_update() {
        let backend = Arc::new(MemoryBackend::<Goal>::new());
        let loader = CollectionLoader::new(backend.clone(), LoaderConfig::default());
        let mut modal = GoalModal::new();

        modal.open_create().unwrap();
        *modal.form_mut().unwrap() = filled_form();
        let created = match modal.submit(&loader).await.unwrap() {
            SubmitOutcome::Saved(goal) => goal,
            other => panic!("unexpected outcome: {:?}", other),
        };

        modal.open_edit(&created).unwrap();
        assert_eq!(
            modal.mode(),
            &FormMode::Edit {
                id: created.id.clone()
            }
        );
        modal.form_mut().unwrap().progress = "50".into();
        let outcome = modal.submit(&loader).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Saved(ref g) if g.progress == 50));
        let records = loader.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].progress, 50);
    }
}
