//! State of the competition screen and the transitions user actions trigger.
//!
//! The screen is `Idle` when no dialog is open. Every transition that touches
//! storage goes through [`CompetitionStore`] and waits for it before the list
//! is refreshed.

use storage::{
    dto::competition::{FieldError, SaveCompetitionRequest},
    error::StorageError,
    models::Competition,
    repository::competition::SaveOutcome,
};
use uuid::Uuid;

use crate::features::competitions::services::CompetitionStore;

pub const SAVED_MESSAGE: &str = "Competition saved successfully";
pub const DELETED_MESSAGE: &str = "Competition deleted successfully";
pub const INVALID_FORM_MESSAGE: &str = "Please correct the errors in the form";
pub const VANISHED_MESSAGE: &str = "This competition no longer exists";
pub const LOAD_FAILED_MESSAGE: &str = "Error loading competitions";
pub const SAVE_FAILED_MESSAGE: &str = "Error saving competition";
pub const DELETE_FAILED_MESSAGE: &str = "Error deleting competition";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    New,
    Edit,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::New => "New Competition",
            Self::Edit => "Edit Competition",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Form {
        kind: FormKind,
        request: SaveCompetitionRequest,
        errors: Vec<FieldError>,
    },
    ConfirmDelete(Competition),
    DeleteBlocked(Competition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient notification shown above the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionScreen {
    pub competitions: Vec<Competition>,
    pub dialog: Option<Dialog>,
    pub notice: Option<Notice>,
}

impl CompetitionScreen {
    /// Idle screen with the current list
    pub async fn load(store: &impl CompetitionStore) -> Self {
        let mut screen = Self::default();
        screen.refresh(store).await;
        screen
    }

    pub fn is_idle(&self) -> bool {
        self.dialog.is_none()
    }

    pub async fn refresh(&mut self, store: &impl CompetitionStore) {
        match store.list().await {
            Ok(competitions) => self.competitions = competitions,
            Err(e) => {
                tracing::error!("Error loading competitions: {:?}", e);
                self.notice = Some(Notice::error(LOAD_FAILED_MESSAGE));
            }
        }
    }

    pub fn open_new(&mut self) {
        self.dialog = Some(Dialog::Form {
            kind: FormKind::New,
            request: SaveCompetitionRequest::default(),
            errors: Vec::new(),
        });
    }

    /// Load the selected row into the form
    pub fn open_edit(&mut self, id: Uuid) {
        match self.selected(id) {
            Some(competition) => {
                let request = SaveCompetitionRequest::from(competition);
                self.dialog = Some(Dialog::Form {
                    kind: FormKind::Edit,
                    request,
                    errors: Vec::new(),
                });
            }
            None => self.notice = Some(Notice::error(VANISHED_MESSAGE)),
        }
    }

    /// Validate and store the form. Returns `true` once the record is saved
    /// and the screen is back to idle.
    pub async fn save(
        &mut self,
        store: &impl CompetitionStore,
        request: SaveCompetitionRequest,
    ) -> bool {
        let kind = if request.competition_id.is_some() {
            FormKind::Edit
        } else {
            FormKind::New
        };

        let draft = match request.clone().into_draft() {
            Ok(draft) => draft,
            Err(errors) => {
                self.reopen_form(kind, request, errors);
                self.notice = Some(Notice::error(INVALID_FORM_MESSAGE));
                return false;
            }
        };

        match store.save(&draft).await {
            Ok(SaveOutcome::Created(competition)) | Ok(SaveOutcome::Updated(competition)) => {
                tracing::info!(
                    competition_id = %competition.competition_id,
                    "Competition saved"
                );
                self.dialog = None;
                self.notice = Some(Notice::success(SAVED_MESSAGE));
                self.refresh(store).await;
                true
            }
            Ok(SaveOutcome::NotFound(id)) => {
                tracing::warn!(competition_id = %id, "Update targeted a missing competition");
                self.reopen_form(kind, request, Vec::new());
                self.notice = Some(Notice::error(VANISHED_MESSAGE));
                false
            }
            Err(StorageError::ConstraintViolation(msg)) => {
                self.reopen_form(kind, request, Vec::new());
                self.notice = Some(Notice::error(format!("{}: {}", SAVE_FAILED_MESSAGE, msg)));
                false
            }
            Err(e) => {
                tracing::error!("Error saving competition: {:?}", e);
                self.reopen_form(kind, request, Vec::new());
                self.notice = Some(Notice::error(SAVE_FAILED_MESSAGE));
                false
            }
        }
    }

    /// Discard the open dialog, including unsaved edits
    pub fn cancel(&mut self) {
        self.dialog = None;
    }

    /// Check dependents and open either the confirmation or the blocked notice
    pub async fn request_delete(&mut self, store: &impl CompetitionStore, id: Uuid) {
        let Some(competition) = self.selected(id).cloned() else {
            self.notice = Some(Notice::error(VANISHED_MESSAGE));
            return;
        };

        match store.has_dependents(id).await {
            Ok(true) => self.dialog = Some(Dialog::DeleteBlocked(competition)),
            Ok(false) => self.dialog = Some(Dialog::ConfirmDelete(competition)),
            Err(e) => {
                tracing::error!("Error checking competition registrations: {:?}", e);
                self.dialog = None;
                self.notice = Some(Notice::error(DELETE_FAILED_MESSAGE));
            }
        }
    }

    /// Delete the competition awaiting confirmation. Returns `true` when the
    /// screen is back to idle without errors.
    pub async fn confirm_delete(&mut self, store: &impl CompetitionStore) -> bool {
        let Some(Dialog::ConfirmDelete(competition)) = self.dialog.clone() else {
            return false;
        };
        self.dialog = None;

        match store.delete(competition.competition_id).await {
            Ok(_) => {
                tracing::info!(
                    competition_id = %competition.competition_id,
                    "Competition deleted"
                );
                self.notice = Some(Notice::success(DELETED_MESSAGE));
                self.refresh(store).await;
                true
            }
            Err(StorageError::HasDependents { .. }) => {
                self.dialog = Some(Dialog::DeleteBlocked(competition));
                false
            }
            Err(e) => {
                tracing::error!("Error deleting competition: {:?}", e);
                self.notice = Some(Notice::error(DELETE_FAILED_MESSAGE));
                false
            }
        }
    }

    fn selected(&self, id: Uuid) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.competition_id == id)
    }

    fn reopen_form(
        &mut self,
        kind: FormKind,
        request: SaveCompetitionRequest,
        errors: Vec<FieldError>,
    ) {
        self.dialog = Some(Dialog::Form {
            kind,
            request,
            errors,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use storage::{dto::competition::CompetitionDraft, error::Result};

    /// In-memory stand-in for the database
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub rows: Mutex<Vec<Competition>>,
        pub registered: Mutex<HashSet<Uuid>>,
        pub unavailable: bool,
    }

    impl MemoryStore {
        pub fn with(rows: Vec<Competition>) -> Self {
            Self {
                rows: Mutex::new(rows),
                ..Default::default()
            }
        }

        pub fn register(&self, id: Uuid) {
            self.registered.lock().unwrap().insert(id);
        }

        fn check(&self) -> Result<()> {
            if self.unavailable {
                return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CompetitionStore for MemoryStore {
        async fn list(&self) -> Result<Vec<Competition>> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by(|a, b| b.competition_date.cmp(&a.competition_date));
            Ok(rows)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Competition>> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|c| c.competition_id == id).cloned())
        }

        async fn save(&self, draft: &CompetitionDraft) -> Result<SaveOutcome> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            match draft.competition_id {
                None => {
                    let created = Competition {
                        competition_id: Uuid::new_v4(),
                        name: draft.name.clone(),
                        competition_date: draft.competition_date,
                        location: draft.location.clone(),
                        created_at: chrono::Utc::now().naive_utc(),
                    };
                    rows.push(created.clone());
                    Ok(SaveOutcome::Created(created))
                }
                Some(id) => match rows.iter_mut().find(|c| c.competition_id == id) {
                    Some(existing) => {
                        existing.name = draft.name.clone();
                        existing.competition_date = draft.competition_date;
                        existing.location = draft.location.clone();
                        Ok(SaveOutcome::Updated(existing.clone()))
                    }
                    None => Ok(SaveOutcome::NotFound(id)),
                },
            }
        }

        async fn delete(&self, id: Uuid) -> Result<bool> {
            self.check()?;
            if self.registered.lock().unwrap().contains(&id) {
                return Err(StorageError::HasDependents {
                    competition_id: id,
                    registrations: 1,
                });
            }
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.competition_id != id);
            Ok(rows.len() < before)
        }

        async fn has_dependents(&self, id: Uuid) -> Result<bool> {
            self.check()?;
            Ok(self.registered.lock().unwrap().contains(&id))
        }
    }

    pub(crate) fn competition(name: &str, y: i32, m: u32, d: u32) -> Competition {
        Competition {
            competition_id: Uuid::new_v4(),
            name: name.to_string(),
            competition_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            location: None,
            created_at: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn valid_request(name: &str) -> SaveCompetitionRequest {
        SaveCompetitionRequest {
            competition_id: None,
            name: name.to_string(),
            competition_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            location: Some("Paris".to_string()),
        }
    }

    #[tokio::test]
    async fn load_lists_most_recent_first() {
        let a = competition("A", 2024, 1, 1);
        let b = competition("B", 2025, 6, 1);
        let store = MemoryStore::with(vec![a.clone(), b.clone()]);

        let screen = CompetitionScreen::load(&store).await;
        assert!(screen.is_idle());
        assert_eq!(screen.competitions, vec![b, a]);
    }

    #[tokio::test]
    async fn new_then_cancel_returns_to_idle() {
        let store = MemoryStore::default();
        let mut screen = CompetitionScreen::load(&store).await;

        screen.open_new();
        assert!(matches!(
            screen.dialog,
            Some(Dialog::Form { kind: FormKind::New, ref request, .. }) if *request == SaveCompetitionRequest::default()
        ));

        screen.cancel();
        assert!(screen.is_idle());
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_loads_the_selected_row() {
        let existing = competition("Lyon Cup", 2024, 3, 1);
        let store = MemoryStore::with(vec![existing.clone()]);
        let mut screen = CompetitionScreen::load(&store).await;

        screen.open_edit(existing.competition_id);
        let Some(Dialog::Form { kind, request, errors }) = &screen.dialog else {
            panic!("form should be open");
        };
        assert_eq!(*kind, FormKind::Edit);
        assert_eq!(*request, SaveCompetitionRequest::from(&existing));
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn invalid_form_stays_open_with_field_errors() {
        let store = MemoryStore::default();
        let mut screen = CompetitionScreen::load(&store).await;
        screen.open_new();

        let saved = screen.save(&store, SaveCompetitionRequest::default()).await;
        assert!(!saved);
        let Some(Dialog::Form { errors, .. }) = &screen.dialog else {
            panic!("form should stay open");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "competition_date"]);
        assert_eq!(screen.notice, Some(Notice::error(INVALID_FORM_MESSAGE)));
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_save_closes_form_and_refreshes() {
        let store = MemoryStore::default();
        let mut screen = CompetitionScreen::load(&store).await;
        screen.open_new();

        assert!(screen.save(&store, valid_request("Paris Open")).await);
        assert!(screen.is_idle());
        assert_eq!(screen.notice, Some(Notice::success(SAVED_MESSAGE)));
        assert_eq!(screen.competitions.len(), 1);
        assert_eq!(screen.competitions[0].name, "Paris Open");
    }

    #[tokio::test]
    async fn saving_a_vanished_record_reports_it_distinctly() {
        let store = MemoryStore::default();
        let mut screen = CompetitionScreen::load(&store).await;
        let request = SaveCompetitionRequest {
            competition_id: Some(Uuid::new_v4()),
            ..valid_request("Ghost Cup")
        };

        assert!(!screen.save(&store, request).await);
        assert!(matches!(
            screen.dialog,
            Some(Dialog::Form { kind: FormKind::Edit, ref errors, .. }) if errors.is_empty()
        ));
        assert_eq!(screen.notice, Some(Notice::error(VANISHED_MESSAGE)));
        assert!(store.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failure_on_save_keeps_form_open() {
        let store = MemoryStore {
            unavailable: true,
            ..Default::default()
        };
        let mut screen = CompetitionScreen::default();

        assert!(!screen.save(&store, valid_request("Paris Open")).await);
        assert!(!screen.is_idle());
        assert_eq!(screen.notice, Some(Notice::error(SAVE_FAILED_MESSAGE)));
    }

    #[tokio::test]
    async fn delete_is_blocked_when_athletes_are_registered() {
        let existing = competition("Nantes Meet", 2025, 2, 1);
        let store = MemoryStore::with(vec![existing.clone()]);
        store.register(existing.competition_id);
        let mut screen = CompetitionScreen::load(&store).await;

        screen.request_delete(&store, existing.competition_id).await;
        assert_eq!(screen.dialog, Some(Dialog::DeleteBlocked(existing.clone())));

        // Confirming is not possible from the blocked dialog
        assert!(!screen.confirm_delete(&store).await);
        assert_eq!(screen.dialog, Some(Dialog::DeleteBlocked(existing)));
        assert_eq!(store.rows.lock().unwrap().len(), 1);

        screen.cancel();
        assert!(screen.is_idle());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_and_refreshes() {
        let existing = competition("Lille Open", 2025, 4, 1);
        let store = MemoryStore::with(vec![existing.clone()]);
        let mut screen = CompetitionScreen::load(&store).await;

        screen.request_delete(&store, existing.competition_id).await;
        assert_eq!(screen.dialog, Some(Dialog::ConfirmDelete(existing)));

        assert!(screen.confirm_delete(&store).await);
        assert!(screen.is_idle());
        assert!(screen.competitions.is_empty());
        assert_eq!(screen.notice, Some(Notice::success(DELETED_MESSAGE)));
    }

    #[tokio::test]
    async fn registration_added_after_check_still_blocks_delete() {
        let existing = competition("Toulouse Open", 2025, 8, 1);
        let store = MemoryStore::with(vec![existing.clone()]);
        let mut screen = CompetitionScreen::load(&store).await;

        screen.request_delete(&store, existing.competition_id).await;
        store.register(existing.competition_id);

        assert!(!screen.confirm_delete(&store).await);
        assert_eq!(screen.dialog, Some(Dialog::DeleteBlocked(existing)));
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_delete_changes_nothing() {
        let existing = competition("Bordeaux Meet", 2025, 9, 1);
        let store = MemoryStore::with(vec![existing.clone()]);
        let mut screen = CompetitionScreen::load(&store).await;

        screen.request_delete(&store, existing.competition_id).await;
        screen.cancel();

        assert!(screen.is_idle());
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unavailable_storage_shows_generic_notice() {
        let store = MemoryStore {
            unavailable: true,
            ..Default::default()
        };
        let screen = CompetitionScreen::load(&store).await;
        assert!(screen.competitions.is_empty());
        assert_eq!(screen.notice, Some(Notice::error(LOAD_FAILED_MESSAGE)));
    }
}
