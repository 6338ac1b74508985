use roster_client::{ApiError, UserApi};
use roster_types::{DraftRecord, Field, SubmitMode, UserRecord};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::validation::{validate_draft, ValidationError};

#[derive(Error, Debug)]
pub enum FormError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("No user with id {0}")]
    UnknownUser(String),
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub mode: SubmitMode,
    pub id: String,
    pub response: Value,
}

/// Holds the loaded user list and the draft being composed, and talks to the
/// API on their behalf.
///
/// The list is only ever replaced wholesale by a successful load. Mutations
/// never patch it locally; they reload.
pub struct FormController<A> {
    api: A,
    users: Vec<UserRecord>,
    draft: DraftRecord,
}

impl<A: UserApi> FormController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            users: Vec::new(),
            draft: DraftRecord::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn find(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.api.list_users().await {
            Ok(users) => {
                info!("Loaded {} users", users.len());
                self.users = users;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching user data: {}", e);
                Err(e)
            }
        }
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn begin_edit(&mut self, record: &UserRecord) {
        self.draft = DraftRecord::from_record(record);
    }

    pub fn begin_edit_by_id(&mut self, id: &str) -> Result<(), FormError> {
        let draft = self
            .find(id)
            .map(DraftRecord::from_record)
            .ok_or_else(|| FormError::UnknownUser(id.to_string()))?;
        self.draft = draft;
        Ok(())
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_draft(&self.draft, &self.users)
    }

    /// Validates the draft and creates or updates it.
    ///
    /// On success the list is reloaded and the draft cleared. On any failure
    /// the draft is left as it was.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        if let Err(e) = self.validate() {
            debug!("Draft rejected: {}", e);
            return Err(e.into());
        }

        let mode = self.draft.mode();
        let (id, result) = match mode {
            SubmitMode::Create => {
                let id = Uuid::new_v4().to_string();
                let payload = self.draft.to_payload(id.clone());
                (id, self.api.add_user(&payload).await)
            }
            SubmitMode::Update => {
                let id = self.draft.id.clone();
                let payload = self.draft.to_payload(id.clone());
                let result = self.api.update_user(&id, &payload).await;
                (id, result)
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                match mode {
                    SubmitMode::Create => error!("Error adding user: {}", e),
                    SubmitMode::Update => error!("Error updating user {}: {}", id, e),
                }
                return Err(e.into());
            }
        };
        debug!("API response: {}", response);

        // A failed reload is already logged; the mutation itself went through.
        let _ = self.load().await;
        self.draft.clear();

        Ok(SubmitOutcome { mode, id, response })
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, id: &str) -> Result<Value, FormError> {
        match self.api.delete_user(id).await {
            Ok(response) => {
                debug!("API response: {}", response);
                let _ = self.load().await;
                Ok(response)
            }
            Err(e) => {
                error!("Error deleting user {}: {}", id, e);
                Err(e.into())
            }
        }
    }
}
