use serde::{Deserialize, Serialize};

use crate::{Field, UserFields, UserPayload, UserRecord};

/// Staging copy of a record being created or edited.
///
/// An empty `id` means the draft will be created on submit; a non-empty one
/// means it updates the record with that id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub fields: UserFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    Create,
    Update,
}

impl SubmitMode {
    pub fn button_label(&self) -> &'static str {
        match self {
            SubmitMode::Create => "Add User",
            SubmitMode::Update => "Update User",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SubmitMode::Create => "Add User",
            SubmitMode::Update => "Edit User",
        }
    }
}

impl DraftRecord {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            fields: record.data.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn mode(&self) -> SubmitMode {
        if self.is_editing() {
            SubmitMode::Update
        } else {
            SubmitMode::Create
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_payload(&self, id: impl Into<String>) -> UserPayload {
        UserPayload {
            id: id.into(),
            fields: self.fields.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_follows_id() {
        let mut draft = DraftRecord::default();
        assert_eq!(draft.mode(), SubmitMode::Create);
        assert_eq!(draft.mode().button_label(), "Add User");

        let record = UserRecord::new("1", UserFields::new("Ann", "Lee", "a@x.com", "111"));
        draft = DraftRecord::from_record(&record);
        assert!(draft.is_editing());
        assert_eq!(draft.mode().title(), "Edit User");
        assert_eq!(draft.fields.email, "a@x.com");

        draft.clear();
        assert_eq!(draft, DraftRecord::default());
    }
}
