use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::OwnedResource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title and content of a note. Creation and update both replace these wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl OwnedResource for Note {
    type Draft = NoteDraft;
    type Patch = NoteDraft;

    const LABEL: &'static str = "Note";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_draft(id: Uuid, owner_id: Uuid, draft: NoteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: owner_id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: NoteDraft, now: DateTime<Utc>) {
        self.title = patch.title;
        self.content = patch.content;
        self.updated_at = now;
    }
}
