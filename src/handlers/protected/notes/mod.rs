// handlers/protected/notes/mod.rs - Note CRUD
//
// GET    /notes        list_get      owned notes, newest first
// POST   /notes        create_post
// GET    /notes/:id    record_get
// PUT    /notes/:id    record_put    title and content replace the stored values
// DELETE /notes/:id    record_delete

pub mod collection;
pub mod record;

pub use collection::{create_post, list_get};
pub use record::{record_delete, record_get, record_put};

use serde::Deserialize;

use super::required;
use crate::database::models::NoteDraft;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteRequest {
    /// Both fields are required on create and on update
    pub fn into_draft(self) -> Result<NoteDraft, ApiError> {
        match (required(self.title), required(self.content)) {
            (Some(title), Some(content)) => Ok(NoteDraft { title, content }),
            (title, content) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push("title");
                }
                if content.is_none() {
                    missing.push("content");
                }
                Err(ApiError::missing_fields("Title and content are required", &missing))
            }
        }
    }
}
