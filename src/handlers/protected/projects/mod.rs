// handlers/protected/projects/mod.rs - Project CRUD
//
// PUT is a partial update: present, non-blank fields replace stored values.

pub mod collection;
pub mod record;

pub use collection::{create_post, list_get};
pub use record::{record_delete, record_get, record_put};

use serde::Deserialize;

use super::required;
use crate::database::models::{ProjectDraft, ProjectPatch};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub framework: Option<String>,
}

impl CreateProjectRequest {
    pub fn into_draft(self) -> Result<ProjectDraft, ApiError> {
        let name = required(self.name);
        let description = required(self.description);
        let framework = required(self.framework);

        match (name, description, framework) {
            (Some(name), Some(description), Some(framework)) => Ok(ProjectDraft {
                name,
                description,
                framework,
            }),
            (name, description, framework) => {
                let missing: Vec<&str> = [
                    ("name", name.is_none()),
                    ("description", description.is_none()),
                    ("framework", framework.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();

                Err(ApiError::missing_fields(
                    "Name, description, and framework are required",
                    &missing,
                ))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub framework: Option<String>,
    pub status: Option<String>,
}

impl UpdateProjectRequest {
    pub fn into_patch(self) -> Result<ProjectPatch, ApiError> {
        ProjectPatch::from_fields(self.name, self.description, self.framework, self.status).map_err(
            |e| {
                let mut field_errors = std::collections::HashMap::new();
                field_errors.insert(
                    "status".to_string(),
                    "Must be one of: active, deployed, paused, error".to_string(),
                );
                tracing::debug!("Rejected project update: {}", e);
                ApiError::validation_error("Invalid project status", Some(field_errors))
            },
        )
    }
}
