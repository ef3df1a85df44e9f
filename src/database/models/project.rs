use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::OwnedResource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub framework: String,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle state shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Deployed,
    Paused,
    Error,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Deployed => "deployed",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Error => "error",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown project status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "deployed" => Ok(ProjectStatus::Deployed),
            "paused" => Ok(ProjectStatus::Paused),
            "error" => Ok(ProjectStatus::Error),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, UnknownStatus> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub framework: String,
}

/// Partial project update. Each `Some` field replaces the stored value; `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub framework: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    /// Build a patch from raw request fields. Empty strings count as absent.
    pub fn from_fields(
        name: Option<String>,
        description: Option<String>,
        framework: Option<String>,
        status: Option<String>,
    ) -> Result<Self, UnknownStatus> {
        let status = match present(status) {
            Some(raw) => Some(raw.parse::<ProjectStatus>()?),
            None => None,
        };

        Ok(Self {
            name: present(name),
            description: present(description),
            framework: present(framework),
            status,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.framework.is_none()
            && self.status.is_none()
    }

    /// Merge into an existing project: patch values take precedence over stored ones
    pub fn merge_into(self, project: &mut Project, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(framework) = self.framework {
            project.framework = framework;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        project.updated_at = now;
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl OwnedResource for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const LABEL: &'static str = "Project";

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

    fn from_draft(id: Uuid, owner_id: Uuid, draft: ProjectDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: owner_id,
            name: draft.name,
            description: draft.description,
            framework: draft.framework,
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ProjectPatch, now: DateTime<Utc>) {
        patch.merge_into(self, now);
    }
}
