pub mod note;
pub mod project;
pub mod user;

pub use note::{Note, NoteDraft};
pub use project::{Project, ProjectDraft, ProjectPatch, ProjectStatus, UnknownStatus};
pub use user::{NewUser, User, UserInfo};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A record scoped to exactly one user through its `user_id` foreign key
pub trait OwnedResource: Clone + Send + Sync + 'static {
    /// Fields supplied on creation
    type Draft: Send + 'static;
    /// Fields supplied on update
    type Patch: Send + 'static;

    /// Human-readable kind used in responses ("Note not found")
    const LABEL: &'static str;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    fn from_draft(id: Uuid, owner_id: Uuid, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Apply an update and stamp `updated_at = now`
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}
