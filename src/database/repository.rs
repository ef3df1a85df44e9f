use async_trait::async_trait;
use uuid::Uuid;

use crate::database::error::StoreError;
use crate::database::models::{NewUser, OwnedResource, User};

/// Credential store. Emails are unique; `create` fails with `StoreError::Conflict` on reuse.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Cheap connectivity probe for `GET /health`
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Store for records owned by a single user.
///
/// Every lookup and mutation is filtered by `id AND owner` in one operation, so a
/// record owned by someone else is indistinguishable from one that does not exist.
#[async_trait]
pub trait ResourceStore<R: OwnedResource>: Send + Sync {
    /// All records of the owner, newest first
    async fn find_many_by_owner(&self, owner: Uuid) -> Result<Vec<R>, StoreError>;

    async fn find_one_if_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<R>, StoreError>;

    async fn create(&self, owner: Uuid, draft: R::Draft) -> Result<R, StoreError>;

    /// Conditional update; `None` when no record matches both id and owner
    async fn update_if_owned(&self, id: Uuid, owner: Uuid, patch: R::Patch) -> Result<Option<R>, StoreError>;

    /// Conditional delete; `false` when no record matches both id and owner
    async fn delete_if_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}
