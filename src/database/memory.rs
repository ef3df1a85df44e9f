use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::error::StoreError;
use crate::database::models::{NewUser, Note, OwnedResource, Project, User};
use crate::database::repository::{ResourceStore, UserStore};

/// Process-local store used for development without a database and by the test suite.
///
/// Each conditional operation checks ownership and mutates under a single write lock.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    users: RwLock<HashMap<Uuid, User>>,
    notes: Table<Note>,
    projects: Table<Project>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Timestamp for a mutation: never earlier than, nor equal to, the previous one
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

struct Table<R> {
    rows: RwLock<HashMap<Uuid, R>>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: OwnedResource> Table<R> {
    async fn find_many_by_owner(&self, owner: Uuid) -> Vec<R> {
        let rows = self.rows.read().await;
        let mut owned: Vec<R> = rows.values().filter(|r| r.owner_id() == owner).cloned().collect();
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then_with(|| b.id().cmp(&a.id())));
        owned
    }

    async fn find_one_if_owned(&self, id: Uuid, owner: Uuid) -> Option<R> {
        let rows = self.rows.read().await;
        rows.get(&id).filter(|r| r.owner_id() == owner).cloned()
    }

    async fn create(&self, owner: Uuid, draft: R::Draft) -> R {
        let record = R::from_draft(Uuid::new_v4(), owner, draft, Utc::now());
        self.rows.write().await.insert(record.id(), record.clone());
        record
    }

    async fn update_if_owned(&self, id: Uuid, owner: Uuid, patch: R::Patch) -> Option<R> {
        let mut rows = self.rows.write().await;
        let record = rows.get_mut(&id).filter(|r| r.owner_id() == owner)?;
        let now = next_timestamp(record.updated_at());
        record.apply(patch, now);
        Some(record.clone())
    }

    async fn delete_if_owned(&self, id: Uuid, owner: Uuid) -> bool {
        let mut rows = self.rows.write().await;
        match rows.get(&id) {
            Some(record) if record.owner_id() == owner => {
                rows.remove(&id);
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.inner.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.inner.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("User already exists".to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ResourceStore<Note> for MemoryStore {
    async fn find_many_by_owner(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        Ok(self.inner.notes.find_many_by_owner(owner).await)
    }

    async fn find_one_if_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Note>, StoreError> {
        Ok(self.inner.notes.find_one_if_owned(id, owner).await)
    }

    async fn create(&self, owner: Uuid, draft: <Note as OwnedResource>::Draft) -> Result<Note, StoreError> {
        Ok(self.inner.notes.create(owner, draft).await)
    }

    async fn update_if_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: <Note as OwnedResource>::Patch,
    ) -> Result<Option<Note>, StoreError> {
        Ok(self.inner.notes.update_if_owned(id, owner, patch).await)
    }

    async fn delete_if_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.notes.delete_if_owned(id, owner).await)
    }
}

#[async_trait]
impl ResourceStore<Project> for MemoryStore {
    async fn find_many_by_owner(&self, owner: Uuid) -> Result<Vec<Project>, StoreError> {
        Ok(self.inner.projects.find_many_by_owner(owner).await)
    }

    async fn find_one_if_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.projects.find_one_if_owned(id, owner).await)
    }

    async fn create(
        &self,
        owner: Uuid,
        draft: <Project as OwnedResource>::Draft,
    ) -> Result<Project, StoreError> {
        Ok(self.inner.projects.create(owner, draft).await)
    }

    async fn update_if_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: <Project as OwnedResource>::Patch,
    ) -> Result<Option<Project>, StoreError> {
        Ok(self.inner.projects.update_if_owned(id, owner, patch).await)
    }

    async fn delete_if_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.projects.delete_if_owned(id, owner).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{NoteDraft, ProjectDraft, ProjectPatch, ProjectStatus};

    fn draft(title: &str) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            content: "body".to_string(),
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@example.com")).await.unwrap();

        let err = UserStore::create(&store, new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn lookups_are_owner_filtered() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let note = ResourceStore::<Note>::create(&store, alice, draft("mine")).await.unwrap();

        let as_bob = ResourceStore::<Note>::find_one_if_owned(&store, note.id, bob).await.unwrap();
        assert!(as_bob.is_none());

        let updated = ResourceStore::<Note>::update_if_owned(&store, note.id, bob, draft("stolen"))
            .await
            .unwrap();
        assert!(updated.is_none());

        assert!(!ResourceStore::<Note>::delete_if_owned(&store, note.id, bob).await.unwrap());

        let still_there = ResourceStore::<Note>::find_one_if_owned(&store, note.id, alice)
            .await
            .unwrap();
        assert_eq!(still_there.unwrap().title, "mine");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            ResourceStore::<Note>::create(&store, owner, draft(title)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let notes = ResourceStore::<Note>::find_many_by_owner(&store, owner).await.unwrap();
        let titles: Vec<&str> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn update_advances_updated_at() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let note = ResourceStore::<Note>::create(&store, owner, draft("T")).await.unwrap();

        let updated = ResourceStore::<Note>::update_if_owned(&store, note.id, owner, draft("T2"))
            .await
            .unwrap()
            .unwrap();
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
        assert_eq!(updated.title, "T2");
    }

    #[tokio::test]
    async fn project_patch_merges() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let project = ResourceStore::<Project>::create(
            &store,
            owner,
            ProjectDraft {
                name: "API".into(),
                description: "desc".into(),
                framework: "go".into(),
            },
        )
        .await
        .unwrap();

        let patch = ProjectPatch {
            status: Some(ProjectStatus::Paused),
            ..Default::default()
        };
        let updated = ResourceStore::<Project>::update_if_owned(&store, project.id, owner, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ProjectStatus::Paused);
        assert_eq!(updated.name, "API");
    }

    #[tokio::test]
    async fn delete_removes_only_owned_record() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let note = ResourceStore::<Note>::create(&store, owner, draft("gone")).await.unwrap();

        assert!(ResourceStore::<Note>::delete_if_owned(&store, note.id, owner).await.unwrap());
        assert!(!ResourceStore::<Note>::delete_if_owned(&store, note.id, owner).await.unwrap());
        assert!(ResourceStore::<Note>::find_many_by_owner(&store, owner).await.unwrap().is_empty());
    }
}
