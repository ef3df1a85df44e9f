use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::error::StoreError;
use crate::database::models::{
    NewUser, Note, NoteDraft, Project, ProjectDraft, ProjectPatch, ProjectStatus, User,
};
use crate::database::repository::{ResourceStore, UserStore};

/// Idempotent schema applied at startup
const SCHEMA_SQL: &str = include_str!("schema.sql");

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const NOTE_COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";
const PROJECT_COLUMNS: &str =
    "id, user_id, name, description, framework, status, created_at, updated_at";

/// Postgres-backed credential and resource store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using the configured pool limits
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Create tables and indexes if they do not exist yet
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA_SQL.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, "User already exists"))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore<Note> for PgStore {
    async fn find_many_by_owner(&self, owner: Uuid) -> Result<Vec<Note>, StoreError> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    async fn find_one_if_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Note>, StoreError> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn create(&self, owner: Uuid, draft: NoteDraft) -> Result<Note, StoreError> {
        let note = sqlx::query_as::<_, Note>(&format!(
            "INSERT INTO notes (id, user_id, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&draft.title)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    async fn update_if_owned(&self, id: Uuid, owner: Uuid, patch: NoteDraft) -> Result<Option<Note>, StoreError> {
        // Ownership filter and mutation in a single statement
        let note = sqlx::query_as::<_, Note>(&format!(
            "UPDATE notes
             SET title = $3,
                 content = $4,
                 updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1 AND user_id = $2
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&patch.title)
        .bind(&patch.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn delete_if_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ResourceStore<Project> for PgStore {
    async fn find_many_by_owner(&self, owner: Uuid) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn find_one_if_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn create(&self, owner: Uuid, draft: ProjectDraft) -> Result<Project, StoreError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (id, user_id, name, description, framework, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.framework)
        .bind(ProjectStatus::default().as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn update_if_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: ProjectPatch,
    ) -> Result<Option<Project>, StoreError> {
        // COALESCE keeps the stored value for every field the patch leaves out
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects
             SET name = COALESCE($3, name),
                 description = COALESCE($4, description),
                 framework = COALESCE($5, framework),
                 status = COALESCE($6, status),
                 updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1 AND user_id = $2
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.framework)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete_if_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
