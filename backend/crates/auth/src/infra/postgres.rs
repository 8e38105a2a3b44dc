//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::entity::{credential::Credential, session::SessionRecord};
use crate::domain::repository::{CredentialRepository, SessionStore};
use crate::domain::value_object::{
    SessionId, UserId, user_name::UserName, user_password::UserPassword,
};
use crate::error::{StoreError, StoreResult};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed credential and session store
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgAuthRepository {
    async fn find_by_user_name(&self, user_name: &UserName) -> StoreResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                user_name,
                password_hash,
                created_at
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credential()).transpose()
    }

    async fn find_by_id(&self, user_id: &UserId) -> StoreResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                user_name,
                password_hash,
                created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credential()).transpose()
    }

    async fn insert(&self, credential: &Credential) -> StoreResult<UserId> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                user_name,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.user_name.as_str())
        .bind(credential.password_hash.as_phc_string())
        .bind(credential.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(credential.user_id),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for PgAuthRepository {
    async fn load(&self, session_id: &SessionId) -> StoreResult<Option<SessionRecord>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                messages,
                counters,
                expires_at_ms
            FROM sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_record))
    }

    async fn save(&self, record: &SessionRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                user_id,
                messages,
                counters,
                expires_at_ms
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (session_id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                messages = EXCLUDED.messages,
                counters = EXCLUDED.counters,
                expires_at_ms = EXCLUDED.expires_at_ms
            "#,
        )
        .bind(record.session_id.as_uuid())
        .bind(record.user_id.map(UserId::into_uuid))
        .bind(Json(&record.messages))
        .bind(Json(&record.counters))
        .bind(record.expires_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn destroy(&self, session_id: &SessionId) -> StoreResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> StoreResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms <= $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");
        } else {
            tracing::debug!("No expired sessions to clean up");
        }

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    user_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> StoreResult<Credential> {
        let user_name = UserName::from_db(&self.user_name)
            .map_err(|e| StoreError::Corrupt(format!("Invalid user_name: {}", e)))?;

        Ok(Credential {
            user_id: UserId::from_uuid(self.user_id),
            user_name,
            password_hash: UserPassword::from_db(self.password_hash),
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Option<Uuid>,
    messages: Json<Vec<String>>,
    counters: Json<BTreeMap<String, i64>>,
    expires_at_ms: i64,
}

impl SessionRow {
    fn into_record(self) -> SessionRecord {
        SessionRecord {
            session_id: SessionId::from_uuid(self.session_id),
            user_id: self.user_id.map(UserId::from_uuid),
            messages: self.messages.0,
            counters: self.counters.0,
            expires_at_ms: self.expires_at_ms,
        }
    }
}
