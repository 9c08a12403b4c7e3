use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub session_id: String, // opaque cookie value, never sent back in JSON
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// User persistence; also resolves session ids to their owner.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser, session_id: &str) -> anyhow::Result<User>;
    async fn find_by_session_id(&self, session_id: &str) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser, session_id: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, session_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, session_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(session_id)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn find_by_session_id(&self, session_id: &str) -> anyhow::Result<Option<User>> {
        // A session cookie may have been reused for several accounts; the newest wins.
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, session_id, created_at
            FROM users
            WHERE session_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.db)
        .await
        .context("find user by session id")?;
        Ok(user)
    }
}
