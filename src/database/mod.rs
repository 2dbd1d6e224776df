use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub const AUTHOR_CUSTOMER: &str = "customer";
pub const AUTHOR_BOT: &str = "bot";

/// Conversation registry: one row per phone number with the full message
/// history as a JSONB array. Recording is best-effort; callers log
/// failures and keep serving.
#[derive(Clone, Debug)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id SERIAL PRIMARY KEY,
                phone TEXT UNIQUE NOT NULL,
                name TEXT,
                messages JSONB NOT NULL DEFAULT '[]'::jsonb,
                last_update TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversations_last_update ON conversations (last_update)"
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Appends one message to the per-phone history, creating the row on
    /// first contact. A later name never overwrites with an empty one.
    pub async fn record_message(
        &self,
        phone: &str,
        name: Option<&str>,
        author: &str,
        text: &str,
    ) -> Result<(), sqlx::Error> {
        if phone.is_empty() || text.is_empty() {
            return Ok(());
        }

        let entry = serde_json::json!([{
            "from": author,
            "text": text,
            "timestamp": chrono::Utc::now().timestamp_millis(),
        }]);
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        sqlx::query(
            r#"
            INSERT INTO conversations (phone, name, messages, last_update)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (phone) DO UPDATE SET
                messages = conversations.messages || EXCLUDED.messages,
                name = COALESCE($2, conversations.name),
                last_update = NOW()
            "#,
        )
        .bind(phone)
        .bind(name)
        .bind(entry)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
