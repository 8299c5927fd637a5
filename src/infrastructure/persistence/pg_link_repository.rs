//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, code, target_url, title, click_count, created_at, updated_at";

/// Row shape of the `links` table.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    target_url: String,
    title: Option<String>,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.code,
            r.target_url,
            r.title,
            r.click_count,
            r.created_at,
            r.updated_at,
        )
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses bound parameters throughout. The `links_code_key` unique constraint
/// is the final word on code uniqueness; click increments are a single
/// `UPDATE ... SET click_count = click_count + 1` statement.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (code, target_url, title)
            VALUES ($1, $2, $3)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.code)
        .bind(&new_link.target_url)
        .bind(&new_link.title)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict { .. } => AppError::conflict(
                "Short code already exists",
                json!({ "code": new_link.code }),
            ),
            other => other,
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Link, AppError> {
        let (set_title, title) = match patch.title {
            Some(title) => (true, title),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET target_url = COALESCE($2, target_url),
                title = CASE WHEN $3 THEN $4 ELSE title END,
                updated_at = NOW()
            WHERE code = $1
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(&patch.target_url)
        .bind(set_title)
        .bind(&title)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from).ok_or_else(|| link_not_found(code))
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(link_not_found(code));
        }

        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
