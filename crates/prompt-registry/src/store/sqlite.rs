//! SQLite storage implementation
//!
//! This module provides the SQLite-backed implementation of the PromptStore
//! trait. All writes run inside a single transaction per call; the pool is
//! capped at one connection so concurrent write transactions serialize on
//! the SQLite handle instead of racing on the current_version read.

use super::PromptStore;
use crate::{RegistryError, entities::*, error::Result, slug::slugify};
use async_trait::async_trait;
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::str::FromStr;
use std::time::Instant;
use time::OffsetDateTime;
use tracing::{debug, info};

/// SQLite-based prompt store
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given database URL and initialize
    /// the schema.
    ///
    /// Example: `sqlite:./data/prompts.db`
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| RegistryError::Storage(format!("invalid database url: {}", e)))?
            .create_if_missing(true);

        // Single connection: SQLite has one writer anyway, and funnelling
        // every transaction through one handle makes the read-compute-write
        // in create_version serializable without busy-retry loops.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to connect to SQLite: {}", e)))?;

        let store = Self { pool };
        store.init_schema().await?;

        info!(url = database_url, "database initialized");
        Ok(store)
    }

    /// Create SQLite store from the DATABASE_URL environment variable.
    pub async fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/prompts.db".to_string());

        Self::new(&database_url).await
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prompts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                slug            TEXT UNIQUE NOT NULL,
                title           TEXT NOT NULL,
                description     TEXT,
                current_version INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to create prompts table: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prompt_versions (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                prompt_id      INTEGER NOT NULL REFERENCES prompts(id),
                version_number INTEGER NOT NULL,
                content        TEXT NOT NULL,
                created_at     TEXT NOT NULL,
                UNIQUE (prompt_id, version_number)
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            RegistryError::Storage(format!("failed to create prompt_versions table: {}", e))
        })?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_prompts_created ON prompts(created_at)")
            .execute(&self.pool)
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to create index: {}", e)))?;

        Ok(())
    }
}

fn format_ts(ts: OffsetDateTime) -> Result<String> {
    ts.format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| RegistryError::Storage(format!("failed to format timestamp: {}", e)))
}

fn parse_ts(s: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
        .map_err(|e| RegistryError::Storage(format!("failed to parse timestamp: {}", e)))
}

fn version_from_row(row: &SqliteRow) -> Result<PromptVersion> {
    let created_at_str: String = row.get("created_at");
    Ok(PromptVersion {
        id: row.get("id"),
        prompt_id: row.get("prompt_id"),
        version_number: row.get("version_number"),
        content: row.get("content"),
        created_at: parse_ts(&created_at_str)?,
    })
}

#[async_trait]
impl PromptStore for SqliteStore {
    async fn create_prompt(&self, input: CreatePromptInput) -> Result<PromptWithCurrentVersion> {
        let start = Instant::now();

        if input.title.trim().is_empty() {
            return Err(RegistryError::validation("title cannot be empty"));
        }
        if input.content.trim().is_empty() {
            return Err(RegistryError::validation("content cannot be empty"));
        }

        let slug = match input.slug.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slugify(&input.title),
        };

        let now = OffsetDateTime::now_utc();
        let ts = format_ts(now)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to begin transaction: {}", e)))?;

        let prompt_result = sqlx::query(
            r#"
            INSERT INTO prompts (slug, title, description, current_version, created_at, updated_at)
            VALUES (?, ?, ?, 0, ?, ?)
        "#,
        )
        .bind(&slug)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&ts)
        .bind(&ts)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RegistryError::SlugConflict(slug.clone())
            }
            _ => RegistryError::Storage(format!("failed to insert prompt: {}", e)),
        })?;

        let prompt_id = prompt_result.last_insert_rowid();

        let version_result = sqlx::query(
            r#"
            INSERT INTO prompt_versions (prompt_id, version_number, content, created_at)
            VALUES (?, 1, ?, ?)
        "#,
        )
        .bind(prompt_id)
        .bind(&input.content)
        .bind(&ts)
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to insert version: {}", e)))?;

        let version_id = version_result.last_insert_rowid();

        sqlx::query("UPDATE prompts SET current_version = 1 WHERE id = ?")
            .bind(prompt_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to update prompt: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to commit transaction: {}", e)))?;

        info!(
            slug = %slug,
            prompt_id,
            duration_ms = start.elapsed().as_millis() as u64,
            "prompt created"
        );

        Ok(PromptWithCurrentVersion {
            slug,
            title: input.title,
            description: input.description,
            current_version: PromptVersion {
                id: version_id,
                prompt_id,
                version_number: 1,
                content: input.content,
                created_at: now,
            },
        })
    }

    async fn create_version(
        &self,
        slug: &str,
        input: CreateVersionInput,
    ) -> Result<PromptWithCurrentVersion> {
        let start = Instant::now();

        if input.content.trim().is_empty() {
            return Err(RegistryError::validation("content cannot be empty"));
        }

        let now = OffsetDateTime::now_utc();
        let ts = format_ts(now)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to begin transaction: {}", e)))?;

        let prompt_row = sqlx::query(
            "SELECT id, title, description, current_version FROM prompts WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to get prompt: {}", e)))?
        .ok_or_else(|| RegistryError::PromptNotFound(slug.to_string()))?;

        let prompt_id: i64 = prompt_row.get("id");
        let title: String = prompt_row.get("title");
        let description: Option<String> = prompt_row.get("description");
        let current_version: i64 = prompt_row.get("current_version");
        let next_version = current_version + 1;

        let version_result = sqlx::query(
            r#"
            INSERT INTO prompt_versions (prompt_id, version_number, content, created_at)
            VALUES (?, ?, ?, ?)
        "#,
        )
        .bind(prompt_id)
        .bind(next_version)
        .bind(&input.content)
        .bind(&ts)
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to insert version: {}", e)))?;

        let version_id = version_result.last_insert_rowid();

        // Guarded advance: if another writer moved current_version since the
        // read above, zero rows match and the transaction rolls back instead
        // of leaving a gap or duplicate in the ledger.
        let update_result = sqlx::query(
            r#"
            UPDATE prompts SET current_version = ?, updated_at = ?
            WHERE id = ? AND current_version = ?
        "#,
        )
        .bind(next_version)
        .bind(&ts)
        .bind(prompt_id)
        .bind(current_version)
        .execute(&mut *tx)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to update prompt: {}", e)))?;

        if update_result.rows_affected() == 0 {
            return Err(RegistryError::Storage(format!(
                "concurrent version write detected for prompt {:?}",
                slug
            )));
        }

        tx.commit()
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to commit transaction: {}", e)))?;

        info!(
            slug = %slug,
            version = next_version,
            duration_ms = start.elapsed().as_millis() as u64,
            "version created"
        );

        Ok(PromptWithCurrentVersion {
            slug: slug.to_string(),
            title,
            description,
            current_version: PromptVersion {
                id: version_id,
                prompt_id,
                version_number: next_version,
                content: input.content,
                created_at: now,
            },
        })
    }

    async fn get_prompt(&self, slug: &str) -> Result<PromptWithCurrentVersion> {
        let row = sqlx::query(
            r#"
            SELECT
                p.slug, p.title, p.description,
                pv.id, pv.prompt_id, pv.version_number, pv.content, pv.created_at
            FROM prompts p
            JOIN prompt_versions pv
                ON pv.prompt_id = p.id AND pv.version_number = p.current_version
            WHERE p.slug = ?
        "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to get prompt: {}", e)))?;

        let row = match row {
            Some(row) => row,
            None => {
                // Distinguish an unknown slug from a prompt whose
                // current_version points at a missing ledger entry. The
                // latter violates the append-together invariant and is an
                // internal failure, not a NotFound.
                let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompts WHERE slug = ?")
                    .bind(slug)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| RegistryError::Storage(format!("failed to get prompt: {}", e)))?;

                if exists > 0 {
                    return Err(RegistryError::Storage(format!(
                        "prompt {:?} has no version matching its current_version",
                        slug
                    )));
                }
                return Err(RegistryError::PromptNotFound(slug.to_string()));
            }
        };

        debug!(slug = %slug, "prompt fetched");

        Ok(PromptWithCurrentVersion {
            slug: row.get("slug"),
            title: row.get("title"),
            description: row.get("description"),
            current_version: version_from_row(&row)?,
        })
    }

    async fn get_version(&self, slug: &str, version: i64) -> Result<PromptVersion> {
        let row = sqlx::query(
            r#"
            SELECT pv.id, pv.prompt_id, pv.version_number, pv.content, pv.created_at
            FROM prompt_versions pv
            JOIN prompts p ON p.id = pv.prompt_id
            WHERE p.slug = ? AND pv.version_number = ?
        "#,
        )
        .bind(slug)
        .bind(version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to get version: {}", e)))?
        .ok_or_else(|| RegistryError::VersionNotFound {
            slug: slug.to_string(),
            version,
        })?;

        version_from_row(&row)
    }

    async fn list_prompts(&self, limit: i64, offset: i64) -> Result<Vec<PromptSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT slug, title, description, current_version, created_at, updated_at
            FROM prompts
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
        "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to list prompts: {}", e)))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at_str: String = row.get("created_at");
            let updated_at_str: String = row.get("updated_at");
            summaries.push(PromptSummary {
                slug: row.get("slug"),
                title: row.get("title"),
                description: row.get("description"),
                current_version: row.get("current_version"),
                created_at: parse_ts(&created_at_str)?,
                updated_at: parse_ts(&updated_at_str)?,
            });
        }

        debug!(limit, offset, rows = summaries.len(), "prompts listed");
        Ok(summaries)
    }

    async fn list_versions(&self, slug: &str) -> Result<Vec<PromptVersion>> {
        let prompt_id: i64 = sqlx::query_scalar("SELECT id FROM prompts WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to get prompt: {}", e)))?
            .ok_or_else(|| RegistryError::PromptNotFound(slug.to_string()))?;

        let rows = sqlx::query(
            r#"
            SELECT id, prompt_id, version_number, content, created_at
            FROM prompt_versions
            WHERE prompt_id = ?
            ORDER BY version_number ASC
        "#,
        )
        .bind(prompt_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RegistryError::Storage(format!("failed to list versions: {}", e)))?;

        let mut versions = Vec::with_capacity(rows.len());
        for row in &rows {
            versions.push(version_from_row(row)?);
        }

        debug!(slug = %slug, rows = versions.len(), "versions listed");
        Ok(versions)
    }

    async fn stats(&self) -> Result<RegistryStats> {
        let total_prompts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to count prompts: {}", e)))?;

        let total_prompt_versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompt_versions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RegistryError::Storage(format!("failed to count versions: {}", e)))?;

        Ok(RegistryStats {
            total_prompts,
            total_prompt_versions,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("database closed");
    }
}
