// src/db/log_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::logs::{LogEntry, LogLevel, LogSource, NewLogEntry},
};

#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &NewLogEntry) -> Result<(), AppError> {
        let ctx = &entry.context;
        sqlx::query(
            r#"
            INSERT INTO logs (
                level, source, message, details,
                user_id, request_id, user_agent, ip_address, stack_trace
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.level)
        .bind(entry.source)
        .bind(&entry.message)
        .bind(&ctx.details)
        .bind(ctx.user_id)
        .bind(&ctx.request_id)
        .bind(&ctx.user_agent)
        .bind(&ctx.ip_address)
        .bind(&ctx.stack_trace)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list(
        &self,
        limit: i64,
        level: Option<LogLevel>,
        source: Option<LogSource>,
    ) -> Result<Vec<LogEntry>, AppError> {
        let logs = sqlx::query_as::<_, LogEntry>(
            r#"
            SELECT * FROM logs
            WHERE ($2::log_level IS NULL OR level = $2)
              AND ($3::log_source IS NULL OR source = $3)
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .bind(level)
        .bind(source)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    pub async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
