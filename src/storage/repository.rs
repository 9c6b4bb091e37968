use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool, SqliteRow};
use sqlx::{Row, Transaction};
use tracing::{debug, info};

use crate::domain::{Amount, OrphanCount, SEED_MATERIAL_TYPES, parse_amount};

use super::MIGRATION_001_INITIAL;

const SCHEMA_VERSION_INITIAL: i64 = 1;
const SCHEMA_VERSION_SEED_TYPES: i64 = 2;

/// Foreign keys checked by the integrity report.
const ORPHAN_QUERIES: [(&str, &str); 9] = [
    (
        "jobs.client_account_id -> clients",
        "SELECT COUNT(*) AS count FROM jobs j WHERE NOT EXISTS (SELECT 1 FROM clients c WHERE c.account_id = j.client_account_id)",
    ),
    (
        "jobs.crew_id -> work_crews",
        "SELECT COUNT(*) AS count FROM jobs j WHERE j.crew_id IS NOT NULL AND NOT EXISTS (SELECT 1 FROM work_crews w WHERE w.crew_id = j.crew_id)",
    ),
    (
        "inventory.assigned_job_id -> jobs",
        "SELECT COUNT(*) AS count FROM inventory i WHERE i.assigned_job_id IS NOT NULL AND NOT EXISTS (SELECT 1 FROM jobs j WHERE j.job_id = i.assigned_job_id)",
    ),
    (
        "estimates.client_id -> clients",
        "SELECT COUNT(*) AS count FROM estimates e WHERE NOT EXISTS (SELECT 1 FROM clients c WHERE c.account_id = e.client_id)",
    ),
    (
        "estimate_materials.estimate_id -> estimates",
        "SELECT COUNT(*) AS count FROM estimate_materials m WHERE NOT EXISTS (SELECT 1 FROM estimates e WHERE e.estimate_id = m.estimate_id)",
    ),
    (
        "materials.type_id -> material_types",
        "SELECT COUNT(*) AS count FROM materials m WHERE NOT EXISTS (SELECT 1 FROM material_types t WHERE t.type_id = m.type_id)",
    ),
    (
        "materials.vendor_id -> vendors",
        "SELECT COUNT(*) AS count FROM materials m WHERE m.vendor_id IS NOT NULL AND NOT EXISTS (SELECT 1 FROM vendors v WHERE v.vendor_id = m.vendor_id)",
    ),
    (
        "crew_members.crew_id -> work_crews",
        "SELECT COUNT(*) AS count FROM crew_members cm WHERE NOT EXISTS (SELECT 1 FROM work_crews w WHERE w.crew_id = cm.crew_id)",
    ),
    (
        "crew_members.employee_id -> employees",
        "SELECT COUNT(*) AS count FROM crew_members cm WHERE NOT EXISTS (SELECT 1 FROM employees e WHERE e.employee_id = cm.employee_id)",
    ),
];

/// Owns the SQLite pool. Queries themselves live in the per-table modules
/// and run on a borrowed connection, so a caller can group several of them
/// in one transaction.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Bring the schema up to date. Each migration runs at most once; the
    /// applied versions are recorded in `schema_migrations`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (version INTEGER PRIMARY KEY, applied_at TEXT NOT NULL)",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create schema_migrations")?;

        let mut tx = self.begin().await?;

        if !is_applied(&mut tx, SCHEMA_VERSION_INITIAL).await? {
            sqlx::query(MIGRATION_001_INITIAL)
                .execute(&mut *tx)
                .await
                .context("Failed to run migration 001")?;
            mark_applied(&mut tx, SCHEMA_VERSION_INITIAL).await?;
            info!(version = SCHEMA_VERSION_INITIAL, "applied schema migration");
        }

        if !is_applied(&mut tx, SCHEMA_VERSION_SEED_TYPES).await? {
            for name in SEED_MATERIAL_TYPES {
                sqlx::query("INSERT OR IGNORE INTO material_types (name) VALUES (?)")
                    .bind(name)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to seed material types")?;
            }
            mark_applied(&mut tx, SCHEMA_VERSION_SEED_TYPES).await?;
            info!(version = SCHEMA_VERSION_SEED_TYPES, "seeded material types");
        }

        Self::commit(tx).await?;
        debug!("schema is up to date");
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Start a transaction. Dropping it without [`Repository::commit`] rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool.begin().await.context("Failed to begin transaction")
    }

    pub async fn commit(tx: Transaction<'static, Sqlite>) -> Result<()> {
        tx.commit().await.context("Failed to commit transaction")
    }

    /// Borrow a pooled connection for read-only work.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .context("Failed to acquire connection")
    }

    /// Count rows with dangling foreign keys, per relation.
    pub async fn orphan_counts(conn: &mut SqliteConnection) -> Result<Vec<OrphanCount>> {
        let mut counts = Vec::with_capacity(ORPHAN_QUERIES.len());
        for (relation, sql) in ORPHAN_QUERIES {
            let count: i64 = sqlx::query(sql)
                .fetch_one(&mut *conn)
                .await
                .with_context(|| format!("Failed to count orphans for {relation}"))?
                .get("count");
            counts.push(OrphanCount { relation, count });
        }
        Ok(counts)
    }
}

async fn is_applied(conn: &mut SqliteConnection, version: i64) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?")
        .bind(version)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to read schema_migrations")?;
    Ok(row.is_some())
}

async fn mark_applied(conn: &mut SqliteConnection, version: i64) -> Result<()> {
    sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
        .bind(version)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *conn)
        .await
        .context("Failed to record migration")?;
    Ok(())
}

// ========================
// Column codecs
// ========================

pub(crate) fn amount_column(row: &SqliteRow, column: &str) -> Result<Amount> {
    let raw: String = row.get(column);
    parse_amount(&raw).with_context(|| format!("Invalid decimal in {column}: {raw}"))
}

pub(crate) fn optional_amount_column(row: &SqliteRow, column: &str) -> Result<Option<Amount>> {
    let raw: Option<String> = row.get(column);
    raw.as_deref()
        .map(parse_amount)
        .transpose()
        .with_context(|| format!("Invalid decimal in {column}"))
}

pub(crate) fn date_column(row: &SqliteRow, column: &str) -> Result<NaiveDate> {
    let raw: String = row.get(column);
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date in {column}: {raw}"))
}

pub(crate) fn optional_date_column(row: &SqliteRow, column: &str) -> Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(column);
    raw.map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("Invalid date in {column}"))
}

pub(crate) fn timestamp_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.get(column);
    Ok(DateTime::parse_from_rfc3339(&raw)
        .with_context(|| format!("Invalid timestamp in {column}: {raw}"))?
        .with_timezone(&Utc))
}

pub(crate) fn amount_param(amount: Amount) -> String {
    amount.to_string()
}

pub(crate) fn optional_amount_param(amount: Option<Amount>) -> Option<String> {
    amount.map(amount_param)
}
