use sqlx::Sqlite;
use sqlx::Transaction;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{IntegrityReport, build_integrity_report};
use crate::storage::{Repository, estimates};

use super::AppError;

/// Application service over the shop's records. Every client (CLI, HTTP)
/// goes through here.
///
/// Writes are serialised by `write_lock` and each runs in one transaction,
/// so derived values such as estimate totals are always computed against
/// a settled set of rows. Reads go straight to the pool.
pub struct ShopService {
    pub(super) repo: Repository,
    write_lock: Mutex<()>,
}

/// An open write: the lock guard plus the transaction it protects.
/// Dropping it without [`WriteScope::commit`] rolls everything back.
pub(super) struct WriteScope<'a> {
    _guard: MutexGuard<'a, ()>,
    pub tx: Transaction<'static, Sqlite>,
}

impl WriteScope<'_> {
    pub async fn commit(self) -> Result<(), AppError> {
        Repository::commit(self.tx).await?;
        Ok(())
    }
}

impl ShopService {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// Open (creating if needed) the database at the given path and bring
    /// its schema up to date.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database without migrating.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    pub(super) async fn begin_write(&self) -> Result<WriteScope<'_>, AppError> {
        let guard = self.write_lock.lock().await;
        let tx = self.repo.begin().await?;
        Ok(WriteScope { _guard: guard, tx })
    }

    /// Check stored estimate totals against their line items and look for
    /// rows pointing at records that no longer exist.
    pub async fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let mut conn = self.repo.acquire().await?;
        let all = estimates::list(&mut conn).await?;
        let orphans = Repository::orphan_counts(&mut conn).await?;
        Ok(build_integrity_report(&all, &orphans))
    }
}
