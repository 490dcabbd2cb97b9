use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::store::StoreBackend;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::store::{MemoryStore, RecordStore, SeaStore};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

fn db_error(context: &str, e: sea_orm::DbErr) -> AppError {
    warn!(context, error = %e, "database error during bootstrap");
    AppError::from(DomainError::from(e))
}

/// Hide credentials in a connection URL before logging it.
pub fn sanitize_db_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end + 3 => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once attempts are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Open a pooled connection. In-memory SQLite gets a single connection,
/// otherwise every pooled connection would see its own empty database.
pub async fn connect(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(url.to_string());
    options
        .sqlx_logging(false)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5));
    if url.contains(":memory:") || url.contains("mode=memory") {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(10);
    }

    retry_connection(
        || {
            let options = options.clone();
            async move {
                Database::connect(options)
                    .await
                    .map_err(|e| db_error("connect", e))
            }
        },
        CONNECT_ATTEMPTS,
        CONNECT_INTERVAL_MS,
    )
    .await
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(url: &str) -> Result<DatabaseConnection, AppError> {
    info!(url = %sanitize_db_url(url), "connecting to database");
    let conn = connect(url).await?;
    migration::migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| db_error("migrate", e))?;
    Ok(conn)
}

/// Build the record store selected by configuration.
pub async fn open_store(backend: &StoreBackend) -> Result<Arc<dyn RecordStore>, AppError> {
    let store: Arc<dyn RecordStore> = match backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Postgres { url } | StoreBackend::Sqlite { url } => {
            Arc::new(SeaStore::new(bootstrap_db(url).await?))
        }
    };
    info!(store = store.backend_name(), "record store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), AppError> = retry_connection(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AppError::store_unavailable("down")) }
            },
            3,
            1,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = retry_connection(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(AppError::store_unavailable("warming up"))
                    } else {
                        Ok(n)
                    }
                }
            },
            3,
            1,
        )
        .await
        .unwrap();

        assert_eq!(result, 1);
    }

    #[test]
    fn test_sanitize_db_url() {
        assert_eq!(
            sanitize_db_url("postgres://jobs:hunter2@db:5432/jobs"),
            "postgres://***@db:5432/jobs"
        );
        assert_eq!(sanitize_db_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_memory_backend_needs_no_connection() {
        let store = open_store(&StoreBackend::Memory).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_sqlite_memory_bootstraps_schema() {
        let store = open_store(&StoreBackend::Sqlite {
            url: "sqlite::memory:".to_string(),
        })
        .await
        .unwrap();
        assert_eq!(store.backend_name(), "sqlite");
    }
}
