use crate::error::AppError;

/// Which record store backs the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store; contents are lost on restart.
    Memory,
    /// SeaORM over Postgres.
    Postgres { url: String },
    /// SeaORM over SQLite (file or `sqlite::memory:`).
    Sqlite { url: String },
}

impl StoreBackend {
    /// Resolve from `STORE_BACKEND` and `DATABASE_URL` values.
    pub fn resolve(kind: Option<&str>, database_url: Option<&str>) -> Result<Self, AppError> {
        let kind = kind.map(str::trim).unwrap_or("memory").to_ascii_lowercase();

        let url = || {
            database_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::config(format!(
                        "DATABASE_URL must be set when STORE_BACKEND={kind}"
                    ))
                })
        };

        match kind.as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" => Ok(StoreBackend::Postgres { url: url()? }),
            "sqlite" => Ok(StoreBackend::Sqlite { url: url()? }),
            other => Err(AppError::config(format!(
                "STORE_BACKEND must be one of memory, postgres, sqlite; got '{other}'"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres { .. } => "postgres",
            StoreBackend::Sqlite { .. } => "sqlite",
        }
    }
}
