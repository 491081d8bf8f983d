use std::path::Path;

use deadpool::managed::{self, Pool, RecycleError, RecycleResult};
use libsql::{Builder, Connection, Database, Error as LibsqlError};

/// How long a connection waits on SQLite's write lock before giving up
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Maximum number of pooled connections
const MAX_CONNECTIONS: usize = 8;

pub struct LibsqlManager {
    database: Database,
}

impl LibsqlManager {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl managed::Manager for LibsqlManager {
    type Type = Connection;
    type Error = LibsqlError;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let conn = self.database.connect()?;
        // SQLite lets one writer in at a time; others wait up to the busy timeout.
        conn.query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"), ()).await?;
        Ok(conn)
    }

    async fn recycle(
        &self,
        conn: &mut Self::Type,
        _: &managed::Metrics,
    ) -> RecycleResult<Self::Error> {
        let row = conn.query("SELECT 1", ()).await?.next().await?;
        match row {
            Some(row) if row.get::<i64>(0)? == 1 => Ok(()),
            _ => Err(RecycleError::Message("connection health check returned no row".into())),
        }
    }
}

pub type LibsqlPool = Pool<LibsqlManager>;

/// Open (or create) the local database file in WAL mode and wrap it in a pool
pub async fn open_pool(path: impl AsRef<Path>) -> anyhow::Result<LibsqlPool> {
    let database = Builder::new_local(path.as_ref()).build().await?;

    {
        let conn = database.connect()?;
        let mut rows = conn.query("PRAGMA journal_mode = WAL", ()).await?;
        if let Some(row) = rows.next().await? {
            let mode: String = row.get(0)?;
            tracing::debug!("SQLite journal mode: {}", mode);
        }
    }

    let pool = Pool::builder(LibsqlManager::new(database)).max_size(MAX_CONNECTIONS).build()?;
    Ok(pool)
}
