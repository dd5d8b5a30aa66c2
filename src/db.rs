use crate::config::Config;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

pub struct Database {
    db: LibsqlDatabase,
    conn: Connection,
    conn_lock: Mutex<()>,
    replica: bool,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn is_replica(&self) -> bool {
        self.replica
    }

    pub async fn sync(&self) -> Result<()> {
        if self.replica {
            self.db
                .sync()
                .await
                .map_err(|e| anyhow::anyhow!("sync failed: {}", e))?;
        }
        Ok(())
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    /// Opens the database named in the config, relative to `data_dir`.
    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(cfg.app.get_db());

        let (db, replica) = match cfg.app.replica() {
            Some((url, token)) => {
                tracing::info!("[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.app.sync_interval_seconds);
                let db = Builder::new_synced_database(&path, url.to_string(), token.to_string())
                    .sync_interval(sync_interval)
                    .build()
                    .await?;
                (db, true)
            }
            None => (Builder::new_local(&path).build().await?, false),
        };

        Self::setup(db, replica).await
    }

    /// Opens a plain local database. `":memory:"` gives a throwaway one.
    pub async fn open_local(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new_local(path.as_ref()).build().await?;
        Self::setup(db, false).await
    }

    async fn setup(db: LibsqlDatabase, replica: bool) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        for (filename, sql) in crate::books::migrations() {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database {
            db,
            conn,
            conn_lock: Mutex::new(()),
            replica,
        })
    }

    /// Runs `work` inside a transaction while holding the connection lock.
    ///
    /// Every store operation goes through here: the connection is shared by
    /// all requests, and an open transaction would otherwise absorb
    /// statements issued by other requests in the meantime.
    pub(crate) async fn transaction<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        let _guard = self.conn_lock.lock().await;

        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        match work.await {
            Ok(value) => {
                self.conn.execute("COMMIT", ()).await?;
                Ok(value)
            }
            Err(e) => {
                let _ = self.conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_recorded_once() {
        let db = Database::open_local(":memory:").await.unwrap();
        let conn = db.connection();

        for (filename, sql) in crate::books::migrations() {
            Database::run_migration(conn, filename, sql).await.unwrap();
        }

        let mut rows = conn.query("SELECT COUNT(*) FROM _migrations", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let count: i64 = row.get(0).unwrap();
        assert_eq!(count as usize, SYSTEM_MIGRATIONS.len() + crate::books::migrations().len());
    }

    #[tokio::test]
    async fn test_local_database_is_not_a_replica() {
        let db = Database::open_local(":memory:").await.unwrap();
        assert!(!db.is_replica());
        db.sync().await.unwrap();
    }
}
