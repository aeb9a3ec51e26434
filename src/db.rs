use std::path::Path;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use tracing::info;

use crate::config::{Config, PostgresConfig, SqliteConfig, StoreType};

/// The process-wide database handle. Established once at startup and shared by
/// every repository operation; `None` for the flat-file backend, which owns its
/// own file instead.
#[derive(Clone)]
pub enum DbHandle {
    Sqlite(SqlitePool),
    Postgres(PgPool),
    None,
}

impl DbHandle {
    pub async fn close(&self) {
        match self {
            Self::Sqlite(pool) => {
                info!("closing sqlite database connection");
                pool.close().await;
            }
            Self::Postgres(pool) => {
                info!("closing postgres database connection");
                pool.close().await;
            }
            Self::None => {}
        }
    }
}

/// Establishes the database handle for the configured backend. Relational
/// backends must come up with a verified connection and an executed schema
/// script; any failure here is fatal to startup.
pub async fn connect(config: &Config) -> Result<DbHandle> {
    match config.store.store_type {
        StoreType::Sqlite => {
            let sqlite = config
                .store
                .sqlite
                .as_ref()
                .context("sqlite configuration section is missing")?;
            Ok(DbHandle::Sqlite(connect_sqlite(sqlite).await?))
        }
        StoreType::Postgres => {
            let postgres = config
                .store
                .postgres
                .as_ref()
                .context("postgres configuration section is missing")?;
            Ok(DbHandle::Postgres(connect_postgres(postgres).await?))
        }
        StoreType::Filestore => {
            let filestore = config
                .store
                .filestore
                .as_ref()
                .context("filestore configuration section is missing")?;
            if let Some(dir) = filestore.file_path.parent()
                && !dir.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| {
                        format!("failed to create file store directory {}", dir.display())
                    })?;
            }
            info!(path = %filestore.file_path.display(), "file store connected");
            Ok(DbHandle::None)
        }
    }
}

async fn connect_sqlite(config: &SqliteConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(&config.db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .with_context(|| {
            format!("failed to open sqlite database {}", config.db_path.display())
        })?;

    if let Err(err) = execute_schema(&pool, &config.schema_path).await {
        pool.close().await;
        return Err(err.context("failed to initialize sqlite schema"));
    }

    info!(path = %config.db_path.display(), "sqlite database connected");
    Ok(pool)
}

async fn connect_postgres(config: &PostgresConfig) -> Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.dbname);

    let pool = PgPoolOptions::new()
        .connect_with(options)
        .await
        .with_context(|| {
            format!(
                "failed to open postgres database {}:{}/{}",
                config.host, config.port, config.dbname
            )
        })?;

    // Explicit round-trip before the connection is trusted.
    if let Err(err) = sqlx::query("SELECT 1").execute(&pool).await {
        pool.close().await;
        return Err(anyhow::Error::new(err).context("failed to ping postgres database"));
    }

    if let Err(err) = execute_schema(&pool, &config.schema_path).await {
        pool.close().await;
        return Err(err.context("failed to initialize postgres schema"));
    }

    info!(
        host = %config.host,
        port = config.port,
        dbname = %config.dbname,
        "postgres database connected"
    );
    Ok(pool)
}

/// Reads the schema script from disk and executes it against the pool. The
/// script may hold multiple statements.
async fn execute_schema<'a, DB>(pool: &'a sqlx::Pool<DB>, schema_path: &Path) -> Result<()>
where
    DB: sqlx::Database,
    for<'c> &'c sqlx::Pool<DB>: sqlx::Executor<'c, Database = DB>,
{
    let schema = tokio::fs::read_to_string(schema_path)
        .await
        .with_context(|| format!("failed to read schema file {}", schema_path.display()))?;

    sqlx::raw_sql(&schema)
        .execute(pool)
        .await
        .with_context(|| format!("failed to execute schema {}", schema_path.display()))?;

    Ok(())
}
