use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, StoreType};
use crate::db::DbHandle;
use crate::domain::{Contact, DomainError, NewContact};

pub mod file;
pub mod postgres;
pub mod sqlite;

pub use file::FileContactRepository;
pub use postgres::PostgresContactRepository;
pub use sqlite::SqliteContactRepository;

/// CRUD access to contacts, independent of the backing storage technology.
///
/// Every method is a plain future; dropping it cancels the in-flight driver
/// call, so the caller's deadline travels with the future itself.
#[async_trait]
pub trait ContactRepository: Send + Sync + std::fmt::Debug {
    /// Returns all contacts in backend-native order. The flat-file backend
    /// preserves insertion order; relational backends make no such promise.
    async fn get_all(&self) -> Result<Vec<Contact>, DomainError>;

    /// Fails with `NotFound` when no record has the identifier.
    async fn get_by_id(&self, id: i64) -> Result<Contact, DomainError>;

    /// Persists a new contact and returns the backend-assigned identifier.
    async fn create(&self, contact: NewContact) -> Result<i64, DomainError>;

    /// Overwrites all fields of the record with the contact's identifier.
    /// Fails with `NotFound` when the identifier does not exist.
    async fn update(&self, contact: &Contact) -> Result<(), DomainError>;

    /// Removes the record if present. Deleting an absent identifier is not an
    /// error; this is deliberate and uniform across backends.
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}

/// Builds the repository matching the configured backend. Relational backends
/// require the corresponding live pool in the handle; a mismatch is a
/// configuration error and fatal to startup.
pub async fn new_repository(
    config: &Config,
    handle: DbHandle,
) -> Result<Arc<dyn ContactRepository>, DomainError> {
    match config.store.store_type {
        StoreType::Sqlite => match handle {
            DbHandle::Sqlite(pool) => Ok(Arc::new(SqliteContactRepository::new(pool))),
            _ => Err(DomainError::configuration(
                "database connection required for sqlite store",
            )),
        },
        StoreType::Postgres => match handle {
            DbHandle::Postgres(pool) => Ok(Arc::new(PostgresContactRepository::new(pool))),
            _ => Err(DomainError::configuration(
                "database connection required for postgres store",
            )),
        },
        StoreType::Filestore => {
            let filestore = config.store.filestore.as_ref().ok_or_else(|| {
                DomainError::configuration("filestore configuration section is missing")
            })?;
            let repository = FileContactRepository::open(filestore.file_path.clone()).await?;
            Ok(Arc::new(repository))
        }
    }
}
