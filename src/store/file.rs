use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Contact, DomainError, NewContact};
use crate::store::ContactRepository;

/// Flat-file backend: the whole collection lives in one pretty-printed JSON
/// array on disk, and every operation is a full read-modify-write cycle.
///
/// A single reader/writer lock guards the file at whole-document granularity:
/// reads share, writes exclude. That makes each operation atomic with respect
/// to other calls in this process. External processes touching the same file
/// are out of scope, so there is no advisory file lock and no fsync ordering.
#[derive(Debug)]
pub struct FileContactRepository {
    file_path: PathBuf,
    lock: RwLock<()>,
}

impl FileContactRepository {
    /// Opens the repository, initializing the file with an empty collection
    /// when it does not exist yet.
    pub async fn open(file_path: PathBuf) -> Result<Self, DomainError> {
        let repo = Self {
            file_path,
            lock: RwLock::new(()),
        };

        if !tokio::fs::try_exists(&repo.file_path)
            .await
            .map_err(|err| DomainError::storage(format!("failed to stat contacts file: {err}")))?
        {
            repo.write_contacts(&[]).await?;
        }

        Ok(repo)
    }

    async fn read_contacts(&self) -> Result<Vec<Contact>, DomainError> {
        let data = tokio::fs::read(&self.file_path)
            .await
            .map_err(|err| DomainError::storage(format!("failed to read contacts file: {err}")))?;

        if data.is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&data)
            .map_err(|err| DomainError::storage(format!("failed to parse contacts file: {err}")))
    }

    async fn write_contacts(&self, contacts: &[Contact]) -> Result<(), DomainError> {
        let data = serde_json::to_vec_pretty(contacts)
            .map_err(|err| DomainError::storage(format!("failed to serialize contacts: {err}")))?;

        tokio::fs::write(&self.file_path, data)
            .await
            .map_err(|err| DomainError::storage(format!("failed to write contacts file: {err}")))
    }

    fn next_id(contacts: &[Contact]) -> i64 {
        contacts.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

#[async_trait]
impl ContactRepository for FileContactRepository {
    async fn get_all(&self) -> Result<Vec<Contact>, DomainError> {
        let _shared = self.lock.read().await;
        self.read_contacts().await
    }

    async fn get_by_id(&self, id: i64) -> Result<Contact, DomainError> {
        let _shared = self.lock.read().await;
        let contacts = self.read_contacts().await?;

        contacts
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found(format!("no contact with id {id}")))
    }

    async fn create(&self, contact: NewContact) -> Result<i64, DomainError> {
        let _exclusive = self.lock.write().await;
        let mut contacts = self.read_contacts().await?;

        let id = Self::next_id(&contacts);
        contacts.push(contact.into_contact(id));
        self.write_contacts(&contacts).await?;

        Ok(id)
    }

    async fn update(&self, contact: &Contact) -> Result<(), DomainError> {
        let _exclusive = self.lock.write().await;
        let mut contacts = self.read_contacts().await?;

        let Some(slot) = contacts.iter_mut().find(|c| c.id == contact.id) else {
            return Err(DomainError::not_found(format!(
                "no contact with id {}",
                contact.id
            )));
        };
        *slot = contact.clone();

        self.write_contacts(&contacts).await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let _exclusive = self.lock.write().await;
        let mut contacts = self.read_contacts().await?;

        contacts.retain(|c| c.id != id);
        self.write_contacts(&contacts).await
    }
}
