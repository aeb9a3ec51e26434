use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Contact, DomainError, NewContact};
use crate::messaging::{EmailMessage, NotificationSender};
use crate::store::ContactRepository;

/// Business logic over the contact repository. Reads and deletes delegate
/// straight through; updates add validation and a best-effort notification
/// when the stored email address changes.
#[derive(Clone)]
pub struct ContactService {
    repository: Arc<dyn ContactRepository>,
    sender: Arc<dyn NotificationSender>,
}

impl ContactService {
    pub fn new(repository: Arc<dyn ContactRepository>, sender: Arc<dyn NotificationSender>) -> Self {
        Self { repository, sender }
    }

    pub async fn get_all(&self) -> Result<Vec<Contact>, DomainError> {
        self.repository.get_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Contact, DomainError> {
        self.repository.get_by_id(id).await
    }

    pub async fn create(&self, contact: NewContact) -> Result<Contact, DomainError> {
        let id = self.repository.create(contact.clone()).await?;
        Ok(contact.into_contact(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.repository.delete(id).await
    }

    /// Updates a contact and, when the email address actually changed,
    /// dispatches a notification to the new address.
    ///
    /// The notification is fire-and-forget: the update reports success as soon
    /// as storage confirms it, and a failed send is logged, never surfaced and
    /// never retried.
    pub async fn update_and_notify(&self, mut contact: Contact) -> Result<Contact, DomainError> {
        debug!(id = contact.id, "updating contact");

        contact.email = contact.email.trim().to_lowercase();
        if !contact.email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        // Fetched before the update so the old email can be compared.
        let old_contact = self
            .repository
            .get_by_id(contact.id)
            .await
            .map_err(|err| DomainError::not_found(format!("contact not found: {err}")))?;

        self.repository.update(&contact).await?;

        if old_contact.email != contact.email {
            let sender = Arc::clone(&self.sender);
            let message = EmailMessage {
                to: contact.email.clone(),
                subject: "Contact Information Updated".to_string(),
                body: format!(
                    "Hi {}, your contact information has been updated.",
                    contact.first_name
                ),
            };
            tokio::spawn(async move {
                if let Err(err) = sender.send(message).await {
                    warn!(error = %err, "failed to send update notification");
                }
            });
        }

        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{Mutex, mpsc};

    use super::*;

    #[derive(Debug)]
    struct InMemoryRepository {
        contacts: Mutex<HashMap<i64, Contact>>,
    }

    impl InMemoryRepository {
        fn new() -> Self {
            Self {
                contacts: Mutex::new(HashMap::new()),
            }
        }

        async fn seed(&self, contact: Contact) {
            self.contacts.lock().await.insert(contact.id, contact);
        }

        async fn stored(&self, id: i64) -> Option<Contact> {
            self.contacts.lock().await.get(&id).cloned()
        }
    }

    #[async_trait]
    impl ContactRepository for InMemoryRepository {
        async fn get_all(&self) -> Result<Vec<Contact>, DomainError> {
            Ok(self.contacts.lock().await.values().cloned().collect())
        }

        async fn get_by_id(&self, id: i64) -> Result<Contact, DomainError> {
            self.contacts
                .lock()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("no contact with id {id}")))
        }

        async fn create(&self, contact: NewContact) -> Result<i64, DomainError> {
            let mut contacts = self.contacts.lock().await;
            let id = contacts.keys().max().copied().unwrap_or(0) + 1;
            contacts.insert(id, contact.into_contact(id));
            Ok(id)
        }

        async fn update(&self, contact: &Contact) -> Result<(), DomainError> {
            let mut contacts = self.contacts.lock().await;
            if !contacts.contains_key(&contact.id) {
                return Err(DomainError::not_found(format!(
                    "no contact with id {}",
                    contact.id
                )));
            }
            contacts.insert(contact.id, contact.clone());
            Ok(())
        }

        async fn delete(&self, id: i64) -> Result<(), DomainError> {
            self.contacts.lock().await.remove(&id);
            Ok(())
        }
    }

    struct RecordingSender {
        sent: mpsc::UnboundedSender<EmailMessage>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
            self.sent.send(message.clone()).ok();
            if self.fail {
                return Err(DomainError::notification("channel unreachable"));
            }
            Ok(())
        }
    }

    fn existing_contact() -> Contact {
        Contact {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    async fn service_with_contact(
        fail_sender: bool,
    ) -> (
        ContactService,
        Arc<InMemoryRepository>,
        mpsc::UnboundedReceiver<EmailMessage>,
    ) {
        let repository = Arc::new(InMemoryRepository::new());
        repository.seed(existing_contact()).await;

        let (tx, rx) = mpsc::unbounded_channel();
        let sender = Arc::new(RecordingSender {
            sent: tx,
            fail: fail_sender,
        });

        let service = ContactService::new(repository.clone(), sender);
        (service, repository, rx)
    }

    #[tokio::test]
    async fn changed_email_sends_one_notification_to_new_address() {
        let (service, _repository, mut rx) = service_with_contact(false).await;

        let mut contact = existing_contact();
        contact.email = "b@x.com".to_string();
        service.update_and_notify(contact).await.expect("update succeeds");

        let message = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("notification arrives")
            .expect("channel open");
        assert_eq!(message.to, "b@x.com");
        assert_eq!(message.subject, "Contact Information Updated");

        // Exactly one.
        assert!(
            tokio::time::timeout(Duration::from_millis(100), rx.recv())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn normalized_unchanged_email_sends_no_notification() {
        let (service, repository, mut rx) = service_with_contact(false).await;

        let mut contact = existing_contact();
        contact.email = "A@X.com ".to_string();
        let updated = service.update_and_notify(contact).await.expect("update succeeds");

        assert_eq!(updated.email, "a@x.com");
        assert_eq!(repository.stored(1).await.unwrap().email, "a@x.com");
        assert!(
            tokio::time::timeout(Duration::from_millis(100), rx.recv())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn unreachable_channel_does_not_affect_update_outcome() {
        let (service, repository, mut rx) = service_with_contact(true).await;

        let mut contact = existing_contact();
        contact.email = "b@x.com".to_string();
        service
            .update_and_notify(contact)
            .await
            .expect("update succeeds despite sender failure");

        assert_eq!(repository.stored(1).await.unwrap().email, "b@x.com");
        // The send was still attempted, addressed to the new email.
        let message = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("send attempted")
            .expect("channel open");
        assert_eq!(message.to, "b@x.com");
    }

    #[tokio::test]
    async fn invalid_email_fails_validation_without_touching_storage() {
        let (service, repository, mut rx) = service_with_contact(false).await;

        let mut contact = existing_contact();
        contact.email = "not-an-email".to_string();
        let err = service.update_and_notify(contact).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(repository.stored(1).await.unwrap().email, "a@x.com");
        assert!(
            tokio::time::timeout(Duration::from_millis(100), rx.recv())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn missing_contact_wraps_as_contact_not_found() {
        let (service, _repository, _rx) = service_with_contact(false).await;

        let mut contact = existing_contact();
        contact.id = 42;
        contact.email = "b@x.com".to_string();
        let err = service.update_and_notify(contact).await.unwrap_err();

        match err {
            DomainError::NotFound(detail) => assert!(detail.contains("contact not found")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_returns_contact_with_assigned_id() {
        let (service, _repository, _rx) = service_with_contact(false).await;

        let created = service
            .create(NewContact {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
            })
            .await
            .expect("create succeeds");

        assert_eq!(created.id, 2);
        assert_eq!(service.get_by_id(2).await.unwrap().email, "grace@example.com");
    }
}
