//! Contact message inbox.
//!
//! Submitted messages are kept in process memory for the support team.

use chrono::{DateTime, Utc};
use emporium_core::ContactMessage;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A contact message as received.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub message: ContactMessage,
}

/// Received contact messages, oldest first.
#[derive(Debug, Default)]
pub struct ContactInbox {
    contacts: RwLock<Vec<Contact>>,
}

impl ContactInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message, assigning it an id and timestamp.
    pub async fn receive(&self, message: ContactMessage) -> Contact {
        let contact = Contact {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            message,
        };
        self.contacts.write().await.push(contact.clone());
        contact
    }

    /// Every message received so far.
    pub async fn all(&self) -> Vec<Contact> {
        self.contacts.read().await.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use emporium_core::ContactRequest;

    use super::*;

    fn message(subject: &str) -> ContactMessage {
        ContactMessage::from_request(ContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: subject.to_string(),
            message: "Hello".to_string(),
            ..ContactRequest::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_receive_assigns_ids_in_order() {
        let inbox = ContactInbox::new();
        let first = inbox.receive(message("first")).await;
        let second = inbox.receive(message("second")).await;
        assert_ne!(first.id, second.id);

        let all = inbox.all().await;
        let subjects: Vec<_> = all.iter().map(|c| c.message.subject.as_str()).collect();
        assert_eq!(subjects, ["first", "second"]);
    }
}
