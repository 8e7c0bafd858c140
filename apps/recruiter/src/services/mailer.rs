//! Simulated outbound email. Nothing leaves the process: every "sent" message
//! is recorded in memory and can be looked up by id or recipient.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailRecord {
    pub id: Uuid,
    pub sender: Contact,
    pub recipient: Contact,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailStatus {
    pub id: Uuid,
    pub status: DeliveryStatus,
    pub recipient: String,
    pub sent_at: DateTime<Utc>,
}

pub struct Mailer {
    sender: Contact,
    history: Mutex<Vec<EmailRecord>>,
}

impl Mailer {
    pub fn new(sender_email: &str, sender_name: &str) -> Self {
        Self {
            sender: Contact {
                name: sender_name.to_string(),
                email: sender_email.to_string(),
            },
            history: Mutex::new(Vec::new()),
        }
    }

    /// Records the message as sent and returns its tracking id.
    /// Without a `recipient_name`, the local part of the address is used.
    pub fn send(
        &self,
        recipient_email: &str,
        recipient_name: Option<&str>,
        subject: &str,
        body: &str,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let name = recipient_name
            .map(str::to_string)
            .unwrap_or_else(|| local_part(recipient_email).to_string());

        self.records().push(EmailRecord {
            id,
            sender: self.sender.clone(),
            recipient: Contact {
                name,
                email: recipient_email.to_string(),
            },
            subject: subject.to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
            status: DeliveryStatus::Sent,
        });

        info!("Email {id} sent (simulated) to {recipient_email}: {subject}");
        id
    }

    pub fn status(&self, id: Uuid) -> Option<EmailStatus> {
        self.records()
            .iter()
            .find(|record| record.id == id)
            .map(|record| EmailStatus {
                id,
                status: record.status,
                recipient: record.recipient.email.clone(),
                sent_at: record.sent_at,
            })
    }

    /// All sent messages, oldest first, optionally only those to `recipient_email`.
    pub fn history(&self, recipient_email: Option<&str>) -> Vec<EmailRecord> {
        self.records()
            .iter()
            .filter(|record| recipient_email.map_or(true, |e| record.recipient.email == e))
            .cloned()
            .collect()
    }

    fn records(&self) -> MutexGuard<'_, Vec<EmailRecord>> {
        // A panic mid-push cannot leave a half-written record behind.
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
