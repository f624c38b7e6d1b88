//! Contact form submissions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ContactPriority, ContactStatus, Email, EmailError};

/// Why a contact form was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// The contact form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A validated contact message, trimmed, with its initial triage state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
}

impl ContactMessage {
    /// Validate a submitted form.
    ///
    /// Name, subject and message must be non-blank and the email must
    /// parse. Blank optional fields are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, checking fields in form order.
    pub fn from_request(request: ContactRequest) -> Result<Self, ContactError> {
        let name = required(&request.name, "name")?;
        let email = Email::parse(&request.email)?;
        let subject = required(&request.subject, "subject")?;
        let message = required(&request.message, "message")?;

        Ok(Self {
            name,
            email,
            company: optional(request.company),
            phone: optional(request.phone),
            subject,
            message,
            status: ContactStatus::default(),
            priority: ContactPriority::default(),
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ContactError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ContactError::MissingField(field))
    } else {
        Ok(value.to_owned())
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
