//! Contact form route handler.

use axum::{Json, extract::State, http::StatusCode};
use emporium_core::{ContactMessage, ContactRequest};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub id: Uuid,
}

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip(state, form), fields(subject = %form.subject))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let message = ContactMessage::from_request(form)?;
    let contact = state.contacts().receive(message).await;

    add_breadcrumb("contact", "Contact form submitted", None);
    tracing::info!(contact_id = %contact.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            id: contact.id,
        }),
    ))
}
