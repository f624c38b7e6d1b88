//! Integration tests for the contact form.

use axum::http::StatusCode;
use emporium_integration_tests::TestContext;
use serde_json::json;

fn contact_form() -> serde_json::Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "company": "Analytical Engines",
        "subject": "Bulk order",
        "message": "Do you ship lamps by the dozen?"
    })
}

#[tokio::test]
async fn test_contact_form_accepted() {
    let mut ctx = TestContext::new().unwrap();
    let resp = ctx.post("/api/contact", contact_form()).await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["success"], true);
    assert!(resp.body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_contact_form_rejects_bad_email() {
    let mut ctx = TestContext::new().unwrap();
    let mut form = contact_form();
    form["email"] = json!("ada.example.com");

    let resp = ctx.post("/api/contact", form).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_contact_form_requires_message() {
    let mut ctx = TestContext::new().unwrap();
    let mut form = contact_form();
    form["message"] = json!("   ");

    let resp = ctx.post("/api/contact", form).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "message is required");
}
