//! Tests for MailService

use std::sync::Arc;

use serde_json::json;

use mog::application::ApplicationError;
use mog::config::Settings;
use mog::domain::{DomainError, OutgoingMail};
use mog::infrastructure::di::ServiceContainer;
use mog::infrastructure::traits::RealFileSystem;
use mog::util::testing::{init_test_setup, FakeGraphClient};

fn container(fake: &Arc<FakeGraphClient>) -> ServiceContainer {
    init_test_setup();
    ServiceContainer::with_deps(Settings::default(), fake.clone(), Arc::new(RealFileSystem))
}

// ============================================================
// list() tests
// ============================================================

#[test]
fn given_inbox_when_list_then_newest_first_with_page_size() {
    // Arrange
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/mailFolders/inbox/messages",
        json!({
            "value": [
                {"id": "m1", "subject": "Quarterly numbers", "isRead": false,
                 "from": {"emailAddress": {"name": "Ann", "address": "ann@example.com"}},
                 "receivedDateTime": "2024-05-01T08:30:00Z"},
                {"id": "m2", "subject": "Lunch?", "isRead": true}
            ]
        }),
    );
    let c = container(&fake);

    // Act
    let messages = c.mail().list("inbox", None, false).unwrap();

    // Assert
    assert_eq!(messages.value.len(), 2);
    assert_eq!(messages.value[0].sender(), "Ann <ann@example.com>");
    assert!(!messages.has_more());

    let req = fake.last_request().unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(req.query_value("$top"), Some("25"));
    assert_eq!(req.query_value("$orderby"), Some("receivedDateTime desc"));
    assert_eq!(req.query_value("$filter"), None);
}

#[test]
fn given_unread_only_when_list_then_filters_on_is_read() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/mailFolders/sentitems/messages",
        json!({"value": [], "@odata.nextLink": "https://graph/next"}),
    );
    let c = container(&fake);

    let messages = c.mail().list("sentitems", Some(5), true).unwrap();

    assert!(messages.value.is_empty());
    assert!(messages.has_more());
    let req = fake.last_request().unwrap();
    assert_eq!(req.query_value("$top"), Some("5"));
    assert!(req
        .query_value("$filter")
        .unwrap()
        .ends_with("isRead eq false"));
}

#[test]
fn given_graph_error_when_list_then_operation_failed_with_graph_message() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_error(
        "GET",
        "/me/mailFolders/inbox/messages",
        401,
        "InvalidAuthenticationToken",
        "Access token has expired.",
    );
    let c = container(&fake);

    let err = c.mail().list("inbox", None, false).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    let msg = err.to_string();
    assert!(msg.starts_with("list messages: "), "{}", msg);
    assert!(msg.contains("401"), "{}", msg);
    assert!(msg.contains("Access token has expired."), "{}", msg);
}

// ============================================================
// get() / delete() tests
// ============================================================

#[test]
fn given_id_with_reserved_chars_when_get_then_id_is_encoded() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/messages/AAMk%2Fx%3D",
        json!({"id": "AAMk/x=", "subject": "Hi", "body": {"contentType": "text", "content": "Hello"}}),
    );
    let c = container(&fake);

    let message = c.mail().get("AAMk/x=").unwrap();

    assert_eq!(message.id, "AAMk/x=");
    assert_eq!(message.body.unwrap().content, "Hello");
}

#[test]
fn given_blank_id_when_delete_then_rejected_without_request() {
    let fake = Arc::new(FakeGraphClient::new());
    let c = container(&fake);

    let err = c.mail().delete("   ").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::EmptyValue("id"))
    ));
    assert!(fake.requests().is_empty());
}

#[test]
fn given_message_when_delete_then_issues_delete() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_empty("DELETE", "/me/messages/m1");
    let c = container(&fake);

    c.mail().delete("m1").unwrap();

    assert_eq!(fake.last_request().unwrap().method, "DELETE");
}

// ============================================================
// send() tests
// ============================================================

#[test]
fn given_valid_mail_when_send_then_posts_send_mail_body() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_empty("POST", "/me/sendMail");
    let c = container(&fake);
    let mail = OutgoingMail::new(
        &["bob@example.com".to_string()],
        &["carol@example.com".to_string()],
        "Status",
        "All green.",
    )
    .unwrap();

    c.mail().send(&mail).unwrap();

    let body = fake.last_request().unwrap().body.unwrap();
    assert_eq!(body["saveToSentItems"], true);
    assert_eq!(body["message"]["subject"], "Status");
    assert_eq!(body["message"]["body"]["contentType"], "text");
    assert_eq!(
        body["message"]["toRecipients"][0]["emailAddress"]["address"],
        "bob@example.com"
    );
    assert_eq!(
        body["message"]["ccRecipients"][0]["emailAddress"]["address"],
        "carol@example.com"
    );
}
