//! Tests for OneNoteService

use std::sync::Arc;

use serde_json::json;

use mog::config::Settings;
use mog::infrastructure::di::ServiceContainer;
use mog::infrastructure::traits::RealFileSystem;
use mog::util::testing::{init_test_setup, FakeGraphClient};

fn container(fake: &Arc<FakeGraphClient>) -> ServiceContainer {
    init_test_setup();
    ServiceContainer::with_deps(Settings::default(), fake.clone(), Arc::new(RealFileSystem))
}

#[test]
fn given_notebooks_when_list_then_ordered_by_name() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/onenote/notebooks",
        json!({"value": [{"id": "n1", "displayName": "Work"}]}),
    );
    let c = container(&fake);

    let notebooks = c.onenote().notebooks().unwrap();

    assert_eq!(notebooks.value[0].display_name, "Work");
    assert!(notebooks.value[0].sections.is_empty());
    let req = fake.last_request().unwrap();
    assert_eq!(req.query_value("$orderby"), Some("displayName"));
    assert_eq!(req.query_value("$expand"), None);
}

#[test]
fn given_notebook_when_sections_and_pages_then_walks_hierarchy() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/onenote/notebooks/n1/sections",
        json!({"value": [{"id": "s1", "displayName": "Meetings"}]}),
    );
    fake.respond_json(
        "GET",
        "/me/onenote/sections/s1/pages",
        json!({"value": [{"id": "p1", "title": "Kickoff", "createdDateTime": "2024-01-08T10:00:00Z"}]}),
    );
    let c = container(&fake);

    let sections = c.onenote().sections("n1").unwrap();
    let pages = c.onenote().pages(&sections.value[0].id).unwrap();

    assert_eq!(pages.value[0].title.as_deref(), Some("Kickoff"));
    assert_eq!(
        fake.last_request().unwrap().query_value("$orderby"),
        Some("createdDateTime desc")
    );
}

#[test]
fn given_page_when_content_then_returns_html() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_bytes(
        "GET",
        "/me/onenote/pages/p1/content",
        b"<html><body><p>Agenda</p></body></html>",
    );
    let c = container(&fake);

    let html = c.onenote().page_content("p1").unwrap();

    assert!(html.contains("<p>Agenda</p>"));
}

#[test]
fn given_tree_when_requested_then_sections_expanded_in_one_call() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/onenote/notebooks",
        json!({"value": [
            {"id": "n1", "displayName": "Work", "sections": [
                {"id": "s1", "displayName": "Meetings"},
                {"id": "s2", "displayName": "Ideas"}
            ]}
        ]}),
    );
    let c = container(&fake);

    let tree = c.onenote().tree().unwrap();

    assert_eq!(tree.value[0].sections.len(), 2);
    assert_eq!(fake.requests().len(), 1);
    assert_eq!(
        fake.last_request().unwrap().query_value("$expand"),
        Some("sections($select=id,displayName)")
    );
}
