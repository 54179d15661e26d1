//! Tests for ContactsService

use std::sync::Arc;

use serde_json::json;

use mog::config::Settings;
use mog::domain::NewContact;
use mog::infrastructure::di::ServiceContainer;
use mog::infrastructure::traits::RealFileSystem;
use mog::util::testing::{init_test_setup, FakeGraphClient};

fn container(fake: &Arc<FakeGraphClient>, settings: Settings) -> ServiceContainer {
    init_test_setup();
    ServiceContainer::with_deps(settings, fake.clone(), Arc::new(RealFileSystem))
}

#[test]
fn given_page_size_setting_when_list_then_used_as_top() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/contacts",
        json!({"value": [
            {"id": "c1", "displayName": "Ann Lee",
             "emailAddresses": [{"name": "Ann Lee", "address": "ann@example.com"}],
             "businessPhones": ["+1 555 0100"]}
        ]}),
    );
    let settings = Settings {
        page_size: 7,
        ..Settings::default()
    };
    let c = container(&fake, settings);

    let contacts = c.contacts().list(None).unwrap();

    assert_eq!(contacts.value[0].primary_email(), Some("ann@example.com"));
    assert_eq!(contacts.value[0].primary_phone(), Some("+1 555 0100"));
    let req = fake.last_request().unwrap();
    assert_eq!(req.query_value("$top"), Some("7"));
    assert_eq!(req.query_value("$orderby"), Some("displayName"));
}

#[test]
fn given_full_name_when_create_then_given_and_surname_split() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "POST",
        "/me/contacts",
        json!({"id": "c9", "displayName": "Mary Ann Smith"}),
    );
    let c = container(&fake, Settings::default());
    let contact = NewContact::new(
        "Mary Ann  Smith",
        &["mary@example.com".to_string()],
        Some("+44 20 7946 0000"),
    )
    .unwrap();

    let created = c.contacts().create(&contact).unwrap();

    assert_eq!(created.id, "c9");
    let body = fake.last_request().unwrap().body.unwrap();
    assert_eq!(body["givenName"], "Mary Ann");
    assert_eq!(body["surname"], "Smith");
    assert_eq!(body["displayName"], "Mary Ann Smith");
    assert_eq!(body["emailAddresses"][0]["address"], "mary@example.com");
    assert_eq!(body["mobilePhone"], "+44 20 7946 0000");
}

#[test]
fn given_contact_when_get_and_delete_then_same_path() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json("GET", "/me/contacts/c1", json!({"id": "c1"}));
    fake.respond_empty("DELETE", "/me/contacts/c1");
    let c = container(&fake, Settings::default());

    let contact = c.contacts().get("c1").unwrap();
    c.contacts().delete(&contact.id).unwrap();

    let paths: Vec<String> = fake.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/me/contacts/c1", "/me/contacts/c1"]);
}
