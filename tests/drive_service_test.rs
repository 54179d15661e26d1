//! Tests for DriveService and DocumentService downloads

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use mog::application::ApplicationError;
use mog::config::Settings;
use mog::domain::{DocumentKind, DomainError, DrivePath, SIMPLE_UPLOAD_LIMIT};
use mog::infrastructure::di::ServiceContainer;
use mog::infrastructure::traits::RealFileSystem;
use mog::util::testing::{init_test_setup, FakeGraphClient};

fn container(fake: &Arc<FakeGraphClient>) -> ServiceContainer {
    init_test_setup();
    ServiceContainer::with_deps(Settings::default(), fake.clone(), Arc::new(RealFileSystem))
}

// ============================================================
// list() / get() tests
// ============================================================

#[test]
fn given_root_when_list_then_requests_root_children() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/drive/root/children",
        json!({"value": [
            {"id": "1", "name": "Documents", "folder": {"childCount": 4}},
            {"id": "2", "name": "notes.txt", "size": 12, "file": {"mimeType": "text/plain"}}
        ]}),
    );
    let c = container(&fake);

    let items = c.drive().list(&DrivePath::root()).unwrap();

    assert_eq!(items.value.len(), 2);
    assert!(items.value[0].is_folder());
    assert!(!items.value[1].is_folder());
}

#[test]
fn given_nested_path_with_spaces_when_get_then_segments_encoded() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "GET",
        "/me/drive/root:/My%20Files/q1%20report.docx:",
        json!({"id": "9", "name": "q1 report.docx",
               "parentReference": {"path": "/drive/root:/My Files"}}),
    );
    let c = container(&fake);

    let item = c.drive().get(&DrivePath::parse("/My Files/q1 report.docx")).unwrap();

    assert_eq!(item.drive_path(), "My Files/q1 report.docx");
}

// ============================================================
// download() tests
// ============================================================

#[test]
fn given_file_when_download_to_dest_then_bytes_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("nested/dir/out.txt");
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_bytes("GET", "/me/drive/root:/notes.txt:/content", b"hello drive");
    let c = container(&fake);

    // Act
    let download = c
        .drive()
        .download(&DrivePath::parse("notes.txt"), Some(&dest))
        .unwrap();

    // Assert
    assert_eq!(download.path, dest);
    assert_eq!(download.bytes, 11);
    assert_eq!(std::fs::read(&dest).unwrap(), b"hello drive");
}

#[test]
fn given_root_when_download_then_rejected() {
    let fake = Arc::new(FakeGraphClient::new());
    let c = container(&fake);

    let err = c.drive().download(&DrivePath::root(), None).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::EmptyValue("path"))
    ));
    assert!(fake.requests().is_empty());
}

#[test]
fn given_wrong_extension_when_document_download_then_rejected_before_request() {
    let fake = Arc::new(FakeGraphClient::new());
    let c = container(&fake);

    let err = c
        .documents()
        .download(DocumentKind::Word, &DrivePath::parse("deck.pptx"), None)
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::WrongDocumentKind { .. })
    ));
    assert!(fake.requests().is_empty());
}

// ============================================================
// upload() tests
// ============================================================

#[test]
fn given_small_file_when_upload_to_folder_then_put_to_folder_with_local_name() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("notes.txt");
    std::fs::write(&local, "remember the milk").unwrap();
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "PUT",
        "/me/drive/root:/Documents/notes.txt:/content",
        json!({"id": "u1", "name": "notes.txt", "size": 17}),
    );
    let c = container(&fake);

    let item = c.drive().upload(&local, Some("Documents/")).unwrap();

    assert_eq!(item.id, "u1");
    let body = fake.last_request().unwrap().body.unwrap();
    assert_eq!(body["length"], 17);
    assert_eq!(body["contentType"], "application/octet-stream");
}

#[test]
fn given_file_over_limit_when_upload_then_rejected_without_request() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("big.bin");
    let file = std::fs::File::create(&local).unwrap();
    file.set_len(SIMPLE_UPLOAD_LIMIT + 1).unwrap();
    let fake = Arc::new(FakeGraphClient::new());
    let c = container(&fake);

    let err = c.drive().upload(&local, None).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::UploadTooLarge { .. })
    ));
    assert!(fake.requests().is_empty());
}

#[test]
fn given_missing_local_file_when_upload_then_io_context_names_path() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("absent.txt");
    let fake = Arc::new(FakeGraphClient::new());
    let c = container(&fake);

    let err = c.drive().upload(&local, None).unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("absent.txt"), "{}", msg);
}

// ============================================================
// mkdir() / remove() tests
// ============================================================

#[test]
fn given_nested_folder_when_mkdir_then_posts_to_parent_children() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_json(
        "POST",
        "/me/drive/root:/Documents:/children",
        json!({"id": "f1", "name": "Invoices", "folder": {"childCount": 0}}),
    );
    let c = container(&fake);

    let folder = c.drive().mkdir(&DrivePath::parse("Documents/Invoices")).unwrap();

    assert!(folder.is_folder());
    let body = fake.last_request().unwrap().body.unwrap();
    assert_eq!(body["name"], "Invoices");
    assert_eq!(body["@microsoft.graph.conflictBehavior"], "fail");
}

#[test]
fn given_root_when_remove_then_refused() {
    let fake = Arc::new(FakeGraphClient::new());
    let c = container(&fake);

    assert!(c.drive().remove(&DrivePath::parse("/")).is_err());
    assert!(fake.requests().is_empty());
}

#[test]
fn given_item_when_remove_then_deletes_item_url() {
    let fake = Arc::new(FakeGraphClient::new());
    fake.respond_empty("DELETE", "/me/drive/root:/old.txt:");
    let c = container(&fake);

    c.drive().remove(&DrivePath::parse("old.txt")).unwrap();

    let req = fake.last_request().unwrap();
    assert_eq!(req.method, "DELETE");
    assert_eq!(req.path, "/me/drive/root:/old.txt:");
}
