mod common;

use mockito::{Matcher, Server};
use recipe_sheets::google::DriveFile;
use recipe_sheets::CatalogError;
use serde_json::json;

const FILES: &str = "/drive/v3/files";
const FIRST_PAGE: &str = r"^q=[^&]*&pageSize=10&fields=[^&]*$";

fn files(range: std::ops::Range<usize>) -> Vec<serde_json::Value> {
    range
        .map(|i| {
            json!({
                "id": format!("file-{}", i),
                "name": format!("Recette {}", i),
                "mimeType": "application/vnd.google-apps.spreadsheet"
            })
        })
        .collect()
}

#[test]
fn test_list_files_follows_page_tokens() {
    let mut server = Server::new();
    let first = server
        .mock("GET", FILES)
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex(FIRST_PAGE.into()),
            Matcher::UrlEncoded("q".into(), "'folder-1' in parents and trashed = false".into()),
            Matcher::UrlEncoded("fields".into(), "nextPageToken, files(id, name, mimeType)".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"nextPageToken": "page-2", "files": files(0..10)}).to_string())
        .expect(1)
        .create();
    let second = server
        .mock("GET", FILES)
        .match_query(Matcher::UrlEncoded("pageToken".into(), "page-2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"nextPageToken": "page-3", "files": files(10..20)}).to_string())
        .expect(1)
        .create();
    let third = server
        .mock("GET", FILES)
        .match_query(Matcher::UrlEncoded("pageToken".into(), "page-3".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"files": files(20..25)}).to_string())
        .expect(1)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let api = common::connect(&server.url(), dir.path());
    let items = api.list_files("folder-1").unwrap();

    first.assert();
    second.assert();
    third.assert();
    assert_eq!(items.len(), 25);
    assert_eq!(
        items[24],
        DriveFile {
            id: "file-24".to_string(),
            name: "Recette 24".to_string(),
            mime_type: "application/vnd.google-apps.spreadsheet".to_string(),
        }
    );
    assert!(items.iter().all(|f| !f.id.is_empty() && !f.name.is_empty()));
}

#[test]
fn test_list_files_empty_page_with_token_continues() {
    let mut server = Server::new();
    let _first = server
        .mock("GET", FILES)
        .match_query(Matcher::Regex(FIRST_PAGE.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"nextPageToken": "page-2", "files": []}"#)
        .create();
    let _second = server
        .mock("GET", FILES)
        .match_query(Matcher::UrlEncoded("pageToken".into(), "page-2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"files": files(0..3)}).to_string())
        .create();

    let dir = tempfile::tempdir().unwrap();
    let api = common::connect(&server.url(), dir.path());
    let items = api.list_files("folder-1").unwrap();
    assert_eq!(items.len(), 3);
}

#[test]
fn test_list_files_trailing_empty_page() {
    let mut server = Server::new();
    let _first = server
        .mock("GET", FILES)
        .match_query(Matcher::Regex(FIRST_PAGE.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"nextPageToken": "page-2", "files": files(0..10)}).to_string())
        .create();
    let _second = server
        .mock("GET", FILES)
        .match_query(Matcher::UrlEncoded("pageToken".into(), "page-2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create();

    let dir = tempfile::tempdir().unwrap();
    let api = common::connect(&server.url(), dir.path());
    assert_eq!(api.list_files("folder-1").unwrap().len(), 10);
}

#[test]
fn test_list_files_stuck_page_token() {
    let mut server = Server::new();
    let _first = server
        .mock("GET", FILES)
        .match_query(Matcher::Regex(FIRST_PAGE.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"nextPageToken": "again", "files": []}"#)
        .create();
    let stuck = server
        .mock("GET", FILES)
        .match_query(Matcher::UrlEncoded("pageToken".into(), "again".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"nextPageToken": "again", "files": []}"#)
        .expect(1)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let api = common::connect(&server.url(), dir.path());

    let result = api.list_files("folder-1");
    assert!(matches!(result, Err(CatalogError::Pagination(_))));
    stuck.assert();
}

#[test]
fn test_list_files_cycling_page_tokens() {
    let mut server = Server::new();
    let _first = server
        .mock("GET", FILES)
        .match_query(Matcher::Regex(FIRST_PAGE.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"nextPageToken": "a", "files": files(0..2)}).to_string())
        .expect(1)
        .create();
    let page_a = server
        .mock("GET", FILES)
        .match_query(Matcher::UrlEncoded("pageToken".into(), "a".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"nextPageToken": "b", "files": files(2..4)}).to_string())
        .expect(1)
        .create();
    let page_b = server
        .mock("GET", FILES)
        .match_query(Matcher::UrlEncoded("pageToken".into(), "b".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"nextPageToken": "a", "files": files(4..6)}).to_string())
        .expect(1)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let api = common::connect(&server.url(), dir.path());

    let result = api.list_files("folder-1");
    assert!(matches!(result, Err(CatalogError::Pagination(ref m)) if m.contains("page token a")));
    page_a.assert();
    page_b.assert();
}

#[test]
fn test_list_files_not_found() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", FILES)
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"code": 404, "message": "File not found: folder-x."}}"#)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let api = common::connect(&server.url(), dir.path());

    assert!(matches!(
        api.list_files("folder-x"),
        Err(CatalogError::Api { status: 404, .. })
    ));
}
