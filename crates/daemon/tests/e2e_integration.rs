//! End-to-end integration tests for AssetView.
//!
//! These tests start a real server on a loopback port and verify:
//! - Directory browsing and path confinement
//! - Search over names, tags and symlinked directories
//! - Text preview and its rejections
//! - Raw asset download and the UI bundle

use std::fs;
use std::net::SocketAddr;
use std::os::unix::fs::symlink;

use daemon::config::Config;
use daemon::AssetServer;
use protocol::{
    BrowseResponse, EntryKind, ErrorCode, ErrorMessage, FileContentResponse, SearchResponse,
};
use reqwest::StatusCode;
use serde_json::json;
use tempfile::TempDir;

/// Temporary directories backing a test server.
struct TestDirs {
    assets: TempDir,
    _ui: TempDir,
}

/// Create a test configuration with a populated asset tree and UI bundle.
fn create_test_config() -> (Config, TestDirs) {
    let assets = TempDir::new().unwrap();
    let root = assets.path();
    fs::create_dir_all(root.join("sprites/ui/icons")).unwrap();
    fs::write(root.join("sprites/ui/hero.png"), vec![0u8; 2048]).unwrap();
    fs::create_dir_all(root.join("act1")).unwrap();
    fs::create_dir_all(root.join("monsters/BOSS")).unwrap();
    fs::write(root.join("monsters/boss_fight.lua"), "return { hp = 100 }\n").unwrap();
    fs::write(root.join("monsters/goblin.ogg"), [0u8; 16]).unwrap();
    symlink(root.join("monsters"), root.join("act1/monsters")).unwrap();
    symlink(root, root.join("act1/loop")).unwrap();

    let ui = TempDir::new().unwrap();
    fs::write(ui.path().join("index.html"), "<html>assetview</html>").unwrap();

    let mut config = Config::default();
    config.server.bind = SocketAddr::from(([127, 0, 0, 1], 0));
    config.server.ui_dir = ui.path().to_path_buf();
    config.assets.root = root.to_path_buf();
    config.assets.max_preview_size = 1024;

    (config, TestDirs { assets, _ui: ui })
}

async fn start_server() -> (AssetServer, String, TestDirs) {
    let (config, dirs) = create_test_config();
    config.validate().unwrap();
    let server = AssetServer::start(&config).await.unwrap();
    let base = format!("http://{}", server.addr());
    (server, base, dirs)
}

async fn error_body(response: reqwest::Response) -> ErrorMessage {
    response.json::<ErrorMessage>().await.unwrap()
}

// =============================================================================
// Browse Tests
// =============================================================================

#[tokio::test]
async fn test_browse_root() {
    let (server, base, _dirs) = start_server().await;

    let response = reqwest::get(format!("{base}/api/browse")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: BrowseResponse = response.json().await.unwrap();
    assert_eq!(body.current_path, "");
    assert!(body.path_parts.is_empty());
    let names: Vec<_> = body.directories.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["act1", "monsters", "sprites"]);
    assert!(body.files.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_browse_nested_entries() {
    let (server, base, _dirs) = start_server().await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("{base}/api/browse"))
        .query(&[("path", "sprites/ui")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["currentPath"], json!("sprites/ui"));
    assert_eq!(body["pathParts"], json!(["sprites", "ui"]));
    assert_eq!(body["directories"][0]["name"], json!("icons"));
    assert_eq!(body["directories"][0]["type"], json!("directory"));
    assert!(body["directories"][0].get("size").is_none());

    let hero = &body["files"][0];
    assert_eq!(hero["name"], json!("hero.png"));
    assert_eq!(hero["path"], json!("sprites/ui/hero.png"));
    assert_eq!(hero["type"], json!("image"));
    assert_eq!(hero["size"], json!(2048));
    assert_eq!(hero["extension"], json!(".png"));
    assert_eq!(hero["mimeType"], json!("image/png"));
    assert_eq!(hero["tags"], json!(["hero"]));
    assert!(hero["modified"].is_string());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_browse_classifies_ogg_as_audio() {
    let (server, base, _dirs) = start_server().await;

    let body: BrowseResponse = reqwest::get(format!("{base}/api/browse?path=monsters"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let goblin = body.files.iter().find(|e| e.name == "goblin.ogg").unwrap();
    assert_eq!(goblin.kind, EntryKind::Audio);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_browse_traversal_denied() {
    let (server, base, _dirs) = start_server().await;

    let client = reqwest::Client::new();
    for path in ["../", "sprites/../../etc", "../../../../etc/passwd"] {
        let response = client
            .get(format!("{base}/api/browse"))
            .query(&[("path", path)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "path {path}");
        let body = error_body(response).await;
        assert_eq!(body.code, ErrorCode::AccessDenied);
        assert_eq!(body.error, "Access denied");
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_browse_missing_and_file() {
    let (server, base, _dirs) = start_server().await;

    let response = reqwest::get(format!("{base}/api/browse?path=nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_body(response).await.code, ErrorCode::NotFound);

    let response = reqwest::get(format!("{base}/api/browse?path=sprites/ui/hero.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.code, ErrorCode::NotADirectory);

    server.stop().await.unwrap();
}

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_names_and_symlinks() {
    let (server, base, _dirs) = start_server().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/search"))
        .json(&json!({ "query": "BOSS" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: SearchResponse = response.json().await.unwrap();
    assert_eq!(body.query, "BOSS");
    assert_eq!(body.count, body.results.len());

    // The monsters directory is reached first through act1/monsters and is
    // not visited again under its own name; the act1/loop cycle terminates.
    let paths: Vec<_> = body.results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["act1/monsters/BOSS", "act1/monsters/boss_fight.lua"]
    );

    let file = &body.results[1];
    assert_eq!(file.kind, EntryKind::Game);
    assert_eq!(file.parent_path, "act1/monsters");
    assert_eq!(
        file.tags,
        Some(vec!["boss".to_string(), "fight".to_string()])
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_search_scoped_to_path() {
    let (server, base, _dirs) = start_server().await;

    let client = reqwest::Client::new();
    let body: SearchResponse = client
        .post(format!("{base}/api/search"))
        .json(&json!({ "query": "hero", "path": "sprites" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.count, 1);
    assert_eq!(body.results[0].path, "sprites/ui/hero.png");
    assert_eq!(body.results[0].parent_path, "sprites/ui");

    let response = client
        .post(format!("{base}/api/search"))
        .json(&json!({ "query": "hero", "path": "../.." }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_search_scope_symlink_escape_denied() {
    let (server, base, dirs) = start_server().await;
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("secret_boss.txt"), "secret").unwrap();
    symlink(outside.path(), dirs.assets.path().join("sneaky")).unwrap();

    let response = reqwest::Client::new()
        .post(format!("{base}/api/search"))
        .json(&json!({ "query": "boss", "path": "sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_body(response).await.code, ErrorCode::AccessDenied);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_search_invalid_queries() {
    let (server, base, _dirs) = start_server().await;

    let client = reqwest::Client::new();
    let bodies = [json!({ "query": "b" }), json!({ "query": "" }), json!({})];
    for request in bodies {
        let response = client
            .post(format!("{base}/api/search"))
            .json(&request)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {request}");
        let body = error_body(response).await;
        assert_eq!(body.code, ErrorCode::InvalidQuery);
        assert_eq!(body.error, "Search query must be at least 2 characters");
    }

    let response = client
        .post(format!("{base}/api/search"))
        .body("query=boss")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.code, ErrorCode::InvalidQuery);

    server.stop().await.unwrap();
}

// =============================================================================
// File Content Tests
// =============================================================================

#[tokio::test]
async fn test_file_content() {
    let (server, base, _dirs) = start_server().await;

    let response = reqwest::get(format!("{base}/api/file-content?path=monsters/boss_fight.lua"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: FileContentResponse = response.json().await.unwrap();
    assert_eq!(body.content, "return { hp = 100 }\n");
    assert_eq!(body.extension, ".lua");
    assert_eq!(body.size, 20);
    assert_eq!(body.encoding, "utf8");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_file_content_rejections() {
    let (server, base, dirs) = start_server().await;
    fs::write(dirs.assets.path().join("big.txt"), vec![b'a'; 4096]).unwrap();

    let cases = [
        ("../../etc/passwd", StatusCode::FORBIDDEN, ErrorCode::AccessDenied),
        ("missing.txt", StatusCode::NOT_FOUND, ErrorCode::NotFound),
        ("monsters", StatusCode::BAD_REQUEST, ErrorCode::IsADirectory),
        ("sprites/ui/hero.png", StatusCode::BAD_REQUEST, ErrorCode::UnsupportedType),
        ("big.txt", StatusCode::PAYLOAD_TOO_LARGE, ErrorCode::TooLarge),
    ];

    let client = reqwest::Client::new();
    for (path, status, code) in cases {
        let response = client
            .get(format!("{base}/api/file-content"))
            .query(&[("path", path)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), status, "path {path}");
        assert_eq!(error_body(response).await.code, code, "path {path}");
    }

    server.stop().await.unwrap();
}

// =============================================================================
// Raw Asset and UI Tests
// =============================================================================

#[tokio::test]
async fn test_raw_asset_download() {
    let (server, base, _dirs) = start_server().await;

    let response = reqwest::get(format!("{base}/assets/sprites/ui/hero.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "image/png"
    );
    let bytes = response.bytes().await.unwrap();
    assert_eq!(bytes.len(), 2048);

    let response = reqwest::get(format!("{base}/assets/sprites/missing.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = reqwest::get(format!("{base}/assets/sprites/ui"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_raw_asset_symlink_escape_denied() {
    let (server, base, dirs) = start_server().await;
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("secret.txt"), "secret").unwrap();
    symlink(
        outside.path().join("secret.txt"),
        dirs.assets.path().join("leak.txt"),
    )
    .unwrap();

    let response = reqwest::get(format!("{base}/assets/leak.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = reqwest::get(format!("{base}/api/file-content?path=leak.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_health_and_ui() {
    let (server, base, _dirs) = start_server().await;

    let response = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "<html>assetview</html>");

    let response = reqwest::get(format!("{base}/no-such-page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.stop().await.unwrap();
}
