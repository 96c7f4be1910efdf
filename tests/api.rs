mod common;

use std::io::Cursor;
use std::time::Duration;

use eframe::egui;
use renamer_dash::api::{ApiClient, ApiError};
use renamer_dash::commands::{self, Command};
use renamer_dash::covers::{Cover, CoverCache};
use renamer_dash::model::{ExportRecord, ServerConfig};
use renamer_dash::notify::Severity;
use serde_json::json;

use common::{Backend, FakeServer};

#[tokio::test]
async fn test_start_is_acknowledged_and_status_follows() {
    let server = FakeServer::start(Backend::default()).await;
    let client = ApiClient::new(&server.base_url).unwrap();

    assert!(!client.status().await.unwrap().running);

    let ack = client.start().await.unwrap();
    assert_eq!(ack.status.as_deref(), Some("started"));
    assert!(client.status().await.unwrap().running);

    client.stop().await.unwrap();
    assert!(!client.status().await.unwrap().running);
}

#[tokio::test]
async fn test_scheduler_write_uses_query_flag() {
    let server = FakeServer::start(Backend::default()).await;
    let client = ApiClient::new(&server.base_url).unwrap();

    client.set_scheduler(true).await.unwrap();
    assert!(client.scheduler().await.unwrap().active);
    client.set_scheduler(false).await.unwrap();
    assert!(!client.scheduler().await.unwrap().active);

    server.with(|b| assert_eq!(b.scheduler_writes, vec!["true", "false"]));
}

#[tokio::test]
async fn test_scheduler_failure_is_status_error() {
    let server = FakeServer::start(Backend {
        fail_scheduler_writes: true,
        ..Default::default()
    })
    .await;
    let client = ApiClient::new(&server.base_url).unwrap();

    match client.set_scheduler(true).await {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "scheduler unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let outcome = commands::dispatch(&client, Command::SetScheduler(true)).await;
    assert!(!outcome.ok);
    assert_eq!(outcome.notification.severity, Severity::Error);
}

#[tokio::test]
async fn test_config_round_trip_through_backend() {
    let server = FakeServer::start(Backend {
        library_path: "/srv/old".into(),
        ..Default::default()
    })
    .await;
    let client = ApiClient::new(&server.base_url).unwrap();

    assert_eq!(client.config().await.unwrap().library_path, "/srv/old");

    let outcome = commands::dispatch(
        &client,
        Command::SaveConfig(ServerConfig {
            library_path: "/srv/audiobooks".into(),
        }),
    )
    .await;
    assert!(outcome.ok);
    assert_eq!(outcome.notification.severity, Severity::Success);
    server.with(|b| assert_eq!(b.library_path, "/srv/audiobooks"));
}

#[tokio::test]
async fn test_update_db_reports_backend_message() {
    let server = FakeServer::start(Backend::default()).await;
    let client = ApiClient::new(&server.base_url).unwrap();

    let outcome = commands::dispatch(&client, Command::UpdateDb).await;
    assert!(outcome.ok);
    assert!(outcome.notification.message.starts_with("Database update started"));
}

#[tokio::test]
async fn test_inventory_decodes_sparse_records() {
    let server = FakeServer::start(Backend {
        inventory: vec![
            json!({
                "ean": "9780000000001",
                "title": "Dune",
                "author": "Frank Herbert",
                "release_date": "1965-08-01",
                "exists": true,
                "has_cover": true,
                "relative_cover_path": "Herbert/Dune/cover.jpg"
            }),
            json!({ "ean": "9780000000002", "exists": false }),
        ],
        ..Default::default()
    })
    .await;
    let client = ApiClient::new(&server.base_url).unwrap();

    let items = client.inventory().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].cover_path.as_deref(), Some("Herbert/Dune/cover.jpg"));
    assert_eq!(items[1].title, None);
    assert!(!items[1].has_cover);
    assert_eq!(items[1].presence(), "Missing");
}

#[tokio::test]
async fn test_export_download_writes_file() {
    let server = FakeServer::start(Backend {
        export: vec![
            json!({
                "EAN": "9780000000001",
                "Author": "Frank Herbert",
                "Title": "Dune",
                "Release Date": "1965-08-01",
                "Status": "In Library"
            }),
            json!({
                "EAN": "9780000000002",
                "Author": null,
                "Title": null,
                "Release Date": null,
                "Status": "Missing"
            }),
        ],
        ..Default::default()
    })
    .await;
    let client = ApiClient::new(&server.base_url).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("exports").join("inventory.json");
    let written = client.download_export(&dest).await.unwrap();

    let content = std::fs::read(&dest).unwrap();
    assert_eq!(written, content.len() as u64);
    let records: Vec<ExportRecord> = serde_json::from_slice(&content).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title.as_deref(), Some("Dune"));
    assert_eq!(records[1].status, "Missing");
    assert!(!dir.path().join("exports").join("inventory.json.part").exists());
}

#[tokio::test]
async fn test_cover_thumbnails_load_from_backend() {
    let mut png = Vec::new();
    image::RgbaImage::from_pixel(128, 256, image::Rgba([10, 20, 30, 255]))
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let server = FakeServer::start(Backend {
        covers: [("Herbert/Dune/cover.png".to_string(), png)].into(),
        ..Default::default()
    })
    .await;
    let client = ApiClient::new(&server.base_url).unwrap();

    let ctx = egui::Context::default();
    let mut covers = CoverCache::default();
    covers.request(&client, "/files/Herbert/Dune/cover.png");
    covers.request(&client, "/files/Herbert/Missing/cover.jpg");
    covers.request(&client, "/files/Herbert/Dune/cover.png");
    assert_eq!(covers.len(), 2);

    tokio::time::timeout(Duration::from_secs(5), async {
        while covers.poll(&ctx) > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("covers never finished loading");

    match covers.get("/files/Herbert/Dune/cover.png") {
        Cover::Ready(texture) => assert_eq!(texture.size(), [32, 64]),
        _ => panic!("cover was not loaded"),
    }
    assert!(matches!(covers.get("/files/Herbert/Missing/cover.jpg"), Cover::Unavailable));

    covers.clear();
    assert!(covers.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_request_error() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{}", addr)).unwrap();
    assert!(matches!(client.status().await, Err(ApiError::Request(_))));
}
