// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bounded storage work and timeout configuration.

use axum::http::StatusCode;
use clap::Parser;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use guide_book_persistence::{ConnectionSettings, Persistence};
use serde_json::json;
use std::time::Duration;

use super::helpers::{SLOTS, app, insert_test_guide, register, send};
use crate::{AppState, Args};

fn temp_db_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "guide_book_server_{label}_{}.sqlite",
        std::process::id()
    ))
}

fn remove_db_files(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[tokio::test]
async fn test_slow_storage_work_is_unavailable() {
    let app_state = AppState::new(
        Persistence::new_in_memory().unwrap(),
        Duration::from_millis(50),
    );

    let result = app_state
        .run_blocking(|_| {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_booking_blocked_by_write_lock_is_unavailable() {
    let path = temp_db_path("locked");
    remove_db_files(&path);
    let settings = ConnectionSettings::file(&path)
        .unwrap()
        .with_busy_timeout(Duration::from_millis(1500));

    let setup_state = AppState::new(
        Persistence::open(settings.clone()).unwrap(),
        Duration::from_secs(10),
    );
    let guide_id = insert_test_guide(&setup_state, "Ada", "Hiking").await;
    let token = register(&app(&setup_state), "Alice", "alice@example.com").await;

    let short_state = AppState::new(
        Persistence::connect(&settings).unwrap(),
        Duration::from_millis(200),
    );
    let short_app = app(&short_state);

    let mut holder = SqliteConnection::establish(path.to_str().unwrap()).unwrap();
    diesel::sql_query("BEGIN IMMEDIATE")
        .execute(&mut holder)
        .unwrap();

    let (status, body) = send(
        &short_app,
        "POST",
        "/bookings",
        Some(&token),
        Some(json!({ "guide_id": guide_id, "datetime": SLOTS[0] })),
    )
    .await;

    diesel::sql_query("ROLLBACK").execute(&mut holder).unwrap();
    drop(holder);

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{body}");
    assert_eq!(body["status"], "error");

    drop(short_app);
    drop(short_state);
    drop(setup_state);
    remove_db_files(&path);
}

#[test]
fn test_request_timeout_must_exceed_busy_timeout() {
    let args = Args::try_parse_from([
        "guide-book-server",
        "--busy-timeout-ms",
        "5000",
        "--request-timeout-ms",
        "5000",
    ])
    .unwrap();
    assert!(args.storage_timeouts().is_err());

    let args = Args::try_parse_from([
        "guide-book-server",
        "--busy-timeout-ms",
        "500",
        "--request-timeout-ms",
        "2000",
    ])
    .unwrap();
    assert_eq!(
        args.storage_timeouts().unwrap(),
        (Duration::from_millis(500), Duration::from_millis(2000))
    );
}
