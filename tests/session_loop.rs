//! End-to-end tests: snapshots published through the shared source
//! drive the background session loops, and the HTTP surface exposes
//! control and read operations.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use liga_server::api::router::build_router;
use liga_server::api::state::AppState;
use liga_server::config::GameConfig;
use liga_server::game::directory::SessionDirectory;
use liga_server::track::snapshot::{FieldRegion, Snapshot, TrackedObject};
use liga_server::track::source::StateSource;
use liga_server::util::vec2::Vec2;

fn config() -> Arc<GameConfig> {
    let raw = json!({
        "robots": { "11": "Alpha", "22": "Beta" },
        "robot_time": 120.0,
        "game_time": 300.0,
        "charging_time": 5.0,
        "points": { "good_ore": 2, "bad_ore": -1 }
    });
    Arc::new(serde_json::from_value(raw).unwrap())
}

fn base_snapshot(timestamp: f64) -> Snapshot {
    let mut snapshot = Snapshot::default();
    snapshot.timestamp = timestamp;
    snapshot.fields.insert(
        "blue_basket".to_string(),
        FieldRegion::rect(0.0, 0.0, 10.0, 10.0),
    );
    snapshot.fields.insert(
        "red_basket".to_string(),
        FieldRegion::rect(90.0, 0.0, 100.0, 10.0),
    );
    snapshot.fields.insert(
        "charging_station_1".to_string(),
        FieldRegion::rect(40.0, 0.0, 50.0, 10.0),
    );
    snapshot.fields.insert(
        "charging_station_2".to_string(),
        FieldRegion::rect(40.0, 90.0, 50.0, 100.0),
    );
    snapshot
}

fn put_object(snapshot: &mut Snapshot, category: &str, id: u32, x: f32, y: f32) {
    snapshot
        .objects
        .entry(category.to_string())
        .or_default()
        .insert(
            id,
            TrackedObject {
                id,
                position: Vec2::new(x, y),
                direction: 0.0,
            },
        );
}

fn put_robot(snapshot: &mut Snapshot, id: u32, x: f32, y: f32) {
    snapshot.robots.insert(
        id,
        TrackedObject {
            id,
            position: Vec2::new(x, y),
            direction: 0.0,
        },
    );
}

/// Give the session loops a chance to process the latest publish.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn loop_scores_published_snapshots() {
    let source = StateSource::new();
    let mut directory = SessionDirectory::new(config(), source.clone(), 10);

    let handle = directory.create(Some("g1".to_string()), 11, 22).unwrap();
    handle.write().await.start().unwrap();

    let mut snapshot = base_snapshot(1.0);
    put_object(&mut snapshot, "good_ore", 1, 5.0, 5.0);
    source.publish(snapshot.clone());
    settle().await;

    assert_eq!(handle.read().await.view().teams.get(&11).unwrap().score, 2);

    snapshot.timestamp = 2.0;
    source.publish(snapshot);
    settle().await;

    assert_eq!(handle.read().await.view().teams.get(&11).unwrap().score, 4);
}

#[tokio::test]
async fn loop_tracks_charging_occupancy() {
    let source = StateSource::new();
    let mut directory = SessionDirectory::new(config(), source.clone(), 10);

    let handle = directory.create(Some("g1".to_string()), 11, 22).unwrap();
    handle.write().await.start().unwrap();

    let mut snapshot = base_snapshot(1.0);
    put_robot(&mut snapshot, 11, 45.0, 5.0);
    source.publish(snapshot);
    settle().await;
    assert!(handle.read().await.view().teams.get(&11).unwrap().charging);

    let mut snapshot = base_snapshot(2.0);
    put_robot(&mut snapshot, 11, 70.0, 5.0);
    source.publish(snapshot);
    settle().await;
    assert!(!handle.read().await.view().teams.get(&11).unwrap().charging);
}

#[tokio::test]
async fn bad_snapshot_does_not_kill_the_loop() {
    let source = StateSource::new();
    let mut directory = SessionDirectory::new(config(), source.clone(), 10);

    let handle = directory.create(Some("g1".to_string()), 11, 22).unwrap();
    handle.write().await.start().unwrap();

    // Missing every field region: the tick is rejected
    let mut broken = Snapshot::default();
    broken.timestamp = 1.0;
    put_object(&mut broken, "good_ore", 1, 5.0, 5.0);
    source.publish(broken);
    settle().await;
    assert_eq!(handle.read().await.view().teams.get(&11).unwrap().score, 0);

    // The loop is still alive and processes the next good snapshot
    let mut snapshot = base_snapshot(2.0);
    put_object(&mut snapshot, "good_ore", 1, 5.0, 5.0);
    source.publish(snapshot);
    settle().await;
    assert_eq!(handle.read().await.view().teams.get(&11).unwrap().score, 2);
}

async fn request(router: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn http_control_surface_full_flow() {
    let source = StateSource::new();
    let state = Arc::new(AppState::new(config(), source, 10));
    let router = build_router(state);

    // Create
    let (status, created) = request(
        &router,
        "POST",
        "/game",
        Some(json!({ "team_1": 11, "team_2": 22 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();
    let key = created["key"].as_str().unwrap().to_string();

    // List
    let (status, games) = request(&router, "GET", "/game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(games, json!([id]));

    // Start
    let (status, view) = request(&router, "PUT", &format!("/game/{id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "running");

    // Double start conflicts
    let (status, _) = request(&router, "PUT", &format!("/game/{id}/start"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Pause toggles both ways
    let (_, view) = request(&router, "PUT", &format!("/game/{id}/pause"), None).await;
    assert_eq!(view["phase"], "paused");
    let (_, view) = request(&router, "PUT", &format!("/game/{id}/pause"), None).await;
    assert_eq!(view["phase"], "running");

    // Score override needs the right key
    let (status, _) = request(
        &router,
        "PUT",
        &format!("/game/{id}/score"),
        Some(json!({ "key": "wrong", "team_1": 1, "team_2": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, view) = request(
        &router,
        "PUT",
        &format!("/game/{id}/score"),
        Some(json!({ "key": key, "team_1": 3, "team_2": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["teams"]["11"]["score"], 3);
    assert_eq!(view["teams"]["22"]["score"], -1);

    // Set time
    let (status, view) = request(
        &router,
        "PUT",
        &format!("/game/{id}/time"),
        Some(json!({ "game_time": 600.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["game_time"], 600.0);

    // Stop is terminal
    let (_, view) = request(&router, "PUT", &format!("/game/{id}/stop"), None).await;
    assert_eq!(view["phase"], "stopped");
    let (status, _) = request(&router, "PUT", &format!("/game/{id}/pause"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn http_not_found_and_bad_requests() {
    let source = StateSource::new();
    let state = Arc::new(AppState::new(config(), source, 10));
    let router = build_router(state);

    let (status, _) = request(&router, "GET", "/game/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown team id in config
    let (status, _) = request(
        &router,
        "POST",
        "/game",
        Some(json!({ "team_1": 11, "team_2": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Roster listing
    let (status, teams) = request(&router, "GET", "/team", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        teams,
        json!([
            { "id": 11, "name": "Alpha" },
            { "id": 22, "name": "Beta" }
        ])
    );
}

#[tokio::test]
async fn http_state_push_feeds_running_games() {
    let source = StateSource::new();
    let state = Arc::new(AppState::new(config(), source, 10));
    let router = build_router(state);

    let (_, created) = request(
        &router,
        "POST",
        "/game",
        Some(json!({ "team_1": 11, "team_2": 22, "game_id": "g1" })),
    )
    .await;
    assert_eq!(created["id"], "g1");
    let (_, view) = request(&router, "PUT", "/game/g1/start", None).await;
    assert_eq!(view["phase"], "running");

    let mut snapshot = base_snapshot(1.0);
    put_object(&mut snapshot, "bad_ore", 9, 95.0, 5.0);
    let (status, _) = request(
        &router,
        "POST",
        "/state",
        Some(serde_json::to_value(&snapshot).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    settle().await;

    let (_, view) = request(&router, "GET", "/game/g1", None).await;
    assert_eq!(view["teams"]["22"]["score"], -1);
    assert_eq!(view["objects"]["9"]["category"], "bad_ore");
}
