//! Control-surface endpoint handlers.
//!
//! Every game operation responds with the session's serialized view, so
//! operator tooling always sees the state it just produced. Handlers
//! take the directory lock only to resolve the handle, then the
//! session's own lock for the operation itself.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::game::session::{GameError, GamePhase, GameView, SessionHandle};
use crate::track::snapshot::{RobotId, Snapshot};

#[derive(Debug, Deserialize)]
pub struct CreateGame {
    pub team_1: RobotId,
    pub team_2: RobotId,
    /// Optional caller-supplied id; a UUID is generated otherwise
    pub game_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GameCreated {
    pub id: String,
    /// Write key for privileged operations on this game
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct SetTime {
    pub game_time: f64,
}

#[derive(Debug, Deserialize)]
pub struct SetTeams {
    pub team_1: RobotId,
    pub team_2: RobotId,
}

#[derive(Debug, Deserialize)]
pub struct AlterScore {
    pub key: String,
    pub team_1: i32,
    pub team_2: i32,
}

#[derive(Debug, Serialize)]
pub struct TeamEntry {
    pub id: RobotId,
    pub name: String,
}

async fn resolve(state: &AppState, id: &str) -> Result<SessionHandle, ApiError> {
    Ok(state.directory.read().await.get(id)?)
}

/// `POST /game` — create a new game.
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateGame>,
) -> Result<Json<GameCreated>, ApiError> {
    let handle = state
        .directory
        .write()
        .await
        .create(body.game_id, body.team_1, body.team_2)?;
    let session = handle.read().await;
    Ok(Json(GameCreated {
        id: session.id.clone(),
        key: session.key().to_string(),
    }))
}

/// `POST /game/test` — create a long-running test game with the first
/// two configured teams, already started.
pub async fn create_test_game(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameCreated>, ApiError> {
    let mut roster: Vec<RobotId> = state.config.robots.keys().copied().collect();
    roster.sort_unstable();
    let (team_1, team_2) = match roster.as_slice() {
        [first, second, ..] => (*first, *second),
        _ => return Err(ApiError::BadRequest("config lists fewer than two teams".into())),
    };

    let handle = state
        .directory
        .write()
        .await
        .create(Some("test".to_string()), team_1, team_2)?;

    let mut session = handle.write().await;
    session.set_game_time(99_999.0)?;
    session.start()?;
    Ok(Json(GameCreated {
        id: session.id.clone(),
        key: session.key().to_string(),
    }))
}

/// `GET /game` — registered game ids in creation order.
pub async fn list_games(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.directory.read().await.list())
}

/// `GET /game/{id}` — serialized game view.
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let handle = resolve(&state, &id).await?;
    let view = handle.read().await.view();
    Ok(Json(view))
}

/// `PUT /game/{id}/start` — begin the match.
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let handle = resolve(&state, &id).await?;
    let mut session = handle.write().await;
    session.start()?;
    Ok(Json(session.view()))
}

/// `PUT /game/{id}/pause` — toggle between running and paused.
pub async fn pause_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let handle = resolve(&state, &id).await?;
    let mut session = handle.write().await;
    match session.phase() {
        GamePhase::Running => session.pause()?,
        GamePhase::Paused => session.resume()?,
        phase => {
            return Err(GameError::InvalidPhase { op: "pause", phase }.into());
        }
    }
    Ok(Json(session.view()))
}

/// `PUT /game/{id}/stop` — terminal stop.
pub async fn stop_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let handle = resolve(&state, &id).await?;
    let mut session = handle.write().await;
    session.stop()?;
    Ok(Json(session.view()))
}

/// `PUT /game/{id}/time` — set target match duration.
pub async fn set_game_time(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetTime>,
) -> Result<Json<GameView>, ApiError> {
    let handle = resolve(&state, &id).await?;
    let mut session = handle.write().await;
    session.set_game_time(body.game_time)?;
    Ok(Json(session.view()))
}

/// `PUT /game/{id}/teams` — replace the roster.
pub async fn set_teams(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetTeams>,
) -> Result<Json<GameView>, ApiError> {
    let handle = resolve(&state, &id).await?;
    let mut session = handle.write().await;
    session.set_teams(body.team_1, body.team_2)?;
    Ok(Json(session.view()))
}

/// `PUT /game/{id}/score` — key-guarded additive score override.
pub async fn alter_score(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AlterScore>,
) -> Result<Json<GameView>, ApiError> {
    let handle = resolve(&state, &id).await?;
    let mut session = handle.write().await;
    session.alter_score(&body.key, body.team_1, body.team_2)?;
    Ok(Json(session.view()))
}

/// `GET /team` — the configured roster.
pub async fn list_teams(State(state): State<Arc<AppState>>) -> Json<Vec<TeamEntry>> {
    let mut teams: Vec<TeamEntry> = state
        .config
        .robots
        .iter()
        .map(|(id, name)| TeamEntry {
            id: *id,
            name: name.clone(),
        })
        .collect();
    teams.sort_unstable_by_key(|t| t.id);
    Json(teams)
}

/// `POST /state` — snapshot push from the vision pipeline. Wakes every
/// session loop.
pub async fn publish_state(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<Snapshot>,
) -> Json<serde_json::Value> {
    state.source.publish(snapshot);
    Json(serde_json::json!({ "ok": true }))
}
