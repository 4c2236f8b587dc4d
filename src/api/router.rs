//! Router assembly for the control surface.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::state::AppState;

/// Build the full router: game control, roster listing and the vision
/// pipeline's snapshot push. CORS is open so scoreboard frontends can
/// read from any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/game", post(handlers::create_game).get(handlers::list_games))
        .route("/game/test", post(handlers::create_test_game))
        .route("/game/{id}", get(handlers::get_game))
        .route("/game/{id}/start", put(handlers::start_game))
        .route("/game/{id}/pause", put(handlers::pause_game))
        .route("/game/{id}/stop", put(handlers::stop_game))
        .route("/game/{id}/time", put(handlers::set_game_time))
        .route("/game/{id}/teams", put(handlers::set_teams))
        .route("/game/{id}/score", put(handlers::alter_score))
        .route("/team", get(handlers::list_teams))
        .route("/state", post(handlers::publish_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
