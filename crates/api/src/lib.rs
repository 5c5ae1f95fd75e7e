pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let room_routes = Router::new()
        .route("/", get(routes::room::list))
        .route("/", post(routes::room::create))
        .route("/{room_id}", get(routes::room::get))
        .route("/{room_id}", patch(routes::room::update))
        .route("/{room_id}", delete(routes::room::delete))
        .route("/{room_id}/favorite", patch(routes::room::toggle_favorite))
        .route("/{room_id}/join", post(routes::room::join))
        .route("/{room_id}/leave", post(routes::room::leave));

    let user_routes = Router::new()
        .route("/me", get(routes::user::me))
        .route("/me", patch(routes::user::update_me));

    let api = Router::new()
        .nest("/rooms", room_routes)
        .nest("/users", user_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
