mod error;
mod state;
mod util;

pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::docs::ApiDoc;
pub use state::{AppState, SqliteChatService};

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/openapi.json", get(routes::docs::openapi_json))
        .route("/api/auth/dev/token", post(routes::auth::dev_token))
        .route(
            "/api/chats",
            get(routes::chats::list_chats)
                .post(routes::chats::create_chat)
                .delete(routes::chats::delete_chat_by_query),
        )
        .route(
            "/api/chats/:chat_id",
            axum::routing::delete(routes::chats::delete_chat),
        )
        .route(
            "/api/chats/:chat_id/members",
            get(routes::chats::list_members),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
