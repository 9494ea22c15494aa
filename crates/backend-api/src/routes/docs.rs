use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::dev_token,
        crate::routes::chats::list_chats,
        crate::routes::chats::create_chat,
        crate::routes::chats::delete_chat,
        crate::routes::chats::delete_chat_by_query,
        crate::routes::chats::list_members
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::models::ChatResponse,
            crate::routes::models::ChatMemberResponse,
            crate::routes::models::CreateChatBody,
            crate::routes::models::CreateChatResponse,
            crate::routes::models::ChatsResponse,
            crate::routes::models::MembersResponse,
            crate::routes::models::EmptyResponse,
            crate::routes::models::DevTokenRequest,
            crate::routes::models::AccountResponse,
            crate::routes::models::SessionResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Development session issuing"),
        (name = "Chats", description = "Chat groups and their membership")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        let mut scheme = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut scheme {
            http.bearer_format = Some("Bearer".to_string());
        }

        components
            .security_schemes
            .insert("bearerAuth".to_string(), scheme);
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
