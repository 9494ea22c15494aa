use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    Json,
};
use tracing::debug;

use super::models::{
    ChatsResponse, CreateChatBody, CreateChatResponse, DeleteChatQuery, EmptyResponse,
    MembersResponse,
};
use crate::{util::require_bearer, ApiError, AppState};

fn parse_chat_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request("invalid chat id"))
}

#[utoipa::path(
    get,
    path = "/api/chats",
    tag = "Chats",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Chats the caller is a member of", body = ChatsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to fetch chats", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ChatsResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let account = state.authenticate(&token).await?;

    let listed = state.chats().list_chats(&account).await?;

    Ok(Json(ChatsResponse {
        chats: listed.chats.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/chats",
    tag = "Chats",
    security(("bearerAuth" = [])),
    request_body = CreateChatBody,
    responses(
        (status = 200, description = "Chat created", body = CreateChatResponse),
        (status = 400, description = "Invalid chat payload", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to create chat", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateChatBody>, JsonRejection>,
) -> Result<Json<CreateChatResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let account = state.authenticate(&token).await?;

    let Json(body) = body.map_err(|rejection| {
        debug!(error = %rejection, "rejected chat payload");
        ApiError::bad_request("invalid request body")
    })?;

    let created = state.chats().create_chat(&account, body.into()).await?;

    Ok(Json(CreateChatResponse {
        chat_id: created.chat_id,
        name: created.name,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/chats/{chat_id}",
    tag = "Chats",
    security(("bearerAuth" = [])),
    params(
        ("chat_id" = i64, Path, description = "Chat identifier")
    ),
    responses(
        (status = 200, description = "Chat deleted", body = EmptyResponse),
        (status = 400, description = "Invalid chat id", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not the chat admin", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to delete chat", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    chat_id: Result<Path<String>, PathRejection>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let account = state.authenticate(&token).await?;

    let Path(raw) = chat_id.map_err(|_| ApiError::bad_request("invalid chat id"))?;
    let chat_id = parse_chat_id(&raw)?;

    state.chats().delete_chat(&account, chat_id).await?;
    Ok(Json(EmptyResponse {}))
}

#[utoipa::path(
    delete,
    path = "/api/chats",
    tag = "Chats",
    security(("bearerAuth" = [])),
    params(DeleteChatQuery),
    responses(
        (status = 200, description = "Chat deleted", body = EmptyResponse),
        (status = 400, description = "Missing or invalid chat id", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not the chat admin", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to delete chat", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_chat_by_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<DeleteChatQuery>, QueryRejection>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let account = state.authenticate(&token).await?;

    let Query(query) = query.map_err(|_| ApiError::bad_request("invalid query string"))?;
    let raw = query
        .chat_id
        .ok_or_else(|| ApiError::bad_request("chat_id required"))?;
    let chat_id = parse_chat_id(&raw)?;

    state.chats().delete_chat(&account, chat_id).await?;
    Ok(Json(EmptyResponse {}))
}

#[utoipa::path(
    get,
    path = "/api/chats/{chat_id}/members",
    tag = "Chats",
    security(("bearerAuth" = [])),
    params(
        ("chat_id" = i64, Path, description = "Chat identifier")
    ),
    responses(
        (status = 200, description = "Chat roster, admin first", body = MembersResponse),
        (status = 400, description = "Invalid chat id", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not a member", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Failed to fetch members", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    headers: HeaderMap,
    chat_id: Result<Path<String>, PathRejection>,
) -> Result<Json<MembersResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let account = state.authenticate(&token).await?;

    let Path(raw) = chat_id.map_err(|_| ApiError::bad_request("invalid chat id"))?;
    let chat_id = parse_chat_id(&raw)?;

    let roster = state.chats().list_members(&account, chat_id).await?;

    Ok(Json(MembersResponse {
        members: roster.members.into_iter().map(Into::into).collect(),
    }))
}
