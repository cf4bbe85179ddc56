use crate::api::AppState;
use crate::api::dto::{PageParams, Paginated};
use crate::api::middleware::AuthUser;
use crate::domain::message::Message;
use crate::error::Result;
use crate::storage::message_repo::MessageFilter;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListParams {
    pub conversation_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub sender_id: Option<Uuid>,
    pub is_read: Option<bool>,
    // Flattening PageParams here would break number parsing in
    // serde_urlencoded, so the fields are inlined.
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub message_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

/// GET /api/messages
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<MessageListParams>,
) -> Result<Json<Paginated<Message>>> {
    let (page, limit, offset) =
        PageParams { page: params.page, limit: params.limit }.resolve(&state.config.pagination);
    let filter = MessageFilter {
        conversation_id: params.conversation_id,
        task_id: params.task_id,
        sender_id: params.sender_id,
        is_read: params.is_read,
    };
    let (messages, total) = state.message_service.list(filter, limit, offset).await?;
    Ok(Json(Paginated::new(messages, total, page, limit)))
}

/// POST /api/messages
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let message = state.message_service.send(body.conversation_id, auth.user_id, &body.content).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/messages/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>> {
    let updated = state.message_service.mark_read(&body.message_ids, auth.user_id).await?;
    Ok(Json(MarkReadResponse { updated }))
}

/// PATCH /api/messages/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<EditMessageRequest>,
) -> Result<Json<Message>> {
    let message = state.message_service.edit(id, auth.user_id, &body.content).await?;
    Ok(Json(message))
}

/// DELETE /api/messages/{id}
pub async fn delete(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.message_service.delete(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
