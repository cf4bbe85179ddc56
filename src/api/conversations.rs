use crate::api::AppState;
use crate::api::dto::{PageParams, Paginated};
use crate::api::middleware::AuthUser;
use crate::domain::conversation::{ConversationSummary, ConversationView};
use crate::domain::message::{Message, MessageWithSender};
use crate::error::Result;
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
pub struct CreateConversationRequest {
    pub task_id: Uuid,
    pub recipient_id: Uuid,
    pub initial_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRequest {
    pub conversation_id: Uuid,
    pub pinned: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub conversation: ConversationView,
    pub messages: Vec<MessageWithSender>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedConversation {
    #[serde(flatten)]
    pub conversation: ConversationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<Message>,
}

/// GET /api/conversations
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<ConversationSummary>>> {
    let (page, limit, _) = params.resolve(&state.config.pagination);
    let (summaries, total) = state.conversation_service.list(auth.user_id, page, limit).await?;
    Ok(Json(Paginated::new(summaries, total, page, limit)))
}

/// GET /api/conversations/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationDetail>> {
    let (conversation, messages) = state.conversation_service.get_with_history(id, auth.user_id).await?;
    Ok(Json(ConversationDetail { conversation, messages }))
}

/// POST /api/conversations
///
/// Resolves the conversation for (task, caller, recipient), creating it on
/// first contact, and optionally sends an opening message in the same call.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse> {
    let conversation =
        state.conversation_service.get_or_create(body.task_id, auth.user_id, body.recipient_id).await?;

    let initial_message = match body.initial_message {
        Some(content) => Some(state.message_service.send(conversation.id, auth.user_id, &content).await?),
        None => None,
    };

    let view = ConversationView::for_viewer(conversation, auth.user_id);
    Ok((StatusCode::CREATED, Json(CreatedConversation { conversation: view, initial_message })))
}

/// GET /api/conversations/by-task/{taskId}/{recipientId}
///
/// Same resolution as POST /api/conversations, for clients that open a chat
/// from a task page.
pub async fn by_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((task_id, recipient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ConversationView>> {
    let conversation = state.conversation_service.get_or_create(task_id, auth.user_id, recipient_id).await?;
    Ok(Json(ConversationView::for_viewer(conversation, auth.user_id)))
}

/// POST /api/conversations/pin
pub async fn pin(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PinRequest>,
) -> Result<Json<ConversationView>> {
    let view = state.conversation_service.set_pinned(body.conversation_id, auth.user_id, body.pinned).await?;
    Ok(Json(view))
}
