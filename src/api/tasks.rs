use crate::api::AppState;
use crate::api::dto::{PageParams, Paginated};
use crate::api::middleware::AuthUser;
use crate::domain::task::Task;
use crate::error::Result;
use crate::services::task_service::TaskUpdate;
use crate::storage::task_repo::TaskFilter;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
    pub poster_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub budget: Option<Decimal>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<Decimal>,
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
}

/// GET /api/tasks
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<Paginated<Task>>> {
    let (page, limit, offset) =
        PageParams { page: params.page, limit: params.limit }.resolve(&state.config.pagination);
    let filter =
        TaskFilter { status: params.status, category_id: params.category_id, poster_id: params.poster_id };
    let (tasks, total) = state.task_service.list(&filter, limit, offset).await?;
    Ok(Json(Paginated::new(tasks, total, page, limit)))
}

/// GET /api/tasks/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Task>> {
    Ok(Json(state.task_service.get(id).await?))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    let task = state
        .task_service
        .create(auth.user_id, &body.title, &body.description, body.budget, body.category_id)
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    let update = TaskUpdate {
        title: body.title,
        description: body.description,
        budget: body.budget,
        status: body.status,
        category_id: body.category_id,
    };
    Ok(Json(state.task_service.update(id, auth.user_id, update).await?))
}

/// DELETE /api/tasks/{id}
pub async fn delete(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.task_service.delete(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
