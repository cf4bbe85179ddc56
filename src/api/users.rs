use crate::api::AppState;
use crate::api::dto::{PageParams, Paginated};
use crate::api::middleware::AuthUser;
use crate::domain::catalog::Skill;
use crate::domain::user::User;
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSkillRequest {
    pub skill_id: Uuid,
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<User>>> {
    let (page, limit, offset) = params.resolve(&state.config.pagination);
    let (users, total) = state.user_service.list(limit, offset).await?;
    Ok(Json(Paginated::new(users, total, page, limit)))
}

/// GET /api/users/{id}
pub async fn get(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Result<Json<User>> {
    Ok(Json(state.user_service.get(id).await?))
}

/// PATCH /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    Ok(Json(state.user_service.update(id, auth.user_id, body.name.as_deref(), body.image.as_deref()).await?))
}

/// GET /api/users/{id}/skills
pub async fn list_skills(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Skill>>> {
    Ok(Json(state.user_service.list_skills(id).await?))
}

/// POST /api/users/{id}/skills
pub async fn add_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<TagSkillRequest>,
) -> Result<StatusCode> {
    state.user_service.add_skill(id, auth.user_id, body.skill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/users/{id}/skills/{skillId}
pub async fn remove_skill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, skill_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    state.user_service.remove_skill(id, auth.user_id, skill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
