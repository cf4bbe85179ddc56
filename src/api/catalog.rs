use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::domain::catalog::{Category, Skill};
use crate::error::Result;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillRequest {
    pub name: String,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillListParams {
    pub category_id: Option<Uuid>,
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog_service.list_categories().await?))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let category = state.catalog_service.create_category(&body.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/skills
pub async fn list_skills(
    State(state): State<AppState>,
    Query(params): Query<SkillListParams>,
) -> Result<Json<Vec<Skill>>> {
    Ok(Json(state.catalog_service.list_skills(params.category_id).await?))
}

/// POST /api/skills
pub async fn create_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<CreateSkillRequest>,
) -> Result<impl IntoResponse> {
    let skill = state.catalog_service.create_skill(&body.name, body.category_id).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}
