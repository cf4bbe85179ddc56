use crate::api::AppState;
use crate::api::dto::{PageParams, Paginated};
use crate::api::middleware::AuthUser;
use crate::domain::review::Review;
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
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    pub task_id: Option<Uuid>,
    pub reviewee_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub task_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

/// GET /api/reviews
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> Result<Json<Paginated<Review>>> {
    let (page, limit, offset) =
        PageParams { page: params.page, limit: params.limit }.resolve(&state.config.pagination);
    let (reviews, total) = state.review_service.list(params.task_id, params.reviewee_id, limit, offset).await?;
    Ok(Json(Paginated::new(reviews, total, page, limit)))
}

/// POST /api/reviews
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    let review = state
        .review_service
        .create(body.task_id, auth.user_id, body.reviewee_id, body.rating, body.comment.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}
