use crate::api::AppState;
use crate::api::dto::{PageParams, Paginated};
use crate::api::middleware::AuthUser;
use crate::domain::bid::TaskBid;
use crate::error::Result;
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
pub struct BidListParams {
    pub task_id: Option<Uuid>,
    pub bidder_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidRequest {
    pub task_id: Uuid,
    pub amount: Decimal,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBidRequest {
    pub status: String,
}

/// GET /api/bids
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<BidListParams>,
) -> Result<Json<Paginated<TaskBid>>> {
    let (page, limit, offset) =
        PageParams { page: params.page, limit: params.limit }.resolve(&state.config.pagination);
    let (bids, total) = state.bid_service.list(params.task_id, params.bidder_id, limit, offset).await?;
    Ok(Json(Paginated::new(bids, total, page, limit)))
}

/// POST /api/bids
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PlaceBidRequest>,
) -> Result<impl IntoResponse> {
    let bid = state.bid_service.place(body.task_id, auth.user_id, body.amount, body.comment.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// PATCH /api/bids/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBidRequest>,
) -> Result<Json<TaskBid>> {
    Ok(Json(state.bid_service.set_status(id, auth.user_id, &body.status).await?))
}
