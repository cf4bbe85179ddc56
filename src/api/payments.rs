use crate::api::AppState;
use crate::api::dto::{PageParams, Paginated};
use crate::api::middleware::AuthUser;
use crate::domain::payment::Payment;
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
pub struct PaymentListParams {
    pub task_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub task_id: Uuid,
    pub payee_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    pub status: String,
}

/// GET /api/payments
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaymentListParams>,
) -> Result<Json<Paginated<Payment>>> {
    let (page, limit, offset) =
        PageParams { page: params.page, limit: params.limit }.resolve(&state.config.pagination);
    let (payments, total) = state.payment_service.list(params.task_id, params.user_id, limit, offset).await?;
    Ok(Json(Paginated::new(payments, total, page, limit)))
}

/// POST /api/payments
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse> {
    let payment = state.payment_service.record(body.task_id, auth.user_id, body.payee_id, body.amount).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// PATCH /api/payments/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePaymentRequest>,
) -> Result<Json<Payment>> {
    Ok(Json(state.payment_service.set_status(id, auth.user_id, &body.status).await?))
}
