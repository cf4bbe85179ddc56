use crate::api::AppState;
use crate::error::Result;
use crate::storage::task_repo::TaskFilter;
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// GET /api/benchmark/tasks
///
/// Cache-assisted open-task listing used for load comparisons. Serves the
/// cached page when Redis has it, recomputes and repopulates otherwise.
pub async fn tasks(State(state): State<AppState>) -> Result<Json<Value>> {
    let limit = state.config.pagination.default_limit;
    let value = state
        .cache
        .get_or_set("benchmark:tasks", || async {
            let filter = TaskFilter { status: Some("open".into()), ..TaskFilter::default() };
            let (tasks, total) = state.task_service.list(&filter, limit, 0).await?;
            Ok(json!({ "data": tasks, "meta": { "total": total, "page": 1, "limit": limit } }))
        })
        .await?;
    Ok(Json(value))
}
