//! Route handlers. Each one builds a per-request `CallContext`, calls one
//! `QueryService` operation and wraps the answer in JSON.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use taskscope_core::CallContext;
use taskscope_core::domain::{
    ChainDetail, DashboardStats, GroupDetail, JobDetail, JobRecord, PendingPage, SearchResult,
};

use super::AppState;
use super::error::ApiError;

type ApiResult<T> = Result<Json<T>, ApiError>;

fn request_context(state: &AppState) -> CallContext {
    state
        .service
        .context()
        .with_cancellation(state.shutdown.child_token())
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "backend": state.service.backend_name(),
    }))
}

/// Polling settings for the web UI.
pub async fn ui_config(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "refresh_interval_ms": state.ui.refresh_interval.as_millis() as u64,
        "max_jobs_display": state.ui.max_jobs_display,
    }))
}

pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    let ctx = request_context(&state);
    Ok(Json(state.service.dashboard_stats(&ctx).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchResult> {
    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        return Err(ApiError::bad_request("query parameter 'q' is required"));
    };
    let ctx = request_context(&state);
    let result = state.service.search(&ctx, &query).await?.found()?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

pub async fn jobs_by_status(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> ApiResult<Value> {
    let Some(status) = params.status.filter(|s| !s.is_empty()) else {
        return Err(ApiError::bad_request("status parameter is required"));
    };
    let ctx = request_context(&state);
    let job_ids = state.service.jobs_by_status(&ctx, &status).await?;
    Ok(Json(json!({
        "status": status,
        "count": job_ids.len(),
        "job_ids": job_ids,
    })))
}

pub async fn get_job(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<JobDetail> {
    let ctx = request_context(&state);
    Ok(Json(state.service.job(&ctx, &id).await?))
}

pub async fn delete_job(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let ctx = request_context(&state);
    state.service.delete_job(&ctx, &id).await?;
    Ok(Json(json!({ "message": "job deleted successfully" })))
}

pub async fn pending_jobs(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> ApiResult<Vec<JobRecord>> {
    let ctx = request_context(&state);
    Ok(Json(state.service.pending_jobs(&ctx, &queue).await?))
}

/// Kept as strings: a malformed number means "use the default".
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

fn lenient_int(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

pub async fn pending_page(
    State(state): State<AppState>,
    Path(queue): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<PendingPage> {
    let offset = lenient_int(params.offset.as_deref());
    let limit = lenient_int(params.limit.as_deref());
    let ctx = request_context(&state);
    Ok(Json(
        state.service.pending_page(&ctx, &queue, offset, limit).await?,
    ))
}

pub async fn pending_count(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> ApiResult<Value> {
    let ctx = request_context(&state);
    let count = state.service.pending_count(&ctx, &queue).await?;
    Ok(Json(json!({ "queue": queue, "count": count })))
}

pub async fn list_chains(State(state): State<AppState>) -> ApiResult<Value> {
    let ctx = request_context(&state);
    let chains = state.service.list_chains(&ctx).await?;
    Ok(Json(json!({ "chains": chains, "count": chains.len() })))
}

pub async fn get_chain(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ChainDetail> {
    let ctx = request_context(&state);
    Ok(Json(state.service.chain(&ctx, &id).await?))
}

pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Value> {
    let ctx = request_context(&state);
    let groups = state.service.list_groups(&ctx).await?;
    Ok(Json(json!({ "groups": groups, "count": groups.len() })))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<GroupDetail> {
    let ctx = request_context(&state);
    Ok(Json(state.service.group(&ctx, &id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_numbers_fall_back_to_zero() {
        assert_eq!(lenient_int(None), 0);
        assert_eq!(lenient_int(Some("abc")), 0);
        assert_eq!(lenient_int(Some(" 15 ")), 15);
        assert_eq!(lenient_int(Some("-4")), -4);
    }
}
