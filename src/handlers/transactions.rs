use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::models::Transaction;
use crate::db::queries;
use crate::error::AppError;
use crate::reports;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub transactions: Vec<Transaction>,
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(10).max(1);
    let search = params.search.unwrap_or_default();

    let (total, transactions) =
        queries::search_transactions(&state.db, &search, page, per_page).await?;

    Ok(Json(ListResponse {
        total,
        page,
        per_page,
        transactions,
    }))
}

pub async fn statistics(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let stats = reports::statistics_for_month(&state.db, &month).await?;
    Ok(Json(stats))
}

pub async fn bar_chart(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let histogram = reports::bar_chart_for_month(&state.db, &month).await?;
    Ok(Json(histogram))
}

pub async fn pie_chart(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let breakdown = reports::pie_chart_for_month(&state.db, &month).await?;
    Ok(Json(breakdown))
}

pub async fn combined(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let report = reports::combined_for_month(&state.db, &month).await?;
    Ok(Json(report))
}
