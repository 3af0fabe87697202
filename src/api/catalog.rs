//! Catalog home page endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, services::catalog::CatalogCounts, AppState};

/// Catalog home page: record counts per entity type
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary", body = CatalogCounts)
    )
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Json<CatalogCounts>> {
    let counts = state.services.catalog.summary().await?;
    Ok(Json(counts))
}
