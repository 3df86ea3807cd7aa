use axum::{
    Json,
    extract::{Path, Query, State},
};
use folio_core::query::{SearchCriteria, parse_path_id};
use folio_model::{ItemDetailView, LegacyItemId, SearchResult};
use tracing::debug;

use crate::infra::{app_state::AppState, errors::AppResult};

/// `GET /api/v1/items/search`
pub async fn search_items_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<SearchResult>> {
    let criteria = SearchCriteria::from_query_pairs(&params)?;
    debug!(?criteria, "item search request");
    let result = state.catalog().search(&criteria).await?;
    Ok(Json(result))
}

/// `GET /api/v1/items/{item_id}`
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<Json<ItemDetailView>> {
    let item_id: LegacyItemId = parse_path_id("item_id", &item_id)?;
    let detail = state.catalog().item_detail(item_id).await?;
    Ok(Json(detail))
}
