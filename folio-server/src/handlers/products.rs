use axum::{
    Json,
    extract::{Path, Query, State},
};
use folio_core::query::{ProductListCriteria, parse_path_id};
use folio_model::{ItemId, ProductEnvelope, SearchResult};

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<SearchResult>> {
    let criteria = ProductListCriteria::from_query_pairs(&params)?;
    let result = state.catalog().list_products(&criteria).await?;
    Ok(Json(result))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ProductEnvelope>> {
    let product_id: ItemId = parse_path_id("product_id", &product_id)?;
    let product = state.catalog().product_detail(product_id).await?;
    Ok(Json(product))
}
