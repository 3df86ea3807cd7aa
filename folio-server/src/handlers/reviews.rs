use axum::{
    Json,
    extract::{Path, State},
};
use folio_core::query::parse_path_id;
use folio_model::{ItemId, ReviewId, ReviewView};

use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn item_reviews_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<Json<Vec<ReviewView>>> {
    let item_id: ItemId = parse_path_id("item_id", &item_id)?;
    let reviews = state.catalog().item_reviews(item_id).await?;
    Ok(Json(reviews))
}

pub async fn single_review_handler(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<Json<ReviewView>> {
    let review_id: ReviewId = parse_path_id("review_id", &review_id)?;
    let review = state.catalog().review(review_id).await?;
    Ok(Json(review))
}
