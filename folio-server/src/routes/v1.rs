use axum::{Router, routing::get};
use folio_core::api::routes::{utils::relative, v1};

use crate::{
    AppState,
    handlers::{items, products, reviews},
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .merge(create_item_routes())
        .merge(create_product_routes())
        .merge(create_review_routes())
}

fn create_item_routes() -> Router<AppState> {
    Router::new()
        .route(
            relative(v1::items::SEARCH),
            get(items::search_items_handler),
        )
        .route(relative(v1::items::ITEM), get(items::get_item_handler))
}

fn create_product_routes() -> Router<AppState> {
    Router::new()
        .route(
            relative(v1::products::COLLECTION),
            get(products::list_products_handler),
        )
        .route(
            relative(v1::products::ITEM),
            get(products::get_product_handler),
        )
}

fn create_review_routes() -> Router<AppState> {
    Router::new()
        .route(
            relative(v1::reviews::FOR_ITEM),
            get(reviews::item_reviews_handler),
        )
        .route(
            relative(v1::reviews::SINGLE),
            get(reviews::single_review_handler),
        )
}
