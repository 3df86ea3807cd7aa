use std::{fmt, sync::Arc};

use chrono::Utc;
use folio_model::{
    ItemDetailView, ItemId, LegacyItemId, ProductDetail, ProductEnvelope,
    ReviewId, ReviewRecord, ReviewView, SearchResult,
};
use tracing::{debug, instrument, warn};

use super::assembler::ViewAssembler;
use super::rules::CatalogSettings;
use crate::database::CatalogRepository;
use crate::error::{CatalogError, Result};
use crate::query::{ProductListCriteria, SearchCriteria};

const ALL_ITEMS: &str = "All Items";
const PRODUCTS: &str = "Products";

/// Entry point for every catalog read served over HTTP.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogRepository>,
    settings: Arc<CatalogSettings>,
    assembler: ViewAssembler,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn CatalogRepository>,
        settings: CatalogSettings,
    ) -> Self {
        let settings = Arc::new(settings);
        let assembler =
            ViewAssembler::new(Arc::clone(&store), Arc::clone(&settings));
        Self {
            store,
            settings,
            assembler,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Filtered, sorted and paginated item search.
    #[instrument(skip(self, criteria), fields(page = criteria.page.page()))]
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<SearchResult> {
        let plan = criteria.plan(self.settings.language_id);
        let page = self.store.search_item_ids(&plan).await?;
        debug!(
            total = page.total,
            returned = page.item_ids.len(),
            "item search evaluated"
        );

        let items = self.assembler.summarize_many(&page.item_ids).await?;
        let display_text = self.display_text(criteria).await?;

        Ok(SearchResult {
            display_text,
            items,
            pagination: criteria.page.pagination(page.total),
        })
    }

    async fn display_text(&self, criteria: &SearchCriteria) -> Result<String> {
        if let Some(keyword) = criteria.filter.keyword.as_deref() {
            return Ok(format!("Search results for '{keyword}'"));
        }

        let Some(category_id) = criteria.sole_category() else {
            return Ok(ALL_ITEMS.to_string());
        };

        let category = self
            .store
            .category(category_id, self.settings.language_id)
            .await?;
        Ok(match category {
            Some(category) => category
                .name
                .unwrap_or_else(|| format!("Category {category_id}")),
            None => ALL_ITEMS.to_string(),
        })
    }

    /// Detail view for an external id (legacy id first, internal id second).
    #[instrument(skip(self))]
    pub async fn item_detail(
        &self,
        item_id: LegacyItemId,
    ) -> Result<ItemDetailView> {
        self.assembler.detail(item_id, Utc::now()).await
    }

    /// Plain listing of active items by internal id.
    #[instrument(skip(self, criteria), fields(page = criteria.page.page()))]
    pub async fn list_products(
        &self,
        criteria: &ProductListCriteria,
    ) -> Result<SearchResult> {
        let plan = criteria.plan(self.settings.language_id);
        let page = self.store.search_item_ids(&plan).await?;
        let items = self.assembler.product_cards(&page.item_ids).await?;

        Ok(SearchResult {
            display_text: PRODUCTS.to_string(),
            items,
            pagination: criteria.page.pagination(page.total),
        })
    }

    #[instrument(skip(self))]
    pub async fn product_detail(
        &self,
        item_id: ItemId,
    ) -> Result<ProductEnvelope> {
        let language_id = self.settings.language_id;
        let ids = [item_id];
        let (items, descriptions, reviews) = tokio::try_join!(
            self.store.active_items(&ids),
            self.store.descriptions(&ids, language_id),
            self.store.approved_reviews(item_id),
        )?;

        let item = items
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::not_found("Product not found"))?;
        let description = descriptions.into_iter().next();
        if description.is_none() {
            warn!(
                item_id = %item_id,
                language_id = %language_id,
                "product has no description"
            );
        }
        let (name, text) = description
            .map(|d| (d.name, d.description))
            .unwrap_or_default();

        let rating = if reviews.is_empty() {
            0.0
        } else {
            let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
            sum as f64 / reviews.len() as f64
        };

        Ok(ProductEnvelope::success(ProductDetail {
            product_id: item.item_id.get(),
            name,
            price: item.price.to_string(),
            image: self
                .settings
                .image_url(item.image.as_deref())
                .unwrap_or_default(),
            description: text,
            quantity: item.quantity,
            rating,
        }))
    }

    /// Approved reviews of an item; empty when there are none.
    pub async fn item_reviews(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<ReviewView>> {
        let reviews = self.store.approved_reviews(item_id).await?;
        Ok(reviews.into_iter().map(review_view).collect())
    }

    pub async fn review(&self, review_id: ReviewId) -> Result<ReviewView> {
        self.store
            .approved_review(review_id)
            .await?
            .map(review_view)
            .ok_or_else(|| CatalogError::not_found("Review not found"))
    }

    /// Store round trip for readiness probes.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}

fn review_view(review: ReviewRecord) -> ReviewView {
    ReviewView {
        review_id: review.review_id.get(),
        customer_name: review.customer_name,
        rating: review.rating,
        comment: review.comment,
    }
}
