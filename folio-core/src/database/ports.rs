use std::collections::HashMap;

use async_trait::async_trait;
use folio_model::{
    AuthorRecord, CategoryId, CategoryRecord, ItemDescriptionRecord, ItemId,
    ItemImageRecord, ItemRecord, LanguageId, LegacyItemId, PublisherRecord,
    ReviewId, ReviewRecord,
};

use crate::error::Result;
use crate::query::SearchPlan;

/// One page of matching item ids plus the size of the full filtered set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemIdPage {
    pub item_ids: Vec<ItemId>,
    pub total: u64,
}

/// Read access to the catalog tables.
///
/// Collection reads return an empty list when nothing is linked; only store
/// failures surface as errors.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Evaluate a plan: ordered ids for the requested page and the total
    /// count before pagination. Only active items are considered.
    async fn search_item_ids(&self, plan: &SearchPlan) -> Result<ItemIdPage>;

    /// Active items among `ids`, in no particular order.
    async fn active_items(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>>;

    async fn descriptions(
        &self,
        ids: &[ItemId],
        language_id: LanguageId,
    ) -> Result<Vec<ItemDescriptionRecord>>;

    /// External ids for the given items. Items without a mapping are absent
    /// from the result; with several mappings the lowest legacy id wins.
    async fn legacy_ids(
        &self,
        ids: &[ItemId],
    ) -> Result<HashMap<ItemId, LegacyItemId>>;

    /// Internal id a legacy id maps to, if any.
    async fn resolve_legacy_id(
        &self,
        legacy_id: LegacyItemId,
    ) -> Result<Option<ItemId>>;

    /// Categories linked to an item, names resolved for `language_id`.
    async fn item_categories(
        &self,
        item_id: ItemId,
        language_id: LanguageId,
    ) -> Result<Vec<CategoryRecord>>;

    async fn category(
        &self,
        category_id: CategoryId,
        language_id: LanguageId,
    ) -> Result<Option<CategoryRecord>>;

    /// Active authors of an item.
    async fn item_authors(&self, item_id: ItemId) -> Result<Vec<AuthorRecord>>;

    /// Active publishers of an item.
    async fn item_publishers(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<PublisherRecord>>;

    /// Secondary images ordered by sort key.
    async fn item_images(&self, item_id: ItemId)
    -> Result<Vec<ItemImageRecord>>;

    /// Approved reviews of an item ordered by review id.
    async fn approved_reviews(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<ReviewRecord>>;

    async fn approved_review(
        &self,
        review_id: ReviewId,
    ) -> Result<Option<ReviewRecord>>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<()>;
}
