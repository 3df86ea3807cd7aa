//! In-memory catalog store.
//!
//! Evaluates [`SearchPlan`]s with the same semantics as the PostgreSQL
//! adapter so services and HTTP handlers can be exercised without a
//! database.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, HashMap},
};

use async_trait::async_trait;
use folio_model::{
    AuthorId, AuthorRecord, CategoryId, CategoryRecord, ItemDescriptionRecord,
    ItemId, ItemImageRecord, ItemRecord, LanguageId, LegacyItemId,
    PublisherId, PublisherRecord, ReviewId, ReviewRecord,
};

use crate::database::ports::{CatalogRepository, ItemIdPage};
use crate::error::{CatalogError, Result};
use crate::query::{DescriptionJoin, ItemOrdering, SearchPlan};

#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    items: BTreeMap<ItemId, ItemRecord>,
    descriptions: HashMap<(ItemId, LanguageId), ItemDescriptionRecord>,
    categories: BTreeMap<CategoryId, Option<CategoryId>>,
    category_names: HashMap<(CategoryId, LanguageId), String>,
    item_categories: BTreeSet<(ItemId, CategoryId)>,
    authors: BTreeMap<AuthorId, AuthorRecord>,
    item_authors: BTreeSet<(ItemId, AuthorId)>,
    publishers: BTreeMap<PublisherId, PublisherRecord>,
    item_publishers: BTreeSet<(ItemId, PublisherId)>,
    images: Vec<ItemImageRecord>,
    legacy_ids: BTreeMap<LegacyItemId, ItemId>,
    reviews: BTreeMap<ReviewId, ReviewRecord>,
    unavailable: bool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ItemRecord) -> Self {
        self.items.insert(item.item_id, item);
        self
    }

    pub fn with_description(
        mut self,
        description: ItemDescriptionRecord,
    ) -> Self {
        self.descriptions
            .insert(
                (description.item_id, description.language_id),
                description,
            );
        self
    }

    pub fn with_category(
        mut self,
        category_id: CategoryId,
        parent_id: Option<CategoryId>,
    ) -> Self {
        self.categories.insert(category_id, parent_id);
        self
    }

    pub fn with_category_name(
        mut self,
        category_id: CategoryId,
        language_id: LanguageId,
        name: impl Into<String>,
    ) -> Self {
        self.category_names
            .insert((category_id, language_id), name.into());
        self
    }

    pub fn link_category(
        mut self,
        item_id: ItemId,
        category_id: CategoryId,
    ) -> Self {
        self.item_categories.insert((item_id, category_id));
        self
    }

    pub fn with_author(mut self, author: AuthorRecord) -> Self {
        self.authors.insert(author.author_id, author);
        self
    }

    pub fn link_author(mut self, item_id: ItemId, author_id: AuthorId) -> Self {
        self.item_authors.insert((item_id, author_id));
        self
    }

    pub fn with_publisher(mut self, publisher: PublisherRecord) -> Self {
        self.publishers.insert(publisher.publisher_id, publisher);
        self
    }

    pub fn link_publisher(
        mut self,
        item_id: ItemId,
        publisher_id: PublisherId,
    ) -> Self {
        self.item_publishers.insert((item_id, publisher_id));
        self
    }

    pub fn with_image(mut self, image: ItemImageRecord) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_legacy_id(
        mut self,
        legacy_id: LegacyItemId,
        item_id: ItemId,
    ) -> Self {
        self.legacy_ids.insert(legacy_id, item_id);
        self
    }

    pub fn with_review(mut self, review: ReviewRecord) -> Self {
        self.reviews.insert(review.review_id, review);
        self
    }

    /// Make every call fail as if the database were unreachable.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            Err(CatalogError::StoreUnavailable(
                "in-memory catalog is marked unavailable".into(),
            ))
        } else {
            Ok(())
        }
    }

    fn matches(
        &self,
        plan: &SearchPlan,
        item: &ItemRecord,
        description: Option<&ItemDescriptionRecord>,
    ) -> bool {
        let filter = &plan.filter;

        if !item.is_active() {
            return false;
        }
        if plan.description == DescriptionJoin::Required
            && description.is_none()
        {
            return false;
        }

        if let Some(keyword) = filter.keyword.as_deref() {
            let needle = keyword.to_lowercase();
            let hit = |text: &str| text.to_lowercase().contains(&needle);
            let text_hit = description.is_some_and(|d| {
                hit(&d.name) || hit(&d.description) || hit(&d.meta_keyword)
            });
            if !(text_hit || hit(&item.model) || hit(&item.sku)) {
                return false;
            }
        }

        if !filter.category_ids.is_empty()
            && !filter
                .category_ids
                .iter()
                .any(|c| self.item_categories.contains(&(item.item_id, *c)))
        {
            return false;
        }

        if !filter.author_ids.is_empty()
            && !filter
                .author_ids
                .iter()
                .any(|a| self.item_authors.contains(&(item.item_id, *a)))
        {
            return false;
        }

        if !filter.publisher_ids.is_empty()
            && !filter
                .publisher_ids
                .iter()
                .any(|p| self.item_publishers.contains(&(item.item_id, *p)))
        {
            return false;
        }

        if filter.price_min.is_some_and(|min| item.price < min) {
            return false;
        }
        if filter.price_max.is_some_and(|max| item.price > max) {
            return false;
        }
        if filter.in_stock_only && !item.in_stock() {
            return false;
        }

        true
    }

    fn category_record(
        &self,
        category_id: CategoryId,
        language_id: LanguageId,
    ) -> Option<CategoryRecord> {
        self.categories.get(&category_id).map(|parent_id| CategoryRecord {
            category_id,
            parent_id: *parent_id,
            name: self.category_names.get(&(category_id, language_id)).cloned(),
        })
    }
}

type Candidate<'a> = (&'a ItemRecord, Option<&'a ItemDescriptionRecord>);

/// Mirrors the SQL `ORDER BY`: primary key, nulls last for names, then
/// `item_id` ascending.
fn compare_candidates(
    ordering: ItemOrdering,
    a: &Candidate<'_>,
    b: &Candidate<'_>,
) -> Ordering {
    let (item_a, desc_a) = a;
    let (item_b, desc_b) = b;
    let name = |d: &Option<&ItemDescriptionRecord>| {
        d.map(|d| d.name.to_lowercase())
    };

    let primary = match ordering {
        ItemOrdering::PriceAsc => item_a.price.cmp(&item_b.price),
        ItemOrdering::PriceDesc => item_b.price.cmp(&item_a.price),
        ItemOrdering::NameAsc | ItemOrdering::NameDesc => {
            match (name(desc_a), name(desc_b)) {
                (Some(x), Some(y)) if ordering == ItemOrdering::NameAsc => {
                    x.cmp(&y)
                }
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        ItemOrdering::DateAddedDesc => {
            item_b.date_added.cmp(&item_a.date_added)
        }
        ItemOrdering::DateAddedAsc => item_a.date_added.cmp(&item_b.date_added),
        ItemOrdering::ViewedDesc => item_b.viewed.cmp(&item_a.viewed),
        ItemOrdering::ItemIdAsc => Ordering::Equal,
    };

    primary.then_with(|| item_a.item_id.cmp(&item_b.item_id))
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn search_item_ids(&self, plan: &SearchPlan) -> Result<ItemIdPage> {
        self.check_available()?;

        let mut candidates: Vec<Candidate<'_>> = self
            .items
            .values()
            .map(|item| {
                let description =
                    self.descriptions.get(&(item.item_id, plan.language_id));
                (item, description)
            })
            .filter(|(item, description)| {
                self.matches(plan, item, *description)
            })
            .collect();

        candidates.sort_by(|a, b| compare_candidates(plan.ordering, a, b));

        let total = candidates.len() as u64;
        let item_ids = candidates
            .into_iter()
            .skip(plan.page.offset() as usize)
            .take(plan.page.limit() as usize)
            .map(|(item, _)| item.item_id)
            .collect();

        Ok(ItemIdPage { item_ids, total })
    }

    async fn active_items(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>> {
        self.check_available()?;
        Ok(ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .filter(|item| item.is_active())
            .cloned()
            .collect())
    }

    async fn descriptions(
        &self,
        ids: &[ItemId],
        language_id: LanguageId,
    ) -> Result<Vec<ItemDescriptionRecord>> {
        self.check_available()?;
        Ok(ids
            .iter()
            .filter_map(|id| self.descriptions.get(&(*id, language_id)))
            .cloned()
            .collect())
    }

    async fn legacy_ids(
        &self,
        ids: &[ItemId],
    ) -> Result<HashMap<ItemId, LegacyItemId>> {
        self.check_available()?;
        let mut mapped = HashMap::new();
        // BTreeMap iteration is ascending, so the lowest legacy id wins.
        for (legacy_id, item_id) in &self.legacy_ids {
            if ids.contains(item_id) {
                mapped.entry(*item_id).or_insert(*legacy_id);
            }
        }
        Ok(mapped)
    }

    async fn resolve_legacy_id(
        &self,
        legacy_id: LegacyItemId,
    ) -> Result<Option<ItemId>> {
        self.check_available()?;
        Ok(self.legacy_ids.get(&legacy_id).copied())
    }

    async fn item_categories(
        &self,
        item_id: ItemId,
        language_id: LanguageId,
    ) -> Result<Vec<CategoryRecord>> {
        self.check_available()?;
        Ok(self
            .item_categories
            .iter()
            .filter(|(linked, _)| *linked == item_id)
            .filter_map(|(_, category_id)| {
                self.category_record(*category_id, language_id)
            })
            .collect())
    }

    async fn category(
        &self,
        category_id: CategoryId,
        language_id: LanguageId,
    ) -> Result<Option<CategoryRecord>> {
        self.check_available()?;
        Ok(self.category_record(category_id, language_id))
    }

    async fn item_authors(&self, item_id: ItemId) -> Result<Vec<AuthorRecord>> {
        self.check_available()?;
        Ok(self
            .item_authors
            .iter()
            .filter(|(linked, _)| *linked == item_id)
            .filter_map(|(_, author_id)| self.authors.get(author_id))
            .filter(|author| author.status)
            .cloned()
            .collect())
    }

    async fn item_publishers(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<PublisherRecord>> {
        self.check_available()?;
        Ok(self
            .item_publishers
            .iter()
            .filter(|(linked, _)| *linked == item_id)
            .filter_map(|(_, publisher_id)| self.publishers.get(publisher_id))
            .filter(|publisher| publisher.status)
            .cloned()
            .collect())
    }

    async fn item_images(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<ItemImageRecord>> {
        self.check_available()?;
        let mut images: Vec<ItemImageRecord> = self
            .images
            .iter()
            .filter(|image| image.item_id == item_id)
            .cloned()
            .collect();
        images.sort_by_key(|image| (image.sort_order, image.item_image_id));
        Ok(images)
    }

    async fn approved_reviews(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<ReviewRecord>> {
        self.check_available()?;
        Ok(self
            .reviews
            .values()
            .filter(|review| review.item_id == item_id && review.status)
            .cloned()
            .collect())
    }

    async fn approved_review(
        &self,
        review_id: ReviewId,
    ) -> Result<Option<ReviewRecord>> {
        self.check_available()?;
        Ok(self
            .reviews
            .get(&review_id)
            .filter(|review| review.status)
            .cloned())
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}
