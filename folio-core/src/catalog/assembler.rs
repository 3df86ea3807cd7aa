use std::{collections::HashMap, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use folio_model::{
    CategoryRef, ContributorRef, ItemDescriptionRecord, ItemDetailView, ItemId,
    ItemLabel, ItemRecord, ItemSummaryView, LegacyItemId, StockStatus,
};
use tracing::warn;

use super::rules::{self, CatalogSettings};
use crate::database::CatalogRepository;
use crate::error::{CatalogError, Result};

/// Hydrates item ids into the denormalized views served to clients.
#[derive(Clone)]
pub struct ViewAssembler {
    store: Arc<dyn CatalogRepository>,
    settings: Arc<CatalogSettings>,
}

impl fmt::Debug for ViewAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewAssembler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ViewAssembler {
    pub fn new(
        store: Arc<dyn CatalogRepository>,
        settings: Arc<CatalogSettings>,
    ) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Summary card for a single internal id.
    pub async fn summarize(&self, item_id: ItemId) -> Result<ItemSummaryView> {
        self.summarize_many(&[item_id])
            .await?
            .pop()
            .ok_or_else(|| CatalogError::not_found("Item not found"))
    }

    /// Summary cards in the order of `ids`. Items that are gone or have no
    /// default-locale description are skipped.
    pub async fn summarize_many(
        &self,
        ids: &[ItemId],
    ) -> Result<Vec<ItemSummaryView>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let language_id = self.settings.language_id;
        let (items, descriptions, legacy_ids) = tokio::try_join!(
            self.store.active_items(ids),
            self.store.descriptions(ids, language_id),
            self.store.legacy_ids(ids),
        )?;

        let items = index_items(items);
        let descriptions = index_descriptions(descriptions);

        let mut views = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(item) = items.get(id) else {
                continue;
            };
            let Some(description) = descriptions.get(id) else {
                warn!(
                    item_id = %id,
                    language_id = %language_id,
                    "item has no description; skipping from results"
                );
                continue;
            };

            let external_id = legacy_ids
                .get(id)
                .copied()
                .unwrap_or_else(|| id.as_legacy());
            let discount = rules::simulated_discount(item.item_id, item.price);

            views.push(ItemSummaryView {
                item_id: external_id.get(),
                name: description.name.clone(),
                image_url: self.settings.image_url(item.image.as_deref()),
                price: item.price,
                original_price: discount.original_price,
                discount_percentage: discount.discount_percentage,
                stock_status: StockStatus::from_quantity(item.quantity),
                label: None,
            });
        }

        Ok(views)
    }

    /// Listing cards keyed by internal id. A missing description yields an
    /// empty name instead of dropping the item.
    pub async fn product_cards(
        &self,
        ids: &[ItemId],
    ) -> Result<Vec<ItemSummaryView>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let (items, descriptions) = tokio::try_join!(
            self.store.active_items(ids),
            self.store.descriptions(ids, self.settings.language_id),
        )?;
        let items = index_items(items);
        let descriptions = index_descriptions(descriptions);

        Ok(ids
            .iter()
            .filter_map(|id| items.get(id))
            .map(|item| ItemSummaryView {
                item_id: item.item_id.get(),
                name: descriptions
                    .get(&item.item_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default(),
                image_url: self.settings.image_url(item.image.as_deref()),
                price: item.price,
                original_price: None,
                discount_percentage: None,
                stock_status: StockStatus::from_quantity(item.quantity),
                label: Some(ItemLabel::none()),
            })
            .collect())
    }

    /// Full detail view. `external_id` is tried as a legacy id first, then
    /// as an internal id, and is echoed back unchanged.
    pub async fn detail(
        &self,
        external_id: LegacyItemId,
        now: DateTime<Utc>,
    ) -> Result<ItemDetailView> {
        let item_id = self
            .store
            .resolve_legacy_id(external_id)
            .await?
            .unwrap_or_else(|| external_id.as_internal());
        let language_id = self.settings.language_id;

        let ids = [item_id];
        let (items, descriptions) = tokio::try_join!(
            self.store.active_items(&ids),
            self.store.descriptions(&ids, language_id),
        )?;

        let item = items
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::not_found("Item not found"))?;
        let description = descriptions.into_iter().next().ok_or_else(|| {
            warn!(
                item_id = %item_id,
                language_id = %language_id,
                "active item has no description"
            );
            CatalogError::not_found("Item description not found")
        })?;

        let (categories, images, authors, publishers) = tokio::try_join!(
            self.store.item_categories(item_id, language_id),
            self.store.item_images(item_id),
            self.store.item_authors(item_id),
            self.store.item_publishers(item_id),
        )?;

        let categories = categories
            .into_iter()
            .map(|category| {
                let id = category.category_id;
                let name = category.name.unwrap_or_else(|| {
                    warn!(
                        category_id = %id,
                        language_id = %language_id,
                        "category has no description"
                    );
                    format!("Category {id}")
                });
                CategoryRef {
                    id: id.get(),
                    name,
                    search_filter: format!("categoryId={id}"),
                }
            })
            .collect();

        let more_images = images
            .iter()
            .filter_map(|image| self.settings.image_url(image.image.as_deref()))
            .collect();

        let authors = authors
            .into_iter()
            .map(|author| ContributorRef {
                id: author.author_id.get(),
                image_url: self.settings.image_url(author.image.as_deref()),
                search_filter: format!("authorId={}", author.author_id),
                name: author.name,
            })
            .collect();

        let publishers = publishers
            .into_iter()
            .map(|publisher| ContributorRef {
                id: publisher.publisher_id.get(),
                image_url: self.settings.image_url(publisher.image.as_deref()),
                search_filter: format!(
                    "publisherId={}",
                    publisher.publisher_id
                ),
                name: publisher.name,
            })
            .collect();

        Ok(self.compose_detail(
            external_id,
            &item,
            description,
            DetailParts {
                categories,
                more_images,
                authors,
                publishers,
            },
            now,
        ))
    }

    fn compose_detail(
        &self,
        external_id: LegacyItemId,
        item: &ItemRecord,
        description: ItemDescriptionRecord,
        parts: DetailParts,
        now: DateTime<Utc>,
    ) -> ItemDetailView {
        let discount = rules::simulated_discount(item.item_id, item.price);
        ItemDetailView {
            item_id: external_id.get(),
            title: description.name,
            sub_title: None,
            description: description.description,
            cover_image_url: self.settings.image_url(item.image.as_deref()),
            more_images: parts.more_images,
            price: item.price,
            original_price: discount.original_price,
            discount_percentage: discount.discount_percentage,
            stock_status: StockStatus::from_quantity(item.quantity),
            short_description: description.meta_description,
            details: rules::details_of(item),
            authors: parts.authors,
            publishers: parts.publishers,
            categories: parts.categories,
            highlights: rules::highlights(&description.tag),
            policy_text: None,
            label: self.settings.label_for(item.date_added, now),
        }
    }
}

struct DetailParts {
    categories: Vec<CategoryRef>,
    more_images: Vec<String>,
    authors: Vec<ContributorRef>,
    publishers: Vec<ContributorRef>,
}

fn index_items(items: Vec<ItemRecord>) -> HashMap<ItemId, ItemRecord> {
    items.into_iter().map(|item| (item.item_id, item)).collect()
}

fn index_descriptions(
    descriptions: Vec<ItemDescriptionRecord>,
) -> HashMap<ItemId, ItemDescriptionRecord> {
    descriptions
        .into_iter()
        .map(|description| (description.item_id, description))
        .collect()
}
