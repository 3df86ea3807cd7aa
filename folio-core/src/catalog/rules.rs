//! Derived display fields computed from stored rows.

use chrono::{DateTime, Utc};
use folio_model::{
    Discount, ItemDetails, ItemId, ItemLabel, ItemRecord, LanguageId,
};
use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_IMAGE_BASE_URL: &str = "/image/catalog/";
pub const DEFAULT_NEW_ARRIVAL_DAYS: i64 = 30;

/// Catalog presentation settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Prefix joined with stored image paths. Always ends with `/`.
    image_base_url: String,
    pub language_id: LanguageId,
    pub new_arrival_days: i64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language_id: LanguageId::DEFAULT,
            new_arrival_days: DEFAULT_NEW_ARRIVAL_DAYS,
        }
    }
}

impl CatalogSettings {
    pub fn new(
        image_base_url: impl Into<String>,
        language_id: LanguageId,
        new_arrival_days: i64,
    ) -> Self {
        let mut image_base_url = image_base_url.into();
        if !image_base_url.ends_with('/') {
            image_base_url.push('/');
        }
        Self {
            image_base_url,
            language_id,
            new_arrival_days,
        }
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Absolute URL for a stored image path; `None` for a blank path.
    pub fn image_url(&self, path: Option<&str>) -> Option<String> {
        let path = path?.trim();
        if path.is_empty() {
            return None;
        }
        Some(format!(
            "{}{}",
            self.image_base_url,
            path.trim_start_matches('/')
        ))
    }

    pub fn label_for(
        &self,
        date_added: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ItemLabel {
        if is_new_arrival(date_added, now, self.new_arrival_days) {
            ItemLabel::new_arrival()
        } else {
            ItemLabel::none()
        }
    }
}

/// Placeholder markdown: every third item shows a 10% discount off a price
/// 10% above the selling price. Half-cent midpoints round up.
pub fn simulated_discount(item_id: ItemId, price: Decimal) -> Discount {
    if item_id.get().rem_euclid(3) != 0 {
        return Discount::default();
    }
    Discount {
        original_price: Some(
            (price * Decimal::new(11, 1)).round_dp_with_strategy(
                2,
                RoundingStrategy::MidpointAwayFromZero,
            ),
        ),
        discount_percentage: Some(10),
    }
}

/// Whole days elapsed since `date_added` are below `window_days`.
pub fn is_new_arrival(
    date_added: DateTime<Utc>,
    now: DateTime<Utc>,
    window_days: i64,
) -> bool {
    (now - date_added).num_days() < window_days
}

/// Split the comma separated tag list, dropping blanks.
pub fn highlights(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn details_of(item: &ItemRecord) -> ItemDetails {
    ItemDetails {
        isbn: item.isbn.clone(),
        sku: item.sku.clone(),
        model: item.model.clone(),
        manufacturer: item.manufacturer_id.to_string(),
        weight: item.weight.to_string(),
        height: item.height.to_string(),
        width: item.width.to_string(),
        length: item.length.to_string(),
    }
}
