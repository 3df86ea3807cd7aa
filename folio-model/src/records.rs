//! Rows as they are stored in the catalog.
//!
//! These mirror the persisted tables one to one. They never leave the
//! process; the HTTP surface only ever sees the view types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::ids::{
    AuthorId, CategoryId, ItemId, LanguageId, PublisherId, ReviewId,
};

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemRecord {
    pub item_id: ItemId,
    pub model: String,
    pub sku: String,
    pub isbn: String,
    pub quantity: i32,
    /// Path of the primary image relative to the image base URL.
    pub image: Option<String>,
    pub manufacturer_id: i64,
    pub price: Decimal,
    pub weight: Decimal,
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    /// Only active items are visible to search and detail lookups.
    pub status: bool,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    /// View counter, used as the best-seller proxy.
    pub viewed: i32,
}

impl ItemRecord {
    pub fn is_active(&self) -> bool {
        self.status
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Per-locale text of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemDescriptionRecord {
    pub item_id: ItemId,
    pub language_id: LanguageId,
    pub name: String,
    pub description: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keyword: String,
    /// Comma separated tag list.
    pub tag: String,
}

/// A category with its name resolved for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategoryRecord {
    pub category_id: CategoryId,
    pub parent_id: Option<CategoryId>,
    /// `None` when the category has no description in the requested locale.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuthorRecord {
    pub author_id: AuthorId,
    pub name: String,
    pub image: Option<String>,
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PublisherRecord {
    pub publisher_id: PublisherId,
    pub name: String,
    pub image: Option<String>,
    pub status: bool,
}

/// Secondary image of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemImageRecord {
    pub item_image_id: i64,
    pub item_id: ItemId,
    pub image: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReviewRecord {
    pub review_id: ReviewId,
    pub item_id: ItemId,
    pub customer_name: String,
    pub rating: i32,
    pub comment: String,
    /// Approval flag; unapproved reviews are never exposed.
    pub status: bool,
    pub date_added: DateTime<Utc>,
}
