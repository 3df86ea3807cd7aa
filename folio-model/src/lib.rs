//! Shared data models for the Folio bookstore catalog.
//!
//! - [`ids`]: strongly typed identifiers
//! - [`records`]: rows as persisted in the catalog store
//! - [`views`]: denormalized JSON shapes served to clients (requires `serde`)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod ids;
pub mod records;

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod views;

pub use ids::{
    AuthorId, CategoryId, ItemId, LanguageId, LegacyItemId, PublisherId,
    ReviewId,
};
pub use records::{
    AuthorRecord, CategoryRecord, ItemDescriptionRecord, ItemImageRecord,
    ItemRecord, PublisherRecord, ReviewRecord,
};

#[cfg(feature = "serde")]
pub use views::{
    CategoryRef, ContributorRef, Discount, ItemDetailView, ItemDetails,
    ItemLabel, ItemSummaryView, LabelType, Pagination, ProductDetail,
    ProductEnvelope, ReviewView, SearchResult, StockStatus,
};
