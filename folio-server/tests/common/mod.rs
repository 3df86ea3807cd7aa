#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum_test::TestServer;
use chrono::{Duration as ChronoDuration, Utc};
use folio_config::{
    CatalogConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig,
    ServerConfig,
};
use folio_core::{
    catalog::{CatalogService, CatalogSettings},
    database::InMemoryCatalog,
};
use folio_model::{
    AuthorId, AuthorRecord, CategoryId, ItemDescriptionRecord, ItemId,
    ItemImageRecord, ItemRecord, LanguageId, LegacyItemId, PublisherId,
    PublisherRecord, ReviewId, ReviewRecord,
};
use folio_server::{AppState, create_app};
use rust_decimal::Decimal;

pub const IMAGE_BASE: &str = "https://img.folio.test/catalog/";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            primary_url: None,
            max_connections: 2,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        },
        catalog: CatalogConfig {
            image_base_url: IMAGE_BASE.to_string(),
            default_language_id: 1,
            new_arrival_days: 30,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allowed_methods: vec!["GET".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string()],
            allow_credentials: false,
        },
        dev_mode: false,
        metadata: ConfigMetadata::default(),
    }
}

fn item(id: i64, price: Decimal, quantity: i32, age_days: i64) -> ItemRecord {
    let added = Utc::now() - ChronoDuration::days(age_days);
    ItemRecord {
        item_id: ItemId(id),
        model: format!("MODEL-{id}"),
        sku: format!("SKU-{id}"),
        isbn: format!("978000000{id:04}"),
        quantity,
        image: Some(format!("books/{id}.jpg")),
        manufacturer_id: 3,
        price,
        weight: Decimal::new(12, 1),
        length: Decimal::ZERO,
        width: Decimal::ZERO,
        height: Decimal::ZERO,
        status: true,
        date_added: added,
        date_modified: added,
        viewed: 0,
    }
}

fn description(id: i64, name: &str, text: &str) -> ItemDescriptionRecord {
    ItemDescriptionRecord {
        item_id: ItemId(id),
        language_id: LanguageId::DEFAULT,
        name: name.to_string(),
        description: text.to_string(),
        meta_title: String::new(),
        meta_description: format!("{name} in brief"),
        meta_keyword: String::new(),
        tag: "bestseller, hardcover".to_string(),
    }
}

fn review(id: i64, item_id: i64, rating: i32, approved: bool) -> ReviewRecord {
    ReviewRecord {
        review_id: ReviewId(id),
        item_id: ItemId(item_id),
        customer_name: format!("Reader {id}"),
        rating,
        comment: "Worth it".to_string(),
        status: approved,
        date_added: Utc::now(),
    }
}

/// Two active books, one retired book, one mapped legacy id and a mix of
/// approved and pending reviews.
pub fn seeded_catalog() -> InMemoryCatalog {
    let mut retired = item(3, Decimal::new(1000, 2), 4, 90);
    retired.status = false;

    InMemoryCatalog::new()
        .with_item(item(1, Decimal::new(3999, 2), 12, 5))
        .with_description(description(
            1,
            "Rust in Action",
            "Systems programming",
        ))
        .with_item(item(2, Decimal::new(5500, 2), 0, 60))
        .with_description(description(2, "Applied AI", "Models in practice"))
        .with_item(retired)
        .with_description(description(3, "Retired Title", "Gone"))
        .with_category(CategoryId(10), None)
        .with_category_name(CategoryId(10), LanguageId::DEFAULT, "Computing")
        .link_category(ItemId(1), CategoryId(10))
        .link_category(ItemId(2), CategoryId(10))
        .with_author(AuthorRecord {
            author_id: AuthorId(100),
            name: "Tim McNamara".to_string(),
            image: None,
            status: true,
        })
        .link_author(ItemId(1), AuthorId(100))
        .with_publisher(PublisherRecord {
            publisher_id: PublisherId(200),
            name: "Manning".to_string(),
            image: Some("publishers/manning.png".to_string()),
            status: true,
        })
        .link_publisher(ItemId(1), PublisherId(200))
        .with_image(ItemImageRecord {
            item_image_id: 1,
            item_id: ItemId(1),
            image: Some("books/1-back.jpg".to_string()),
            sort_order: 1,
        })
        .with_legacy_id(LegacyItemId(5001), ItemId(1))
        .with_review(review(1, 1, 5, true))
        .with_review(review(2, 1, 1, false))
        .with_review(review(3, 1, 4, true))
}

pub fn server_with(store: InMemoryCatalog) -> TestServer {
    let config = test_config();
    let settings = CatalogSettings::new(
        config.catalog.image_base_url.clone(),
        LanguageId::new(config.catalog.default_language_id),
        config.catalog.new_arrival_days,
    );
    let catalog = CatalogService::new(Arc::new(store), settings);
    let state = AppState::new(catalog, config);
    TestServer::new(create_app(state)).expect("test server starts")
}

pub fn test_server() -> TestServer {
    server_with(seeded_catalog())
}

/// `count` active, described books with ids `1..=count`.
pub fn bulk_catalog(count: i64) -> InMemoryCatalog {
    (1..=count).fold(InMemoryCatalog::new(), |store, id| {
        store
            .with_item(item(id, Decimal::new(id * 100, 2), 1, 10))
            .with_description(description(id, &format!("Book {id:02}"), ""))
    })
}
