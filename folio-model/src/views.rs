//! Denormalized response shapes served to storefront clients.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Availability derived from quantity on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

impl StockStatus {
    pub fn from_quantity(quantity: i32) -> Self {
        if quantity > 0 {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelType {
    #[serde(rename = "NEW_ARRIVAL")]
    NewArrival,
    #[serde(rename = "NONE")]
    Unlabeled,
}

/// Badge block rendered on item cards and detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLabel {
    pub label: Option<LabelType>,
    pub show_label: bool,
    pub label_type: LabelType,
}

impl ItemLabel {
    pub const fn new_arrival() -> Self {
        Self {
            label: Some(LabelType::NewArrival),
            show_label: true,
            label_type: LabelType::NewArrival,
        }
    }

    pub const fn none() -> Self {
        Self {
            label: None,
            show_label: false,
            label_type: LabelType::Unlabeled,
        }
    }
}

/// Simulated markdown shown next to the selling price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Discount {
    pub original_price: Option<Decimal>,
    pub discount_percentage: Option<u8>,
}

/// One card in a search or listing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummaryView {
    /// Id as exposed to clients; the legacy id when one is mapped.
    pub item_id: i64,
    pub name: String,
    pub image_url: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    pub discount_percentage: Option<u8>,
    pub stock_status: StockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ItemLabel>,
}

/// Author or publisher reference on a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRef {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    /// Query fragment that reproduces a search filtered on this contributor,
    /// e.g. `authorId=12`.
    pub search_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub search_filter: String,
}

/// Attribute table on the detail page. Numeric values are rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Weight")]
    pub weight: String,
    #[serde(rename = "Height")]
    pub height: String,
    #[serde(rename = "Width")]
    pub width: String,
    #[serde(rename = "Length")]
    pub length: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailView {
    /// Echo of the id the client asked for.
    pub item_id: i64,
    pub title: String,
    pub sub_title: Option<String>,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub more_images: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    pub discount_percentage: Option<u8>,
    pub stock_status: StockStatus,
    pub short_description: String,
    pub details: ItemDetails,
    pub authors: Vec<ContributorRef>,
    pub publishers: Vec<ContributorRef>,
    pub categories: Vec<CategoryRef>,
    pub highlights: Vec<String>,
    pub policy_text: Option<String>,
    pub label: ItemLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub display_text: String,
    pub items: Vec<ItemSummaryView>,
    pub pagination: Pagination,
}

/// Compact product record served by the product detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product_id: i64,
    pub name: String,
    /// Price rendered with its stored scale, e.g. `"12.50"`.
    pub price: String,
    /// Absolute image URL, empty when the item has no image.
    pub image: String,
    pub description: String,
    pub quantity: i32,
    /// Mean rating over approved reviews, `0.0` without any.
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub status: String,
    pub data: ProductDetail,
}

impl ProductEnvelope {
    pub fn success(data: ProductDetail) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewView {
    pub review_id: i64,
    pub customer_name: String,
    pub rating: i32,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_serializes_with_screaming_case_tokens() {
        let value = serde_json::to_value(ItemLabel::new_arrival()).unwrap();
        assert_eq!(
            value,
            json!({
                "label": "NEW_ARRIVAL",
                "showLabel": true,
                "labelType": "NEW_ARRIVAL"
            })
        );

        let value = serde_json::to_value(ItemLabel::none()).unwrap();
        assert_eq!(
            value,
            json!({"label": null, "showLabel": false, "labelType": "NONE"})
        );
    }

    #[test]
    fn summary_renders_prices_as_numbers() {
        let view = ItemSummaryView {
            item_id: 9,
            name: "Rust in Action".into(),
            image_url: None,
            price: Decimal::new(2000, 2),
            original_price: Some(Decimal::new(2200, 2)),
            discount_percentage: Some(10),
            stock_status: StockStatus::InStock,
            label: None,
        };

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["itemId"], json!(9));
        assert_eq!(value["price"], json!(20.0));
        assert_eq!(value["originalPrice"], json!(22.0));
        assert_eq!(value["stockStatus"], json!("IN_STOCK"));
        assert!(value.get("label").is_none());
    }

    #[test]
    fn details_use_title_case_keys() {
        let details = ItemDetails {
            isbn: "978".into(),
            sku: "SKU-1".into(),
            model: "M1".into(),
            manufacturer: "3".into(),
            weight: "0.50".into(),
            height: "1".into(),
            width: "2".into(),
            length: "3".into(),
        };
        let value = serde_json::to_value(details).unwrap();
        assert_eq!(value["ISBN"], json!("978"));
        assert_eq!(value["Manufacturer"], json!("3"));
        assert_eq!(value["Length"], json!("3"));
    }
}
