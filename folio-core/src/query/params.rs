//! Parsing of raw query-string pairs into validated criteria.
//!
//! Pairs are taken as an ordered list so repeated keys
//! (`category_id=1&category_id=2`) survive. Both the snake_case names and the
//! camelCase spellings emitted in `searchFilter` strings are accepted.

use std::str::FromStr;

use folio_model::CategoryId;
use rust_decimal::Decimal;

use super::criteria::{
    DEFAULT_PAGE_SIZE, ItemFilter, PageRequest, ProductListCriteria,
    SearchCriteria, SortBy,
};
use crate::error::{CatalogError, Result};

const DEFAULT_LISTING_LIMIT: u32 = 10;

fn canonical_key(key: &str) -> Option<&'static str> {
    let key = match key {
        "q" => "q",
        "category_id" | "categoryId" => "category_id",
        "author_id" | "authorId" => "author_id",
        "publisher_id" | "publisherId" => "publisher_id",
        "price_min" | "priceMin" => "price_min",
        "price_max" | "priceMax" => "price_max",
        "exclude_out_of_stock" | "excludeOutOfStock" => "exclude_out_of_stock",
        "sort_by" | "sortBy" => "sort_by",
        "page" => "page",
        "page_size" | "pageSize" => "page_size",
        "limit" => "limit",
        _ => return None,
    };
    Some(key)
}

impl SearchCriteria {
    /// Validate an item search request. Unknown keys are ignored; for
    /// scalar keys the last occurrence wins.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut filter = ItemFilter::default();
        let mut sort_by = SortBy::default();
        let mut page = None;
        let mut page_size = None;

        for (raw_key, value) in pairs {
            let Some(key) = canonical_key(raw_key) else {
                continue;
            };
            match key {
                "q" => {
                    let trimmed = value.trim();
                    filter.keyword = (!trimmed.is_empty())
                        .then(|| trimmed.to_string());
                }
                "category_id" => {
                    extend_ids(&mut filter.category_ids, key, value)?
                }
                "author_id" => extend_ids(&mut filter.author_ids, key, value)?,
                "publisher_id" => {
                    extend_ids(&mut filter.publisher_ids, key, value)?
                }
                "price_min" => filter.price_min = parse_price(key, value)?,
                "price_max" => filter.price_max = parse_price(key, value)?,
                "exclude_out_of_stock" => {
                    filter.in_stock_only = parse_flag(key, value)?
                }
                "sort_by" => sort_by = SortBy::parse_lenient(value),
                "page" => page = parse_count(key, value)?,
                "page_size" => page_size = parse_count(key, value)?,
                _ => {}
            }
        }

        let page = PageRequest::new(
            page.unwrap_or(1),
            page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;

        Ok(SearchCriteria {
            filter,
            sort_by,
            page,
        })
    }
}

impl ProductListCriteria {
    /// Validate a product listing request (`page`, `limit`, `category_id`).
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut category_id = None;
        let mut page = None;
        let mut limit = None;

        for (raw_key, value) in pairs {
            match canonical_key(raw_key) {
                Some("category_id") if !value.trim().is_empty() => {
                    category_id =
                        Some(parse_id::<CategoryId>("category_id", value)?);
                }
                Some("page") => page = parse_count("page", value)?,
                Some("limit") => limit = parse_count("limit", value)?,
                _ => {}
            }
        }

        let page = PageRequest::new(
            page.unwrap_or(1),
            limit.unwrap_or(DEFAULT_LISTING_LIMIT),
        )?;

        Ok(ProductListCriteria { category_id, page })
    }
}

/// Parse a path segment holding a numeric identifier.
pub fn parse_path_id<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
{
    parse_id(name, raw)
}

fn parse_id<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
{
    raw.trim().parse::<T>().map_err(|_| {
        CatalogError::validation(format!("invalid {key} value '{raw}'"))
    })
}

/// Accept comma separated and repeated values; duplicates are dropped while
/// the first-seen order is kept.
fn extend_ids<T>(ids: &mut Vec<T>, key: &str, raw: &str) -> Result<()>
where
    T: FromStr + PartialEq,
{
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = parse_id::<T>(key, part)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(())
}

fn parse_price(key: &str, raw: &str) -> Result<Option<Decimal>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
        .map_err(|_| {
            CatalogError::validation(format!("invalid {key} value '{raw}'"))
        })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(CatalogError::validation(format!(
            "invalid {key} value '{raw}'"
        ))),
    }
}

fn parse_count(key: &str, raw: &str) -> Result<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed.parse::<i64>().map_err(|_| {
        CatalogError::validation(format!("invalid {key} value '{raw}'"))
    })?;
    u32::try_from(value).map(Some).map_err(|_| {
        CatalogError::validation(format!("{key} is out of range"))
    })
}
