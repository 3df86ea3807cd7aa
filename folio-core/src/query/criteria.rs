use folio_model::{
    AuthorId, CategoryId, LanguageId, PublisherId, views::Pagination,
};
use rust_decimal::Decimal;

use crate::error::{CatalogError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Client-facing sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    YearNewest,
    YearOldest,
    BestSellers,
}

impl SortBy {
    /// Unknown keys fall back to [`SortBy::Relevance`] instead of failing.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "price_asc" => SortBy::PriceAsc,
            "price_desc" => SortBy::PriceDesc,
            "name_asc" => SortBy::NameAsc,
            "name_desc" => SortBy::NameDesc,
            "year_newest" => SortBy::YearNewest,
            "year_oldest" => SortBy::YearOldest,
            "best_sellers" => SortBy::BestSellers,
            _ => SortBy::Relevance,
        }
    }

    /// Relevance has no scoring function; it sorts by recency.
    pub fn ordering(self) -> ItemOrdering {
        match self {
            SortBy::PriceAsc => ItemOrdering::PriceAsc,
            SortBy::PriceDesc => ItemOrdering::PriceDesc,
            SortBy::NameAsc => ItemOrdering::NameAsc,
            SortBy::NameDesc => ItemOrdering::NameDesc,
            SortBy::YearNewest | SortBy::Relevance => {
                ItemOrdering::DateAddedDesc
            }
            SortBy::YearOldest => ItemOrdering::DateAddedAsc,
            SortBy::BestSellers => ItemOrdering::ViewedDesc,
        }
    }
}

/// Store-level ordering. Every variant breaks ties on `item_id` ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrdering {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    DateAddedDesc,
    DateAddedAsc,
    ViewedDesc,
    ItemIdAsc,
}

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page < 1 {
            return Err(CatalogError::validation("page must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CatalogError::validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(u64::from(self.page_size))
    }

    pub fn pagination(&self, total_items: u64) -> Pagination {
        Pagination {
            current_page: self.page,
            page_size: self.page_size,
            total_items,
            total_pages: self.total_pages(total_items),
        }
    }
}

/// Predicates applied to active items. Filters of different kinds AND
/// together; ids within one kind OR together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring over name, description, meta keywords,
    /// model and SKU.
    pub keyword: Option<String>,
    pub category_ids: Vec<CategoryId>,
    pub author_ids: Vec<AuthorId>,
    pub publisher_ids: Vec<PublisherId>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub in_stock_only: bool,
}

/// How the default-locale description participates in a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionJoin {
    /// Items without a description row are excluded, count included.
    Required,
    /// Items without a description row are still listed.
    Optional,
}

/// Everything the store needs to answer one page of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub language_id: LanguageId,
    pub filter: ItemFilter,
    pub ordering: ItemOrdering,
    pub page: PageRequest,
    pub description: DescriptionJoin,
}

/// A validated item search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub filter: ItemFilter,
    pub sort_by: SortBy,
    pub page: PageRequest,
}

impl SearchCriteria {
    pub fn plan(&self, language_id: LanguageId) -> SearchPlan {
        SearchPlan {
            language_id,
            filter: self.filter.clone(),
            ordering: self.sort_by.ordering(),
            page: self.page,
            description: DescriptionJoin::Required,
        }
    }

    /// The single category this search narrows to, if exactly one was given.
    pub fn sole_category(&self) -> Option<CategoryId> {
        match self.filter.category_ids.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// Product listing request: internal ids, optional single category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListCriteria {
    pub category_id: Option<CategoryId>,
    pub page: PageRequest,
}

impl ProductListCriteria {
    pub fn plan(&self, language_id: LanguageId) -> SearchPlan {
        SearchPlan {
            language_id,
            filter: ItemFilter {
                category_ids: self.category_id.into_iter().collect(),
                ..ItemFilter::default()
            },
            ordering: ItemOrdering::ItemIdAsc,
            page: self.page,
            description: DescriptionJoin::Optional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_key_falls_back_to_relevance() {
        assert_eq!(SortBy::parse_lenient("cheapest"), SortBy::Relevance);
        assert_eq!(SortBy::parse_lenient("PRICE_DESC"), SortBy::PriceDesc);
        assert_eq!(
            SortBy::Relevance.ordering(),
            SortBy::YearNewest.ordering()
        );
        assert_eq!(SortBy::BestSellers.ordering(), ItemOrdering::ViewedDesc);
    }

    #[test]
    fn page_window_offsets_and_totals() {
        let page = PageRequest::new(3, 20).unwrap();
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(40), 2);
        assert_eq!(page.total_pages(41), 3);
    }

    #[test]
    fn page_bounds_are_enforced() {
        assert!(PageRequest::new(0, 20).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(1, 100).is_ok());
    }

    #[test]
    fn pagination_block_reflects_request() {
        let pagination = PageRequest::new(2, 10).unwrap().pagination(25);
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.page_size, 10);
        assert_eq!(pagination.total_items, 25);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn product_listing_plan_orders_by_id_and_tolerates_missing_text() {
        let criteria = ProductListCriteria {
            category_id: Some(CategoryId(4)),
            page: PageRequest::default(),
        };
        let plan = criteria.plan(LanguageId::DEFAULT);
        assert_eq!(plan.ordering, ItemOrdering::ItemIdAsc);
        assert_eq!(plan.description, DescriptionJoin::Optional);
        assert_eq!(plan.filter.category_ids, vec![CategoryId(4)]);
    }
}
