//! Query composition: request parsing, search plans and their SQL form.

pub mod criteria;
pub mod params;
pub mod sql;

pub use criteria::{
    DEFAULT_PAGE_SIZE, DescriptionJoin, ItemFilter, ItemOrdering, MAX_PAGE_SIZE,
    PageRequest, ProductListCriteria, SearchCriteria, SearchPlan, SortBy,
};
pub use params::parse_path_id;
