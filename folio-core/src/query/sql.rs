use sqlx::{Postgres, QueryBuilder};

use super::criteria::{DescriptionJoin, ItemOrdering, SearchPlan};

/// What a search query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// `COUNT(*)` over the full filtered set.
    Count,
    /// One page of ordered `item_id`s.
    PageIds,
}

/// Composes the SQL for one [`SearchPlan`]. All user input is bound; only
/// fixed fragments are pushed as text.
pub struct ItemSearchQueryBuilder<'a> {
    plan: &'a SearchPlan,
    qb: QueryBuilder<'a, Postgres>,
    projection: Projection,
}

impl std::fmt::Debug for ItemSearchQueryBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemSearchQueryBuilder")
            .field("projection", &self.projection)
            .field("sql", &self.qb.sql())
            .finish()
    }
}

impl<'a> ItemSearchQueryBuilder<'a> {
    pub fn new(plan: &'a SearchPlan, projection: Projection) -> Self {
        let select = match projection {
            Projection::Count => "SELECT COUNT(*) FROM items i",
            Projection::PageIds => "SELECT i.item_id FROM items i",
        };
        let join = match plan.description {
            DescriptionJoin::Required => " JOIN item_descriptions d",
            DescriptionJoin::Optional => " LEFT JOIN item_descriptions d",
        };

        let mut qb = QueryBuilder::new(select);
        qb.push(join);
        qb.push(" ON d.item_id = i.item_id AND d.language_id = ");
        qb.push_bind(plan.language_id);
        qb.push(" WHERE i.status = TRUE");

        Self {
            plan,
            qb,
            projection,
        }
    }

    pub fn build(mut self) -> QueryBuilder<'a, Postgres> {
        self.apply_filters();
        if self.projection == Projection::PageIds {
            self.apply_sort();
            self.apply_window();
        }
        self.qb
    }

    fn apply_filters(&mut self) {
        let filter = &self.plan.filter;

        if let Some(keyword) = filter.keyword.as_deref() {
            let pattern = format!("%{}%", escape_like_literal(keyword));
            let columns = [
                "d.name",
                "d.description",
                "d.meta_keyword",
                "i.model",
                "i.sku",
            ];
            self.qb.push(" AND (");
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    self.qb.push(" OR ");
                }
                self.qb.push(*column);
                self.qb.push(" ILIKE ");
                self.qb.push_bind(pattern.clone());
            }
            self.qb.push(")");
        }

        if !filter.category_ids.is_empty() {
            let ids: Vec<i64> =
                filter.category_ids.iter().map(|id| id.get()).collect();
            self.qb.push(
                " AND EXISTS (SELECT 1 FROM item_categories ic \
                 WHERE ic.item_id = i.item_id AND ic.category_id = ANY(",
            );
            self.qb.push_bind(ids);
            self.qb.push("))");
        }

        if !filter.author_ids.is_empty() {
            let ids: Vec<i64> =
                filter.author_ids.iter().map(|id| id.get()).collect();
            self.qb.push(
                " AND EXISTS (SELECT 1 FROM item_authors ia \
                 WHERE ia.item_id = i.item_id AND ia.author_id = ANY(",
            );
            self.qb.push_bind(ids);
            self.qb.push("))");
        }

        if !filter.publisher_ids.is_empty() {
            let ids: Vec<i64> =
                filter.publisher_ids.iter().map(|id| id.get()).collect();
            self.qb.push(
                " AND EXISTS (SELECT 1 FROM item_publishers ip \
                 WHERE ip.item_id = i.item_id AND ip.publisher_id = ANY(",
            );
            self.qb.push_bind(ids);
            self.qb.push("))");
        }

        if let Some(min) = filter.price_min {
            self.qb.push(" AND i.price >= ");
            self.qb.push_bind(min);
        }

        if let Some(max) = filter.price_max {
            self.qb.push(" AND i.price <= ");
            self.qb.push_bind(max);
        }

        if filter.in_stock_only {
            self.qb.push(" AND i.quantity > 0");
        }
    }

    fn apply_sort(&mut self) {
        let primary = match self.plan.ordering {
            ItemOrdering::PriceAsc => Some("i.price ASC"),
            ItemOrdering::PriceDesc => Some("i.price DESC"),
            ItemOrdering::NameAsc => Some("LOWER(d.name) ASC NULLS LAST"),
            ItemOrdering::NameDesc => Some("LOWER(d.name) DESC NULLS LAST"),
            ItemOrdering::DateAddedDesc => Some("i.date_added DESC"),
            ItemOrdering::DateAddedAsc => Some("i.date_added ASC"),
            ItemOrdering::ViewedDesc => Some("i.viewed DESC"),
            ItemOrdering::ItemIdAsc => None,
        };

        self.qb.push(" ORDER BY ");
        if let Some(expr) = primary {
            self.qb.push(expr);
            self.qb.push(", ");
        }
        self.qb.push("i.item_id ASC");
    }

    fn apply_window(&mut self) {
        let page = self.plan.page;
        self.qb.push(" LIMIT ");
        self.qb.push_bind(page.limit() as i64);
        self.qb.push(" OFFSET ");
        self.qb.push_bind(page.offset() as i64);
    }
}

pub fn build_count_query(plan: &SearchPlan) -> QueryBuilder<'_, Postgres> {
    ItemSearchQueryBuilder::new(plan, Projection::Count).build()
}

pub fn build_page_query(plan: &SearchPlan) -> QueryBuilder<'_, Postgres> {
    ItemSearchQueryBuilder::new(plan, Projection::PageIds).build()
}

/// Escape LIKE metacharacters so a keyword only ever matches literally.
pub fn escape_like_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::criteria::{ItemFilter, PageRequest};
    use folio_model::{AuthorId, CategoryId, LanguageId, PublisherId};
    use rust_decimal::Decimal;

    fn plan_with(filter: ItemFilter, ordering: ItemOrdering) -> SearchPlan {
        SearchPlan {
            language_id: LanguageId::DEFAULT,
            filter,
            ordering,
            page: PageRequest::new(2, 20).unwrap(),
            description: DescriptionJoin::Required,
        }
    }

    #[test]
    fn base_query_restricts_to_active_items_with_description() {
        let plan =
            plan_with(ItemFilter::default(), ItemOrdering::DateAddedDesc);
        let qb = build_page_query(&plan);
        let sql = qb.sql();
        assert!(sql.starts_with(
            "SELECT i.item_id FROM items i JOIN item_descriptions d"
        ));
        assert!(sql.contains("d.language_id = $1"));
        assert!(sql.contains("WHERE i.status = TRUE"));
        assert!(sql.ends_with(
            "ORDER BY i.date_added DESC, i.item_id ASC LIMIT $2 OFFSET $3"
        ));
    }

    #[test]
    fn keyword_spans_all_text_columns() {
        let filter = ItemFilter {
            keyword: Some("AI".into()),
            ..ItemFilter::default()
        };
        let plan = plan_with(filter, ItemOrdering::DateAddedDesc);
        let qb = build_count_query(&plan);
        let sql = qb.sql();
        for column in
            ["d.name", "d.description", "d.meta_keyword", "i.model", "i.sku"]
        {
            assert!(
                sql.contains(&format!("{column} ILIKE")),
                "{column} missing"
            );
        }
        assert_eq!(sql.matches(" OR ").count(), 4);
    }

    #[test]
    fn link_filters_use_exists_subqueries() {
        let filter = ItemFilter {
            category_ids: vec![CategoryId(1), CategoryId(2)],
            author_ids: vec![AuthorId(3)],
            publisher_ids: vec![PublisherId(4)],
            ..ItemFilter::default()
        };
        let plan = plan_with(filter, ItemOrdering::PriceAsc);
        let qb = build_page_query(&plan);
        let sql = qb.sql();
        assert!(sql.contains("FROM item_categories ic"));
        assert!(sql.contains("ic.category_id = ANY("));
        assert!(sql.contains("FROM item_authors ia"));
        assert!(sql.contains("FROM item_publishers ip"));
        assert!(sql.contains("ORDER BY i.price ASC, i.item_id ASC"));
    }

    #[test]
    fn price_and_stock_filters_are_inclusive() {
        let filter = ItemFilter {
            price_min: Some(Decimal::new(10, 0)),
            price_max: Some(Decimal::new(20, 0)),
            in_stock_only: true,
            ..ItemFilter::default()
        };
        let plan = plan_with(filter, ItemOrdering::ViewedDesc);
        let qb = build_page_query(&plan);
        let sql = qb.sql();
        assert!(sql.contains("i.price >= $2"));
        assert!(sql.contains("i.price <= $3"));
        assert!(sql.contains("i.quantity > 0"));
        assert!(sql.contains("ORDER BY i.viewed DESC, i.item_id ASC"));
    }

    #[test]
    fn count_query_has_no_order_or_window() {
        let plan = plan_with(ItemFilter::default(), ItemOrdering::NameAsc);
        let qb = build_count_query(&plan);
        let sql = qb.sql();
        assert!(sql.starts_with("SELECT COUNT(*) FROM items i"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn optional_description_uses_left_join_and_id_order() {
        let mut plan =
            plan_with(ItemFilter::default(), ItemOrdering::ItemIdAsc);
        plan.description = DescriptionJoin::Optional;
        let qb = build_page_query(&plan);
        let sql = qb.sql();
        assert!(sql.contains("LEFT JOIN item_descriptions d"));
        assert!(sql.contains("ORDER BY i.item_id ASC LIMIT"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like_literal("100%_off\\"), "100\\%\\_off\\\\");
        assert_eq!(escape_like_literal("plain"), "plain");
    }
}
