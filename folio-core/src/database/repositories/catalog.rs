use std::collections::HashMap;

use async_trait::async_trait;
use folio_model::{
    AuthorRecord, CategoryId, CategoryRecord, ItemDescriptionRecord, ItemId,
    ItemImageRecord, ItemRecord, LanguageId, LegacyItemId, PublisherRecord,
    ReviewId, ReviewRecord,
};
use sqlx::PgPool;
use tracing::debug;

use crate::database::ports::{CatalogRepository, ItemIdPage};
use crate::error::{CatalogError, Result};
use crate::query::{SearchPlan, sql};

const ITEM_COLUMNS: &str = "item_id, model, sku, isbn, quantity, image, \
     manufacturer_id, price, weight, length, width, height, status, \
     date_added, date_modified, viewed";

const REVIEW_COLUMNS: &str =
    "review_id, item_id, customer_name, rating, comment, status, date_added";

#[derive(Debug, Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn raw_ids(ids: &[ItemId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn search_item_ids(&self, plan: &SearchPlan) -> Result<ItemIdPage> {
        let mut count_query = sql::build_count_query(plan);
        let total = count_query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(|e| CatalogError::store("Failed to count items", e))?;

        if total == 0 {
            return Ok(ItemIdPage::default());
        }

        let mut page_query = sql::build_page_query(plan);
        debug!(sql = page_query.sql(), "item search");
        let item_ids = page_query
            .build_query_scalar::<ItemId>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| CatalogError::store("Failed to search items", e))?;

        Ok(ItemIdPage {
            item_ids,
            total: total.max(0) as u64,
        })
    }

    async fn active_items(&self, ids: &[ItemId]) -> Result<Vec<ItemRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE item_id = ANY($1) AND status = TRUE"
        );
        sqlx::query_as::<_, ItemRecord>(&query)
            .bind(raw_ids(ids))
            .fetch_all(self.pool())
            .await
            .map_err(|e| CatalogError::store("Failed to load items", e))
    }

    async fn descriptions(
        &self,
        ids: &[ItemId],
        language_id: LanguageId,
    ) -> Result<Vec<ItemDescriptionRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ItemDescriptionRecord>(
            r#"
            SELECT item_id, language_id, name, description, meta_title,
                   meta_description, meta_keyword, tag
            FROM item_descriptions
            WHERE item_id = ANY($1) AND language_id = $2
            "#,
        )
        .bind(raw_ids(ids))
        .bind(language_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to load item descriptions", e))
    }

    async fn legacy_ids(
        &self,
        ids: &[ItemId],
    ) -> Result<HashMap<ItemId, LegacyItemId>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, (ItemId, LegacyItemId)>(
            r#"
            SELECT item_id, MIN(legacy_id) AS legacy_id
            FROM legacy_item_ids
            WHERE item_id = ANY($1)
            GROUP BY item_id
            "#,
        )
        .bind(raw_ids(ids))
        .fetch_all(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to load legacy ids", e))?;

        Ok(rows.into_iter().collect())
    }

    async fn resolve_legacy_id(
        &self,
        legacy_id: LegacyItemId,
    ) -> Result<Option<ItemId>> {
        sqlx::query_scalar::<_, ItemId>(
            "SELECT item_id FROM legacy_item_ids WHERE legacy_id = $1",
        )
        .bind(legacy_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to resolve legacy id", e))
    }

    async fn item_categories(
        &self,
        item_id: ItemId,
        language_id: LanguageId,
    ) -> Result<Vec<CategoryRecord>> {
        sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT c.category_id, c.parent_id, cd.name
            FROM item_categories ic
            JOIN categories c ON c.category_id = ic.category_id
            LEFT JOIN category_descriptions cd
              ON cd.category_id = c.category_id AND cd.language_id = $2
            WHERE ic.item_id = $1
            ORDER BY c.category_id
            "#,
        )
        .bind(item_id)
        .bind(language_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to load item categories", e))
    }

    async fn category(
        &self,
        category_id: CategoryId,
        language_id: LanguageId,
    ) -> Result<Option<CategoryRecord>> {
        sqlx::query_as::<_, CategoryRecord>(
            r#"
            SELECT c.category_id, c.parent_id, cd.name
            FROM categories c
            LEFT JOIN category_descriptions cd
              ON cd.category_id = c.category_id AND cd.language_id = $2
            WHERE c.category_id = $1
            "#,
        )
        .bind(category_id)
        .bind(language_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to load category", e))
    }

    async fn item_authors(&self, item_id: ItemId) -> Result<Vec<AuthorRecord>> {
        sqlx::query_as::<_, AuthorRecord>(
            r#"
            SELECT a.author_id, a.name, a.image, a.status
            FROM item_authors ia
            JOIN authors a ON a.author_id = ia.author_id
            WHERE ia.item_id = $1 AND a.status = TRUE
            ORDER BY a.author_id
            "#,
        )
        .bind(item_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to load item authors", e))
    }

    async fn item_publishers(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<PublisherRecord>> {
        sqlx::query_as::<_, PublisherRecord>(
            r#"
            SELECT p.publisher_id, p.name, p.image, p.status
            FROM item_publishers ip
            JOIN publishers p ON p.publisher_id = ip.publisher_id
            WHERE ip.item_id = $1 AND p.status = TRUE
            ORDER BY p.publisher_id
            "#,
        )
        .bind(item_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to load item publishers", e))
    }

    async fn item_images(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<ItemImageRecord>> {
        sqlx::query_as::<_, ItemImageRecord>(
            r#"
            SELECT item_image_id, item_id, image, sort_order
            FROM item_images
            WHERE item_id = $1
            ORDER BY sort_order, item_image_id
            "#,
        )
        .bind(item_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| CatalogError::store("Failed to load item images", e))
    }

    async fn approved_reviews(
        &self,
        item_id: ItemId,
    ) -> Result<Vec<ReviewRecord>> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE item_id = $1 AND status = TRUE ORDER BY review_id"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(item_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| CatalogError::store("Failed to load reviews", e))
    }

    async fn approved_review(
        &self,
        review_id: ReviewId,
    ) -> Result<Option<ReviewRecord>> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE review_id = $1 AND status = TRUE"
        );
        sqlx::query_as::<_, ReviewRecord>(&query)
            .bind(review_id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| CatalogError::store("Failed to load review", e))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(|e| CatalogError::store("Database ping failed", e))
    }
}
