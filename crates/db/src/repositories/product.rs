use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use warung_core::domain::product::{Product, ProductId};

use super::{ProductRepository, StoreError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn product_from_row(row: &SqliteRow) -> Product {
    Product {
        id: ProductId(row.get("id")),
        name: row.get("name"),
        price: row.get("price"),
        stock: row.get("stock"),
        category: row.get("category"),
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let row =
            sqlx::query("SELECT id, name, price, stock, category FROM products WHERE id = ?1")
                .bind(&id.0)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.as_ref().map(product_from_row))
    }

    async fn list_by_name(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, price, stock, category FROM products ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(product_from_row).collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products \
             WHERE category IS NOT NULL AND TRIM(category) != '' \
             ORDER BY category ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use warung_core::domain::product::ProductId;

    use super::SqlProductRepository;
    use crate::repositories::ProductRepository;
    use crate::{connect_with_settings, migrations};

    async fn seeded_pool() -> crate::DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        for (id, name, price, stock, category) in [
            ("netflix", "Netflix Sharing", 45_000_i64, 8_i64, Some("streaming")),
            ("spotify", "Spotify Premium", 59_000, 10, Some("streaming")),
            ("canva", "Canva Pro", 35_000, 5, Some("produktivitas")),
            ("misc", "Voucher Misterius", 1_000, 1, None),
            ("blank", "Produk Tanpa Kategori", 2_000, 1, Some("   ")),
        ] {
            sqlx::query(
                "INSERT INTO products (id, name, price, stock, category) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(id)
            .bind(name)
            .bind(price)
            .bind(stock)
            .bind(category)
            .execute(&pool)
            .await
            .expect("seed product");
        }

        pool
    }

    #[tokio::test]
    async fn find_by_id_returns_full_product() {
        let pool = seeded_pool().await;
        let repo = SqlProductRepository::new(pool);

        let product = repo
            .find_by_id(&ProductId("spotify".to_string()))
            .await
            .expect("query")
            .expect("product exists");

        assert_eq!(product.name, "Spotify Premium");
        assert_eq!(product.price, 59_000);
        assert_eq!(product.stock, 10);
        assert_eq!(product.category.as_deref(), Some("streaming"));

        let missing = repo.find_by_id(&ProductId("nope".to_string())).await.expect("query");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn list_by_name_orders_ascending() {
        let pool = seeded_pool().await;
        let repo = SqlProductRepository::new(pool);

        let names: Vec<String> =
            repo.list_by_name().await.expect("query").into_iter().map(|p| p.name).collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 5);
    }

    #[tokio::test]
    async fn list_categories_dedupes_and_drops_blank_labels() {
        let pool = seeded_pool().await;
        let repo = SqlProductRepository::new(pool);

        let categories = repo.list_categories().await.expect("query");
        assert_eq!(categories, vec!["produktivitas".to_string(), "streaming".to_string()]);
    }
}
