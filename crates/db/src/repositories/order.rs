use warung_core::domain::customer::CustomerId;
use warung_core::domain::order::Order;
use warung_core::domain::product::Product;

use super::{OrderPlacement, OrderRepository, StoreError};
use crate::DbPool;

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrderRepository for SqlOrderRepository {
    async fn place_pending_order(
        &self,
        customer_id: CustomerId,
        product: &Product,
    ) -> Result<OrderPlacement, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Guarded decrement: zero rows affected means the stock ran out (or
        // the product disappeared) between the caller's read and this write.
        let updated =
            sqlx::query("UPDATE products SET stock = stock - 1 WHERE id = ?1 AND stock > 0")
                .bind(&product.id.0)
                .execute(&mut *tx)
                .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(OrderPlacement::StockDepleted);
        }

        let order = Order::pending(customer_id, product);
        // An insert failure propagates while `tx` is still open; dropping the
        // transaction rolls the decrement back, so stock never moves without
        // an order row.
        sqlx::query(
            "INSERT INTO orders (id, customer_id, product_id, amount, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(order.id.0.to_string())
        .bind(order.customer_id.0.to_string())
        .bind(&order.product_id.0)
        .bind(order.amount)
        .bind(order.status.as_str())
        .bind(order.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(OrderPlacement::Placed(order))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlx::Row;
    use uuid::Uuid;
    use warung_core::domain::customer::{Customer, CustomerId, TelegramUserId};
    use warung_core::domain::product::{Product, ProductId};

    use super::SqlOrderRepository;
    use crate::repositories::{CustomerRepository, OrderPlacement, OrderRepository, SqlCustomerRepository};
    use crate::{connect_with_settings, migrations};

    async fn migrated_pool(url: &str, max_connections: u32) -> crate::DbPool {
        let pool = connect_with_settings(url, max_connections, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        pool
    }

    async fn seed_customer(pool: &crate::DbPool) -> CustomerId {
        let customer = Customer::new(TelegramUserId(555), Some("budi".to_string()));
        let id = customer.id;
        SqlCustomerRepository::new(pool.clone()).insert(customer).await.expect("seed customer");
        id
    }

    async fn seed_product(pool: &crate::DbPool, id: &str, price: i64, stock: i64) -> Product {
        sqlx::query("INSERT INTO products (id, name, price, stock, category) VALUES (?1, ?2, ?3, ?4, 'streaming')")
            .bind(id)
            .bind("Spotify Premium")
            .bind(price)
            .bind(stock)
            .execute(pool)
            .await
            .expect("seed product");

        Product {
            id: ProductId(id.to_string()),
            name: "Spotify Premium".to_string(),
            price,
            stock,
            category: Some("streaming".to_string()),
        }
    }

    async fn stock_of(pool: &crate::DbPool, id: &str) -> i64 {
        sqlx::query("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_one(pool)
            .await
            .expect("stock query")
            .get("stock")
    }

    async fn order_count(pool: &crate::DbPool) -> i64 {
        sqlx::query("SELECT COUNT(*) AS count FROM orders")
            .fetch_one(pool)
            .await
            .expect("count query")
            .get("count")
    }

    #[tokio::test]
    async fn placement_decrements_stock_and_freezes_amount() {
        let pool = migrated_pool("sqlite::memory:", 1).await;
        let customer_id = seed_customer(&pool).await;
        let product = seed_product(&pool, "p1", 59_000, 1).await;

        let repo = SqlOrderRepository::new(pool.clone());
        let placement =
            repo.place_pending_order(customer_id, &product).await.expect("place order");

        let order = match placement {
            OrderPlacement::Placed(order) => order,
            OrderPlacement::StockDepleted => panic!("expected placement to succeed"),
        };
        assert_eq!(order.amount, 59_000);
        assert_eq!(order.status.as_str(), "pending");
        assert_eq!(stock_of(&pool, "p1").await, 0);
        assert_eq!(order_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn depleted_stock_yields_no_order_row() {
        let pool = migrated_pool("sqlite::memory:", 1).await;
        let customer_id = seed_customer(&pool).await;
        let product = seed_product(&pool, "p1", 59_000, 0).await;

        let repo = SqlOrderRepository::new(pool.clone());
        let placement =
            repo.place_pending_order(customer_id, &product).await.expect("place order");

        assert_eq!(placement, OrderPlacement::StockDepleted);
        assert_eq!(stock_of(&pool, "p1").await, 0);
        assert_eq!(order_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_the_decrement() {
        let pool = migrated_pool("sqlite::memory:", 1).await;
        let product = seed_product(&pool, "p1", 59_000, 3).await;

        // No customer row: the order insert violates the foreign key after
        // the stock decrement already ran inside the transaction.
        let repo = SqlOrderRepository::new(pool.clone());
        let result = repo.place_pending_order(CustomerId(Uuid::new_v4()), &product).await;

        assert!(result.is_err());
        assert_eq!(stock_of(&pool, "p1").await, 3);
        assert_eq!(order_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn concurrent_placements_cannot_oversell_the_last_unit() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let url = format!("sqlite://{}/warung.db?mode=rwc", dir.path().display());
        let pool = migrated_pool(&url, 4).await;

        let customer_id = seed_customer(&pool).await;
        let product = seed_product(&pool, "p1", 59_000, 1).await;

        let repo = Arc::new(SqlOrderRepository::new(pool.clone()));
        let first = {
            let repo = repo.clone();
            let product = product.clone();
            tokio::spawn(async move { repo.place_pending_order(customer_id, &product).await })
        };
        let second = {
            let repo = repo.clone();
            let product = product.clone();
            tokio::spawn(async move { repo.place_pending_order(customer_id, &product).await })
        };

        let outcomes = [
            first.await.expect("join").expect("first placement"),
            second.await.expect("join").expect("second placement"),
        ];

        let placed = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, OrderPlacement::Placed(_)))
            .count();
        let depleted = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, OrderPlacement::StockDepleted))
            .count();

        assert_eq!(placed, 1, "exactly one placement wins the last unit");
        assert_eq!(depleted, 1, "the loser sees depleted stock");
        assert_eq!(stock_of(&pool, "p1").await, 0);
        assert_eq!(order_count(&pool).await, 1);
    }
}
