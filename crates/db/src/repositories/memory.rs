use std::collections::{BTreeSet, HashMap};

use tokio::sync::RwLock;
use uuid::Uuid;

use warung_core::domain::customer::{Customer, CustomerId, TelegramUserId};
use warung_core::domain::order::Order;
use warung_core::domain::product::{Product, ProductId};

use super::{
    CustomerRepository, OrderPlacement, OrderRepository, ProductRepository, StoreError,
};

/// Shared in-memory store implementing every repository trait, for tests and
/// fakes. Stock decrement and order insert happen under a single write lock,
/// matching the transactional semantics of the sqlite store.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    products: HashMap<String, Product>,
    customers: HashMap<i64, Customer>,
    orders: HashMap<Uuid, Order>,
}

impl InMemoryStore {
    pub async fn put_product(&self, product: Product) {
        let mut state = self.inner.write().await;
        state.products.insert(product.id.0.clone(), product);
    }

    pub async fn product_stock(&self, id: &ProductId) -> Option<i64> {
        let state = self.inner.read().await;
        state.products.get(&id.0).map(|product| product.stock)
    }

    pub async fn customer_count(&self) -> usize {
        self.inner.read().await.customers.len()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.inner.read().await.orders.values().cloned().collect()
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.products.get(&id.0).cloned())
    }

    async fn list_by_name(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.inner.read().await;
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(products)
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        let state = self.inner.read().await;
        let categories: BTreeSet<String> = state
            .products
            .values()
            .filter_map(|product| product.category.as_deref())
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(categories.into_iter().collect())
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryStore {
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramUserId,
    ) -> Result<Option<Customer>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.customers.get(&telegram_id.0).cloned())
    }

    async fn insert(&self, customer: Customer) -> Result<(), StoreError> {
        let mut state = self.inner.write().await;
        if state.customers.contains_key(&customer.telegram_id.0) {
            return Err(StoreError::UniqueViolation);
        }
        state.customers.insert(customer.telegram_id.0, customer);
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryStore {
    async fn place_pending_order(
        &self,
        customer_id: CustomerId,
        product: &Product,
    ) -> Result<OrderPlacement, StoreError> {
        let mut state = self.inner.write().await;

        let Some(stored) = state.products.get_mut(&product.id.0) else {
            return Ok(OrderPlacement::StockDepleted);
        };
        if stored.stock <= 0 {
            return Ok(OrderPlacement::StockDepleted);
        }

        stored.stock -= 1;
        let order = Order::pending(customer_id, product);
        state.orders.insert(order.id.0, order.clone());
        Ok(OrderPlacement::Placed(order))
    }
}
