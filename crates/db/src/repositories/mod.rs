use async_trait::async_trait;
use thiserror::Error;

use warung_core::domain::customer::{Customer, CustomerId, TelegramUserId};
use warung_core::domain::order::Order;
use warung_core::domain::product::{Product, ProductId};

pub mod customer;
pub mod memory;
pub mod order;
pub mod product;
pub mod unavailable;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryStore;
pub use order::SqlOrderRepository;
pub use product::SqlProductRepository;
pub use unavailable::UnavailableStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("uniqueness constraint violated")]
    UniqueViolation,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Outcome of the atomic stock-decrement-and-insert. `StockDepleted` is the
/// lost-race case: stock reached zero between the caller's read and the
/// guarded update, and no order row was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderPlacement {
    Placed(Order),
    StockDepleted,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;
    /// All products, ordered by name ascending.
    async fn list_by_name(&self) -> Result<Vec<Product>, StoreError>;
    /// Distinct non-empty category labels, sorted ascending.
    async fn list_categories(&self) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramUserId,
    ) -> Result<Option<Customer>, StoreError>;

    /// Fails with [`StoreError::UniqueViolation`] when a row for the same
    /// Telegram identity already exists. Callers treat that as "someone else
    /// just created it" and re-read.
    async fn insert(&self, customer: Customer) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Decrements the product's stock and inserts a pending order as one
    /// atomic unit; either both commit or neither does. The order amount is
    /// frozen from the supplied product snapshot.
    async fn place_pending_order(
        &self,
        customer_id: CustomerId,
        product: &Product,
    ) -> Result<OrderPlacement, StoreError>;
}
