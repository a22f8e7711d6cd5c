use warung_core::domain::customer::{Customer, CustomerId, TelegramUserId};
use warung_core::domain::product::{Product, ProductId};

use super::{
    CustomerRepository, OrderPlacement, OrderRepository, ProductRepository, StoreError,
};

/// Stands in for the real store when the database could not be reached at
/// startup. Every call fails with [`StoreError::Unavailable`], so catalog
/// reads degrade to empty listings and order attempts get the generic
/// apology, while `/health` keeps answering.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable("database connection was not established".to_string())
}

#[async_trait::async_trait]
impl ProductRepository for UnavailableStore {
    async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, StoreError> {
        Err(unavailable())
    }

    async fn list_by_name(&self) -> Result<Vec<Product>, StoreError> {
        Err(unavailable())
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        Err(unavailable())
    }
}

#[async_trait::async_trait]
impl CustomerRepository for UnavailableStore {
    async fn find_by_telegram_id(
        &self,
        _telegram_id: TelegramUserId,
    ) -> Result<Option<Customer>, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _customer: Customer) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

#[async_trait::async_trait]
impl OrderRepository for UnavailableStore {
    async fn place_pending_order(
        &self,
        _customer_id: CustomerId,
        _product: &Product,
    ) -> Result<OrderPlacement, StoreError> {
        Err(unavailable())
    }
}
