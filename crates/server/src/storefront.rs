use std::sync::Arc;

use tracing::warn;

use warung_core::domain::customer::{Customer, CustomerId, TelegramUserId};
use warung_core::domain::order::Order;
use warung_core::domain::product::{Product, ProductId};
use warung_core::errors::StorefrontError;
use warung_db::repositories::{
    CustomerRepository, OrderPlacement, OrderRepository, ProductRepository, StoreError,
};
use warung_telegram::commands::StorefrontService;
use warung_telegram::update::InboundMessage;

fn backend_error(error: StoreError) -> StorefrontError {
    StorefrontError::BackendUnavailable(error.to_string())
}

/// Read-only catalog access. Backend failures degrade to empty listings so
/// the user sees the empty-catalog reply instead of an error.
pub struct CatalogReader {
    products: Arc<dyn ProductRepository>,
}

impl CatalogReader {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn categories(&self) -> Vec<String> {
        match self.products.list_categories().await {
            Ok(categories) => categories,
            Err(error) => {
                warn!(
                    event_name = "storefront.catalog.categories_failed",
                    error = %error,
                    "failed to load categories"
                );
                Vec::new()
            }
        }
    }

    pub async fn catalog(&self) -> Vec<Product> {
        match self.products.list_by_name().await {
            Ok(products) => products,
            Err(error) => {
                warn!(
                    event_name = "storefront.catalog.listing_failed",
                    error = %error,
                    "failed to load catalog"
                );
                Vec::new()
            }
        }
    }
}

/// Resolves a Telegram identity to the internal customer id, creating the row
/// on first contact. Concurrent first contact converges on one row: the
/// losing insert sees the uniqueness violation and re-reads.
pub struct CustomerRegistry {
    customers: Arc<dyn CustomerRepository>,
}

impl CustomerRegistry {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self { customers }
    }

    pub async fn ensure_customer(
        &self,
        telegram_id: TelegramUserId,
        username: Option<&str>,
    ) -> Result<CustomerId, StorefrontError> {
        if let Some(existing) =
            self.customers.find_by_telegram_id(telegram_id).await.map_err(backend_error)?
        {
            return Ok(existing.id);
        }

        let candidate = Customer::new(telegram_id, username.map(str::to_owned));
        let candidate_id = candidate.id;
        match self.customers.insert(candidate).await {
            Ok(()) => Ok(candidate_id),
            Err(StoreError::UniqueViolation) => {
                // Lost the first-contact race; the winner's row is authoritative.
                let existing = self
                    .customers
                    .find_by_telegram_id(telegram_id)
                    .await
                    .map_err(backend_error)?;
                existing.map(|customer| customer.id).ok_or_else(|| {
                    StorefrontError::CustomerCreationFailed(
                        "customer row missing after uniqueness violation".to_string(),
                    )
                })
            }
            Err(StoreError::Unavailable(message)) => {
                Err(StorefrontError::BackendUnavailable(message))
            }
            Err(error) => Err(StorefrontError::CustomerCreationFailed(error.to_string())),
        }
    }
}

/// Validates stock and commits the order. The decrement-and-insert runs as
/// one transaction in the repository; this component owns the error mapping.
pub struct OrderTransactor {
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl OrderTransactor {
    pub fn new(products: Arc<dyn ProductRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { products, orders }
    }

    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        product_id: &ProductId,
    ) -> Result<Order, StorefrontError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await
            .map_err(backend_error)?
            .ok_or_else(|| StorefrontError::ProductNotFound(product_id.0.clone()))?;

        if !product.in_stock() {
            return Err(StorefrontError::OutOfStock(product.id.0.clone()));
        }

        match self.orders.place_pending_order(customer_id, &product).await {
            Ok(OrderPlacement::Placed(order)) => Ok(order),
            // Stock ran out between the read above and the guarded decrement.
            Ok(OrderPlacement::StockDepleted) => {
                Err(StorefrontError::OutOfStock(product.id.0.clone()))
            }
            Err(StoreError::Unavailable(message)) => {
                Err(StorefrontError::BackendUnavailable(message))
            }
            Err(error) => Err(StorefrontError::OrderCreationFailed(error.to_string())),
        }
    }
}

/// The three storefront components composed behind the router's service seam.
pub struct Storefront {
    catalog: CatalogReader,
    registry: CustomerRegistry,
    transactor: OrderTransactor,
}

impl Storefront {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            catalog: CatalogReader::new(products.clone()),
            registry: CustomerRegistry::new(customers),
            transactor: OrderTransactor::new(products, orders),
        }
    }
}

#[async_trait::async_trait]
impl StorefrontService for Storefront {
    async fn categories(&self) -> Vec<String> {
        self.catalog.categories().await
    }

    async fn catalog(&self) -> Vec<Product> {
        self.catalog.catalog().await
    }

    async fn place_order(
        &self,
        message: &InboundMessage,
        product_id: &str,
    ) -> Result<Order, StorefrontError> {
        let customer_id = self
            .registry
            .ensure_customer(TelegramUserId(message.sender_id), message.username.as_deref())
            .await?;
        self.transactor.create_order(customer_id, &ProductId(product_id.to_string())).await
    }
}
