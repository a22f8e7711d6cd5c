use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Owned by the admin surface; this service only reads products, except for
/// the atomic stock decrement performed when an order is placed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in whole rupiah.
    pub price: i64,
    /// Sellable units remaining. Only the order-placement path may write this.
    pub stock: i64,
    pub category: Option<String>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
