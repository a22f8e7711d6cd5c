use thiserror::Error;

/// Failures that can surface while serving a chat command. Every variant maps
/// to a fixed Indonesian reply via [`StorefrontError::user_reply`]; the
/// command router never lets one escape past it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorefrontError {
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("customer creation failed: {0}")]
    CustomerCreationFailed(String),
    #[error("product `{0}` not found")]
    ProductNotFound(String),
    #[error("product `{0}` is out of stock")]
    OutOfStock(String),
    #[error("order creation failed: {0}")]
    OrderCreationFailed(String),
}

impl StorefrontError {
    /// The reply shown to the chat user. The wording is a domain requirement
    /// and must match the reference storefront verbatim.
    pub fn user_reply(&self) -> &'static str {
        match self {
            Self::BackendUnavailable(_) => "Layanan sedang bermasalah. Silakan coba lagi nanti.",
            Self::CustomerCreationFailed(_) => "Gagal membuat profil pelanggan.",
            Self::ProductNotFound(_) => "Produk tidak ditemukan.",
            Self::OutOfStock(_) => "Stok habis. Silakan pilih produk lain.",
            Self::OrderCreationFailed(_) => "Gagal membuat pesanan.",
        }
    }
}
