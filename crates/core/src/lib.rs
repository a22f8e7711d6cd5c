//! Core domain and configuration for the warung storefront bot.
//!
//! This crate is transport- and storage-agnostic: the Telegram surface lives
//! in `warung-telegram`, persistence in `warung-db`. What lives here is the
//! data model (customers, products, orders), the user-facing error taxonomy,
//! and the layered configuration loader.

pub mod config;
pub mod domain;
pub mod errors;

pub use domain::customer::{Customer, CustomerId, TelegramUserId};
pub use domain::order::{Order, OrderId, OrderStatus};
pub use domain::product::{Product, ProductId};
pub use errors::StorefrontError;
