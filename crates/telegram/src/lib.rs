//! Telegram integration - webhook bot interface
//!
//! This crate provides the Telegram surface for warung:
//! - **Commands** (`commands`) - `/start`, `/katalog`, `/order <product_id>`
//! - **Updates** (`update`) - extraction of inbound webhook payloads
//! - **Replies** (`replies`) - the fixed Indonesian reply strings
//! - **Bot API** (`api`) - outbound `sendMessage` client
//!
//! # Getting Started
//!
//! 1. Create a bot with @BotFather and note the token
//! 2. Point the webhook at `POST /webhook` (optionally with a secret token)
//! 3. Set env vars: `BOT_TOKEN`, `BOT_WEBHOOK_SECRET`
//!
//! # Architecture
//!
//! ```text
//! Webhook update → Update::into_inbound → CommandRouter → StorefrontService
//!                                              ↓
//!                                   reply text → BotApi::send_message
//! ```
//!
//! # Key Types
//!
//! - `Command` - closed set of recognized commands from one parse step
//! - `CommandRouter` - exhaustive dispatch producing exactly one reply
//! - `StorefrontService` - trait the backend implements for the router
//! - `BotApi` - outbound send seam (reqwest client or noop)

pub mod api;
pub mod commands;
pub mod replies;
pub mod update;

pub use api::{BotApi, NoopBotApi, SendError, TelegramBotApi};
pub use commands::{parse_command, Command, CommandRouter, StorefrontService};
pub use update::{InboundMessage, Update};
