use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

/// Telegram's stable user identifier, distinct from the internal
/// [`CustomerId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TelegramUserId(pub i64);

/// Created lazily on a customer's first order attempt and never mutated or
/// deleted by this service afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub telegram_id: TelegramUserId,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(telegram_id: TelegramUserId, username: Option<String>) -> Self {
        Self { id: CustomerId(Uuid::new_v4()), telegram_id, username, created_at: Utc::now() }
    }
}
