use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use warung_core::domain::customer::{Customer, CustomerId, TelegramUserId};

use super::{CustomerRepository, StoreError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn customer_from_row(row: &SqliteRow) -> Result<Customer, StoreError> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|error| StoreError::Decode(format!("customer id `{id}`: {error}")))?;

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|error| StoreError::Decode(format!("customer created_at: {error}")))?
        .with_timezone(&Utc);

    Ok(Customer {
        id: CustomerId(id),
        telegram_id: TelegramUserId(row.get("telegram_id")),
        username: row.get("username"),
        created_at,
    })
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn find_by_telegram_id(
        &self,
        telegram_id: TelegramUserId,
    ) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(
            "SELECT id, telegram_id, username, created_at FROM customers WHERE telegram_id = ?1",
        )
        .bind(telegram_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(customer_from_row).transpose()
    }

    async fn insert(&self, customer: Customer) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO customers (id, telegram_id, username, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(customer.id.0.to_string())
        .bind(customer.telegram_id.0)
        .bind(&customer.username)
        .bind(customer.created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::UniqueViolation)
            }
            Err(other) => Err(other.into()),
        }
    }
}
