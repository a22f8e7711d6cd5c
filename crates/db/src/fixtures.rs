use crate::DbPool;

/// Deterministic demo catalog loaded by `warung seed`. Covers every listing
/// path a demo walkthrough needs: multiple categories, an uncategorized
/// product, and one product that is already sold out.
pub struct DemoCatalog;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub products_seeded: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

const DEMO_PRODUCTS: &[(&str, &str, i64, i64, Option<&str>)] = &[
    ("canva-pro", "Canva Pro 1 Bulan", 35_000, 5, Some("produktivitas")),
    ("chatgpt-plus", "ChatGPT Plus 1 Bulan", 320_000, 3, Some("produktivitas")),
    ("netflix-sharing", "Netflix Sharing 1 Bulan", 45_000, 8, Some("streaming")),
    ("spotify-premium", "Spotify Premium 1 Bulan", 59_000, 10, Some("streaming")),
    ("viu-premium", "Viu Premium 1 Bulan", 30_000, 0, Some("streaming")),
    ("voucher-game", "Voucher Game 50rb", 50_000, 20, None),
];

impl DemoCatalog {
    /// Upserts the demo products, so reseeding resets the demo state instead
    /// of failing on existing ids.
    pub async fn load(pool: &DbPool) -> Result<SeedSummary, sqlx::Error> {
        for &(id, name, price, stock, category) in DEMO_PRODUCTS {
            sqlx::query(
                "INSERT INTO products (id, name, price, stock, category) \
                 VALUES (?1, ?2, ?3, ?4, ?5) \
                 ON CONFLICT(id) DO UPDATE SET \
                 name = excluded.name, price = excluded.price, \
                 stock = excluded.stock, category = excluded.category",
            )
            .bind(id)
            .bind(name)
            .bind(price)
            .bind(stock)
            .bind(category)
            .execute(pool)
            .await?;
        }

        Ok(SeedSummary { products_seeded: DEMO_PRODUCTS.len() })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerifyOutcome, sqlx::Error> {
        let product_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;

        let category_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT category) FROM products \
             WHERE category IS NOT NULL AND TRIM(category) != ''",
        )
        .fetch_one(pool)
        .await?;

        let sold_out_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock = 0")
                .fetch_one(pool)
                .await?;

        let checks = vec![
            ("demo_products_present", product_count >= DEMO_PRODUCTS.len() as i64),
            ("demo_categories_present", category_count >= 2),
            ("sold_out_demo_product_present", sold_out_count >= 1),
        ];
        let all_present = checks.iter().all(|(_, passed)| *passed);

        Ok(VerifyOutcome { all_present, checks })
    }
}

#[cfg(test)]
mod tests {
    use super::DemoCatalog;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn load_then_verify_passes_and_is_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        let first = DemoCatalog::load(&pool).await.expect("first load");
        let second = DemoCatalog::load(&pool).await.expect("second load");
        assert_eq!(first, second);

        let outcome = DemoCatalog::verify(&pool).await.expect("verify");
        assert!(outcome.all_present, "failed checks: {:?}", outcome.checks);
    }
}
