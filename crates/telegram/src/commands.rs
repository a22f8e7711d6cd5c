use async_trait::async_trait;
use tracing::warn;

use warung_core::domain::order::Order;
use warung_core::domain::product::Product;
use warung_core::errors::StorefrontError;

use crate::replies;
use crate::update::InboundMessage;

/// Closed set of recognized commands, produced by [`parse_command`] in a
/// single pass. Prefix matching is case-sensitive and checked in priority
/// order: `/start`, `/katalog`, `/order`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Catalog,
    Order { product_id: Option<String> },
    Unknown,
}

pub fn parse_command(text: &str) -> Command {
    if text.starts_with("/start") {
        return Command::Start;
    }
    if text.starts_with("/katalog") {
        return Command::Catalog;
    }
    if text.starts_with("/order") {
        // Arguments split on single spaces; a doubled space yields an empty
        // token, which counts as a missing argument.
        let product_id =
            text.split(' ').nth(1).filter(|arg| !arg.is_empty()).map(str::to_owned);
        return Command::Order { product_id };
    }
    Command::Unknown
}

/// Backend surface the router drives. Catalog reads are infallible by
/// contract: implementations log backend failures and surface them here as
/// empty listings.
#[async_trait]
pub trait StorefrontService: Send + Sync {
    async fn categories(&self) -> Vec<String>;
    async fn catalog(&self) -> Vec<Product>;
    async fn place_order(
        &self,
        message: &InboundMessage,
        product_id: &str,
    ) -> Result<Order, StorefrontError>;
}

pub struct CommandRouter<S> {
    service: S,
}

impl<S> CommandRouter<S>
where
    S: StorefrontService,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Maps an inbound message to exactly one reply. Every backend failure is
    /// converted to its fixed user-facing string here; nothing propagates to
    /// the ingress.
    pub async fn route(&self, message: &InboundMessage) -> String {
        match parse_command(&message.text) {
            Command::Start => replies::welcome(&self.service.categories().await),
            Command::Catalog => replies::catalog(&self.service.catalog().await),
            Command::Order { product_id: None } => replies::order_usage().to_owned(),
            Command::Order { product_id: Some(product_id) } => {
                match self.service.place_order(message, &product_id).await {
                    Ok(order) => replies::order_created(&order),
                    Err(error) => {
                        warn!(
                            event_name = "ingress.command.order_failed",
                            chat_id = message.chat_id,
                            product_id = %product_id,
                            error = %error,
                            "order command failed"
                        );
                        error.user_reply().to_owned()
                    }
                }
            }
            Command::Unknown => replies::unknown_command().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use uuid::Uuid;
    use warung_core::domain::customer::CustomerId;
    use warung_core::domain::order::Order;
    use warung_core::domain::product::{Product, ProductId};
    use warung_core::errors::StorefrontError;

    use super::{parse_command, Command, CommandRouter, StorefrontService};
    use crate::update::InboundMessage;

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            chat_id: 42,
            sender_id: 555,
            username: Some("budi".to_string()),
            text: text.to_string(),
        }
    }

    fn product(id: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: "Spotify Premium".to_string(),
            price: 59_000,
            stock: 1,
            category: Some("streaming".to_string()),
        }
    }

    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<&'static str>>,
        order_result: Option<StorefrontError>,
    }

    impl RecordingService {
        fn failing_with(error: StorefrontError) -> Self {
            Self { calls: Mutex::default(), order_result: Some(error) }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait::async_trait]
    impl StorefrontService for RecordingService {
        async fn categories(&self) -> Vec<String> {
            self.calls.lock().expect("lock").push("categories");
            vec!["streaming".to_string()]
        }

        async fn catalog(&self) -> Vec<Product> {
            self.calls.lock().expect("lock").push("catalog");
            vec![product("spotify")]
        }

        async fn place_order(
            &self,
            _message: &InboundMessage,
            product_id: &str,
        ) -> Result<Order, StorefrontError> {
            self.calls.lock().expect("lock").push("place_order");
            match &self.order_result {
                Some(error) => Err(error.clone()),
                None => Ok(Order::pending(CustomerId(Uuid::new_v4()), &product(product_id))),
            }
        }
    }

    #[test]
    fn parsing_is_case_sensitive_and_priority_ordered() {
        assert_eq!(parse_command("/start"), Command::Start);
        assert_eq!(parse_command("/katalog"), Command::Catalog);
        assert_eq!(parse_command("/order p1"), Command::Order { product_id: Some("p1".to_string()) });
        assert_eq!(parse_command("/order"), Command::Order { product_id: None });
        assert_eq!(parse_command("/Start"), Command::Unknown);
        assert_eq!(parse_command("/KATALOG"), Command::Unknown);
        assert_eq!(parse_command("halo"), Command::Unknown);
        assert_eq!(parse_command(""), Command::Unknown);
    }

    #[test]
    fn order_argument_splits_on_single_spaces() {
        assert_eq!(
            parse_command("/order p1 extra"),
            Command::Order { product_id: Some("p1".to_string()) }
        );
        // A doubled space produces an empty first argument: treated as missing.
        assert_eq!(parse_command("/order  p1"), Command::Order { product_id: None });
    }

    #[tokio::test]
    async fn start_replies_with_categories() {
        let router = CommandRouter::new(RecordingService::default());
        let reply = router.route(&message("/start")).await;

        assert_eq!(reply, "Selamat datang!\nKategori tersedia:\n- streaming");
        assert_eq!(router.service.calls(), vec!["categories"]);
    }

    #[tokio::test]
    async fn catalog_replies_with_product_lines() {
        let router = CommandRouter::new(RecordingService::default());
        let reply = router.route(&message("/katalog")).await;

        assert_eq!(reply, "Daftar produk:\nSpotify Premium | Rp59000 | Stok 1");
        assert_eq!(router.service.calls(), vec!["catalog"]);
    }

    #[tokio::test]
    async fn order_without_argument_never_reaches_the_service() {
        let router = CommandRouter::new(RecordingService::default());
        let reply = router.route(&message("/order")).await;

        assert_eq!(reply, "Gunakan: /order <product_id>");
        assert!(router.service.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_order_confirms_with_order_id() {
        let router = CommandRouter::new(RecordingService::default());
        let reply = router.route(&message("/order spotify")).await;

        assert!(reply.starts_with("Pesanan dibuat. ID: "));
        assert_eq!(router.service.calls(), vec!["place_order"]);
    }

    #[tokio::test]
    async fn order_failures_map_to_their_fixed_replies() {
        let cases = [
            (
                StorefrontError::ProductNotFound("p9".to_string()),
                "Produk tidak ditemukan.",
            ),
            (
                StorefrontError::OutOfStock("spotify".to_string()),
                "Stok habis. Silakan pilih produk lain.",
            ),
            (
                StorefrontError::OrderCreationFailed("insert failed".to_string()),
                "Gagal membuat pesanan.",
            ),
            (
                StorefrontError::CustomerCreationFailed("insert failed".to_string()),
                "Gagal membuat profil pelanggan.",
            ),
            (
                StorefrontError::BackendUnavailable("timeout".to_string()),
                "Layanan sedang bermasalah. Silakan coba lagi nanti.",
            ),
        ];

        for (error, expected) in cases {
            let router = CommandRouter::new(RecordingService::failing_with(error));
            let reply = router.route(&message("/order spotify")).await;
            assert_eq!(reply, expected);
        }
    }

    #[tokio::test]
    async fn unknown_text_gets_the_fallback_reply() {
        let router = CommandRouter::new(RecordingService::default());
        let reply = router.route(&message("beli dong")).await;

        assert_eq!(reply, "Perintah tidak dikenali. Coba /katalog.");
        assert!(router.service.calls().is_empty());
    }
}
