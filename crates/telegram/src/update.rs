use serde::Deserialize;

/// Subset of the Telegram update envelope the storefront cares about. Every
/// field is optional so structurally alien payloads (edited messages, channel
/// posts, join events) deserialize cleanly and are dropped by extraction
/// instead of failing the webhook.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Update {
    pub message: Option<MessagePayload>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessagePayload {
    pub chat: Option<ChatPayload>,
    pub from: Option<SenderPayload>,
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatPayload {
    pub id: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SenderPayload {
    pub id: i64,
    pub username: Option<String>,
}

/// A fully-identified inbound chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub sender_id: i64,
    pub username: Option<String>,
    pub text: String,
}

impl Update {
    /// `None` when the update is not a message carrying both a chat id and a
    /// sender id; such updates are acknowledged and silently dropped. A
    /// message without text yields the empty string.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let message = self.message?;
        let chat_id = message.chat.as_ref()?.id;
        let sender = message.from?;

        Some(InboundMessage {
            chat_id,
            sender_id: sender.id,
            username: sender.username,
            text: message.text.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Update;

    fn parse(raw: &str) -> Update {
        serde_json::from_str(raw).expect("update should deserialize")
    }

    #[test]
    fn full_message_extracts_every_field() {
        let update = parse(
            r#"{"message":{"chat":{"id":42},"from":{"id":555,"username":"budi"},"text":"/katalog"}}"#,
        );

        let inbound = update.into_inbound().expect("inbound message");
        assert_eq!(inbound.chat_id, 42);
        assert_eq!(inbound.sender_id, 555);
        assert_eq!(inbound.username.as_deref(), Some("budi"));
        assert_eq!(inbound.text, "/katalog");
    }

    #[test]
    fn missing_text_maps_to_empty_string() {
        let update = parse(r#"{"message":{"chat":{"id":42},"from":{"id":555}}}"#);

        let inbound = update.into_inbound().expect("inbound message");
        assert_eq!(inbound.text, "");
        assert_eq!(inbound.username, None);
    }

    #[test]
    fn missing_chat_or_sender_drops_the_update() {
        let no_sender = parse(r#"{"message":{"chat":{"id":42},"text":"/start"}}"#);
        assert!(no_sender.into_inbound().is_none());

        let no_chat = parse(r#"{"message":{"from":{"id":555},"text":"/start"}}"#);
        assert!(no_chat.into_inbound().is_none());
    }

    #[test]
    fn non_message_updates_deserialize_and_drop() {
        let edited = parse(r#"{"edited_message":{"chat":{"id":42},"text":"hi"}}"#);
        assert!(edited.into_inbound().is_none());

        let empty = parse("{}");
        assert!(empty.into_inbound().is_none());
    }
}
