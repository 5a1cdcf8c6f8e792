use async_trait::async_trait;
use thiserror::Error;

/// Suffix that marks a chat id as a group chat.
pub const GROUP_SUFFIX: &str = "@g.us";

/// Whether a chat id denotes a group chat.
///
/// Always derived from the id itself; handlers must not cache this across
/// messages or read it from surrounding state.
pub fn is_group_chat(chat: &str) -> bool {
    chat.ends_with(GROUP_SUFFIX)
}

/// Mention tag for a participant id: the part before the server suffix.
pub fn mention_tag(id: &str) -> &str {
    id.split('@').next().unwrap_or(id)
}

/// How the session layer delivered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A live new-message notification.
    Message,
    /// History backfill during sync; old content, never processed.
    HistorySync,
    /// Anything else (receipts, presence, protocol noise).
    Other,
}

/// A message event received from the session layer, platform-agnostic.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub event: EventKind,
    /// Transport-assigned message ref, used when asking for deletion.
    pub id: String,
    /// Chat the message arrived in (group or direct, see [`is_group_chat`]).
    pub chat: String,
    /// Missing on events without an attributable sender.
    pub sender: Option<String>,
    /// Text payload; `None` for media-only or otherwise textless events.
    pub text: Option<String>,
    /// The quoted (replied-to) message, when this message is a reply.
    /// Its sender and text may be unresolvable.
    pub quoted: Option<Box<InboundMessage>>,
}

/// Failure reported by a transport or admin-lookup collaborator.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Network actions the engine asks the session layer to perform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `text` to `chat`, mentioning the given participant ids.
    async fn send_text(
        &self,
        chat: &str,
        text: &str,
        mentions: &[String],
    ) -> Result<(), TransportError>;

    /// Delete a previously delivered message.
    async fn delete_message(&self, chat: &str, message_id: &str) -> Result<(), TransportError>;

    /// Remove a participant from a group chat.
    async fn remove_participant(&self, chat: &str, participant: &str)
        -> Result<(), TransportError>;

    /// Current participant ids of a group chat.
    async fn group_participants(&self, chat: &str) -> Result<Vec<String>, TransportError>;
}

/// Group-admin lookup, answered by the session layer.
#[async_trait]
pub trait AdminLookup: Send + Sync {
    async fn is_group_admin(&self, chat: &str, participant: &str)
        -> Result<bool, TransportError>;
}
