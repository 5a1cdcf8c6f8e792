//! Shared fakes for the collaborator traits, used by the module tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::platform::{AdminLookup, EventKind, InboundMessage, Transport, TransportError};

pub const GROUP: &str = "120363041234567890@g.us";
pub const DIRECT: &str = "966500000001@s.whatsapp.net";
pub const SENDER: &str = "966500000002@s.whatsapp.net";

/// A live text message, no quoted reply.
pub fn message(chat: &str, sender: &str, text: &str) -> InboundMessage {
    InboundMessage {
        event: EventKind::Message,
        id: "msg-1".to_string(),
        chat: chat.to_string(),
        sender: Some(sender.to_string()),
        text: Some(text.to_string()),
        quoted: None,
    }
}

/// A quoted (replied-to) message as the transport resolves it.
pub fn quoted(id: &str, sender: Option<&str>, text: Option<&str>) -> Box<InboundMessage> {
    Box::new(InboundMessage {
        event: EventKind::Message,
        id: id.to_string(),
        chat: GROUP.to_string(),
        sender: sender.map(str::to_string),
        text: text.map(str::to_string),
        quoted: None,
    })
}

/// One outbound call attempted through [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentCall {
    Text {
        chat: String,
        text: String,
        mentions: Vec<String>,
    },
    Delete {
        chat: String,
        message_id: String,
    },
    Remove {
        chat: String,
        participant: String,
    },
}

/// Transport fake that records every attempted call and can be told to
/// fail individual methods. Attempts are recorded before failing, so
/// tests can assert that a step was tried.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<SentCall>>,
    pub participants: Vec<String>,
    fail_send: bool,
    fail_delete: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_participants(participants: &[&str]) -> Self {
        Self {
            participants: participants.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub async fn recorded(&self) -> Vec<SentCall> {
        self.calls.lock().await.clone()
    }

    /// Texts sent so far, in order.
    pub async fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                SentCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        chat: &str,
        text: &str,
        mentions: &[String],
    ) -> Result<(), TransportError> {
        self.calls.lock().await.push(SentCall::Text {
            chat: chat.to_string(),
            text: text.to_string(),
            mentions: mentions.to_vec(),
        });
        if self.fail_send {
            return Err(TransportError("send refused".to_string()));
        }
        Ok(())
    }

    async fn delete_message(&self, chat: &str, message_id: &str) -> Result<(), TransportError> {
        self.calls.lock().await.push(SentCall::Delete {
            chat: chat.to_string(),
            message_id: message_id.to_string(),
        });
        if self.fail_delete {
            return Err(TransportError("delete refused".to_string()));
        }
        Ok(())
    }

    async fn remove_participant(
        &self,
        chat: &str,
        participant: &str,
    ) -> Result<(), TransportError> {
        self.calls.lock().await.push(SentCall::Remove {
            chat: chat.to_string(),
            participant: participant.to_string(),
        });
        Ok(())
    }

    async fn group_participants(&self, _chat: &str) -> Result<Vec<String>, TransportError> {
        Ok(self.participants.clone())
    }
}

/// Admin lookup answering a fixed verdict.
pub struct StaticAdmins {
    pub admin: bool,
}

#[async_trait]
impl AdminLookup for StaticAdmins {
    async fn is_group_admin(&self, _chat: &str, _participant: &str) -> Result<bool, TransportError> {
        Ok(self.admin)
    }
}

/// Admin lookup that always fails, for fail-closed tests.
pub struct BrokenAdminLookup;

#[async_trait]
impl AdminLookup for BrokenAdminLookup {
    async fn is_group_admin(&self, _chat: &str, _participant: &str) -> Result<bool, TransportError> {
        Err(TransportError("lookup timed out".to_string()))
    }
}
