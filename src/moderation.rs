use std::sync::Arc;

use tracing::warn;

use crate::platform::{mention_tag, Transport};

/// Why a message is being enforced against.
#[derive(Debug, Clone, Copy)]
pub enum EnforceReason {
    /// The pattern matcher flagged it on arrival.
    Detected,
    /// An admin reported it with the spam command.
    Reported,
}

/// Composite moderation action: delete the message, remove the offender,
/// announce to the group.
#[derive(Clone)]
pub struct Moderator {
    transport: Arc<dyn Transport>,
}

impl Moderator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Run the three steps in order, best effort: a failed step is logged
    /// and the remaining steps still run. No rollback.
    pub async fn enforce(&self, chat: &str, message_id: &str, offender: &str, reason: EnforceReason) {
        if let Err(e) = self.transport.delete_message(chat, message_id).await {
            warn!("Failed to delete message {} in {}: {}", message_id, chat, e);
        }

        if let Err(e) = self.transport.remove_participant(chat, offender).await {
            warn!("Failed to remove {} from {}: {}", offender, chat, e);
        }

        let announcement = match reason {
            EnforceReason::Detected => format!(
                "تم اكتشاف رسالة سبام وتم طرد العضو @{}",
                mention_tag(offender)
            ),
            EnforceReason::Reported => format!(
                "تم الإبلاغ عن رسالة سبام وتم طرد العضو @{}",
                mention_tag(offender)
            ),
        };
        if let Err(e) = self
            .transport
            .send_text(chat, &announcement, &[offender.to_string()])
            .await
        {
            warn!("Failed to announce removal in {}: {}", chat, e);
        }
    }
}
