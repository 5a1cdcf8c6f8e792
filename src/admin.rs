use std::sync::Arc;

use tracing::warn;

use crate::platform::AdminLookup;

/// Answers "is this sender an admin of this chat", failing closed.
///
/// Destructive moderation actions hinge on this answer, so a lookup
/// failure is treated as "not admin" rather than letting the action
/// through.
pub struct PermissionGate {
    lookup: Arc<dyn AdminLookup>,
}

impl PermissionGate {
    pub fn new(lookup: Arc<dyn AdminLookup>) -> Self {
        Self { lookup }
    }

    pub async fn is_admin(&self, chat: &str, sender: &str) -> bool {
        match self.lookup.is_group_admin(chat, sender).await {
            Ok(admin) => admin,
            Err(e) => {
                warn!("Admin lookup failed for {} in {}: {}", sender, chat, e);
                false
            }
        }
    }
}
