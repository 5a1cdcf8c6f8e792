use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::admin::PermissionGate;
use crate::config::Config;
use crate::moderation::{EnforceReason, Moderator};
use crate::platform::{is_group_chat, AdminLookup, EventKind, InboundMessage, Transport};
use crate::router::{Command, CommandRouter, MessageContext};
use crate::spam::SpamFilter;
use crate::store::ReplyStore;

/// The per-message engine: spam check, auto-reply, command dispatch.
///
/// Owns no per-message state and is safe to invoke concurrently for
/// distinct messages; the reply store serializes its own mutations.
pub struct MessagePipeline {
    transport: Arc<dyn Transport>,
    spam: SpamFilter,
    store: Arc<ReplyStore>,
    moderator: Moderator,
    router: CommandRouter,
}

impl MessagePipeline {
    /// Wire up the engine from startup config and the session
    /// collaborators. Fails on an unloadable store or a bad spam rule.
    pub async fn new(
        config: &Config,
        transport: Arc<dyn Transport>,
        admin: Arc<dyn AdminLookup>,
    ) -> Result<Self> {
        let spam = SpamFilter::new()?;
        let store = Arc::new(ReplyStore::load(&config.store.path).await?);
        let moderator = Moderator::new(Arc::clone(&transport));
        let router = CommandRouter::new(
            Arc::clone(&transport),
            PermissionGate::new(admin),
            Arc::clone(&store),
            moderator.clone(),
        );

        info!(
            "Pipeline ready ({} by {}), reply store at {}",
            config.bot.pack_name,
            config.bot.author,
            config.store.path.display()
        );

        Ok(Self {
            transport,
            spam,
            store,
            moderator,
            router,
        })
    }

    /// Process one inbound event. Errors are contained here: logged and
    /// swallowed so one bad message never takes down the loop.
    pub async fn handle(&self, message: &InboundMessage) {
        if let Err(e) = self.process(message).await {
            error!("Error handling message {}: {:#}", message.id, e);
        }
    }

    async fn process(&self, message: &InboundMessage) -> Result<()> {
        if message.event != EventKind::Message {
            return Ok(());
        }
        let Some(sender) = message.sender.as_deref() else {
            debug!("Dropping event {} without a sender", message.id);
            return Ok(());
        };
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let text = text.trim();

        // Spam verdict first, group chats only.
        if is_group_chat(&message.chat) && self.spam.is_spam(text) {
            info!("Spam detected in {} from {}", message.chat, sender);
            self.moderator
                .enforce(&message.chat, &message.id, sender, EnforceReason::Detected)
                .await;
            return Ok(());
        }

        // A stored auto-reply wins over command parsing.
        if let Some(reply) = self.store.lookup(text).await {
            self.transport.send_text(&message.chat, &reply, &[]).await?;
            return Ok(());
        }

        if let Some(cmd) = Command::parse(text) {
            let ctx = MessageContext::new(message, sender);
            self.router.route(&ctx, cmd).await?;
        }
        Ok(())
    }
}
