use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::admin::PermissionGate;
use crate::moderation::{EnforceReason, Moderator};
use crate::platform::{is_group_chat, mention_tag, InboundMessage, Transport};
use crate::store::ReplyStore;

const GROUPS_ONLY: &str = "هذا الأمر متاح فقط في المجموعات";
const ADMINS_ONLY: &str = "هذا الأمر متاح فقط للأدمنز";
const ADD_USAGE: &str = "الاستخدام: أضف رد <النص>\nمع الرد على الرسالة التي تريد حفظ رد لها";
const DELETE_USAGE: &str = "الاستخدام: احذف رد <النص>";
const TRIGGER_TEXT_MISSING: &str = "لم يتم العثور على نص الرسالة";
const REPORT_USAGE: &str = "يجب الرد على الرسالة المشبوهة باستخدام هذا الأمر";
const SENDER_UNRESOLVED: &str = "تعذر تحديد مرسل الرسالة";
const LIST_EMPTY: &str = "لا توجد ردود محفوظة حالياً";

/// A recognized command with its parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `أضف رد <النص>` / `اضف رد <النص>`, issued as a reply to the
    /// message whose text becomes the trigger.
    AddReply { reply: String },
    /// `احذف رد <النص>`.
    DeleteReply { trigger: String },
    /// `ردود` / `الردود`.
    ListReplies,
    /// `!spam` / `!سبام`, issued as a reply to the suspect message.
    ReportSpam,
    /// `@all`.
    TagAll,
}

impl Command {
    /// Parse the first whitespace-delimited token, case-normalized, as a
    /// command. Ordinary chat text yields `None` and passes through
    /// silently.
    pub fn parse(text: &str) -> Option<Command> {
        let mut words = text.split_whitespace();
        let head = words.next()?.to_lowercase();
        let cmd = match head.as_str() {
            "أضف" | "اضف" => match words.next() {
                Some("رد") => Command::AddReply {
                    reply: join_rest(words),
                },
                _ => return None,
            },
            "احذف" => match words.next() {
                Some("رد") => Command::DeleteReply {
                    trigger: join_rest(words),
                },
                _ => return None,
            },
            "ردود" | "الردود" => Command::ListReplies,
            "!spam" | "!سبام" => Command::ReportSpam,
            "@all" => Command::TagAll,
            _ => return None,
        };
        Some(cmd)
    }
}

fn join_rest<'a>(words: impl Iterator<Item = &'a str>) -> String {
    words.collect::<Vec<_>>().join(" ")
}

/// Expected, user-visible rejection. Messaged to the chat, never logged
/// as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    GroupsOnly,
    AdminsOnly,
    MissingArgument,
}

/// Result of routing one command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran to completion.
    Completed,
    /// A guard rejected the command; the caller was notified.
    Rejected(ValidationFailure),
}

/// Per-message context handed to command handlers.
pub struct MessageContext<'a> {
    pub chat: &'a str,
    pub sender: &'a str,
    pub is_group: bool,
    pub message: &'a InboundMessage,
}

impl<'a> MessageContext<'a> {
    /// Group-ness is derived from the chat id here, per message; handlers
    /// must not consult any other source for it.
    pub fn new(message: &'a InboundMessage, sender: &'a str) -> Self {
        Self {
            chat: &message.chat,
            sender,
            is_group: is_group_chat(&message.chat),
            message,
        }
    }
}

/// Dispatches recognized commands through the guard chain to their
/// handlers.
pub struct CommandRouter {
    transport: Arc<dyn Transport>,
    gate: PermissionGate,
    store: Arc<ReplyStore>,
    moderator: Moderator,
}

impl CommandRouter {
    pub fn new(
        transport: Arc<dyn Transport>,
        gate: PermissionGate,
        store: Arc<ReplyStore>,
        moderator: Moderator,
    ) -> Self {
        Self {
            transport,
            gate,
            store,
            moderator,
        }
    }

    /// Route a parsed command. Guards run in a fixed order for every
    /// command: group chat, then admin sender, then the handler's own
    /// argument checks.
    pub async fn route(&self, ctx: &MessageContext<'_>, cmd: Command) -> Result<Outcome> {
        if !ctx.is_group {
            self.notify(ctx.chat, GROUPS_ONLY).await;
            return Ok(Outcome::Rejected(ValidationFailure::GroupsOnly));
        }
        if !self.gate.is_admin(ctx.chat, ctx.sender).await {
            self.notify(ctx.chat, ADMINS_ONLY).await;
            return Ok(Outcome::Rejected(ValidationFailure::AdminsOnly));
        }

        match cmd {
            Command::AddReply { reply } => self.add_reply(ctx, &reply).await,
            Command::DeleteReply { trigger } => self.delete_reply(ctx, &trigger).await,
            Command::ListReplies => self.list_replies(ctx).await,
            Command::ReportSpam => self.report_spam(ctx).await,
            Command::TagAll => self.tag_all(ctx).await,
        }
    }

    async fn add_reply(&self, ctx: &MessageContext<'_>, reply: &str) -> Result<Outcome> {
        let quoted = match ctx.message.quoted.as_deref() {
            Some(quoted) if !reply.is_empty() => quoted,
            _ => {
                self.notify(ctx.chat, ADD_USAGE).await;
                return Ok(Outcome::Rejected(ValidationFailure::MissingArgument));
            }
        };

        let Some(trigger) = quoted.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
        else {
            self.notify(ctx.chat, TRIGGER_TEXT_MISSING).await;
            return Ok(Outcome::Rejected(ValidationFailure::MissingArgument));
        };

        self.store.upsert(trigger, reply).await?;

        self.notify(
            ctx.chat,
            &format!("تم حفظ الرد \"{}\" للرسالة \"{}\"", reply, trigger),
        )
        .await;
        Ok(Outcome::Completed)
    }

    async fn delete_reply(&self, ctx: &MessageContext<'_>, trigger: &str) -> Result<Outcome> {
        if trigger.is_empty() {
            self.notify(ctx.chat, DELETE_USAGE).await;
            return Ok(Outcome::Rejected(ValidationFailure::MissingArgument));
        }

        let removed = self.store.delete(trigger).await?;
        let confirmation = if removed {
            format!("تم حذف الرد للرسالة \"{}\"", trigger)
        } else {
            format!("لا يوجد رد محفوظ للرسالة \"{}\"", trigger)
        };
        self.notify(ctx.chat, &confirmation).await;
        Ok(Outcome::Completed)
    }

    async fn list_replies(&self, ctx: &MessageContext<'_>) -> Result<Outcome> {
        let entries = self.store.list().await;
        if entries.is_empty() {
            self.notify(ctx.chat, LIST_EMPTY).await;
            return Ok(Outcome::Completed);
        }

        let mut listing = String::from("📜 قائمة الردود المحفوظة:\n\n");
        for (trigger, reply) in &entries {
            listing.push_str(&format!("🔹 \"{}\" → \"{}\"\n", trigger, reply));
        }
        self.notify(ctx.chat, &listing).await;
        Ok(Outcome::Completed)
    }

    async fn report_spam(&self, ctx: &MessageContext<'_>) -> Result<Outcome> {
        let Some(quoted) = ctx.message.quoted.as_deref() else {
            self.notify(ctx.chat, REPORT_USAGE).await;
            return Ok(Outcome::Rejected(ValidationFailure::MissingArgument));
        };

        let Some(offender) = quoted.sender.as_deref() else {
            self.notify(ctx.chat, SENDER_UNRESOLVED).await;
            return Ok(Outcome::Rejected(ValidationFailure::MissingArgument));
        };

        self.moderator
            .enforce(ctx.chat, &quoted.id, offender, EnforceReason::Reported)
            .await;
        Ok(Outcome::Completed)
    }

    async fn tag_all(&self, ctx: &MessageContext<'_>) -> Result<Outcome> {
        let participants = self.transport.group_participants(ctx.chat).await?;

        let mut tags = String::new();
        for participant in &participants {
            tags.push_str(&format!("@{} ", mention_tag(participant)));
        }
        self.notify_mentioning(ctx.chat, &tags, &participants).await;
        Ok(Outcome::Completed)
    }

    async fn notify(&self, chat: &str, text: &str) {
        self.notify_mentioning(chat, text, &[]).await;
    }

    /// Notices are best effort; a failed send never fails the command.
    async fn notify_mentioning(&self, chat: &str, text: &str, mentions: &[String]) {
        if let Err(e) = self.transport.send_text(chat, text, mentions).await {
            warn!("Failed to send notice to {}: {}", chat, e);
        }
    }
}
