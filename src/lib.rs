//! Inbound-message engine for a group-chat guard bot.
//!
//! Receives normalized message events from a session layer, flags spam,
//! answers stored auto-replies, and dispatches admin commands. The network
//! side stays behind the [`platform::Transport`] and
//! [`platform::AdminLookup`] traits so the engine is platform-agnostic;
//! the embedding binary implements them and feeds events to
//! [`pipeline::MessagePipeline::handle`].

pub mod admin;
pub mod config;
pub mod moderation;
pub mod pipeline;
pub mod platform;
pub mod router;
pub mod spam;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;
