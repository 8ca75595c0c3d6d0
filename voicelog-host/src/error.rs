//! Error types for host interactions

use thiserror::Error;

use crate::ids::ChannelId;

/// Errors returned by a host's message-send API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The target is not a valid message destination
    #[error("Channel {channel_id} rejected the message: {reason}")]
    Rejected { channel_id: ChannelId, reason: String },

    /// The host could not deliver the message at all
    #[error("Message send unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during plugin lifecycle operations
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin start failed: {0}")]
    StartFailed(String),

    #[error("Plugin stop failed: {0}")]
    StopFailed(String),
}
