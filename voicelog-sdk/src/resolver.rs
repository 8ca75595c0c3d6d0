//! Text-channel resolution
//!
//! Maps a voice channel to the text channel its notifications go to:
//!
//! 1. a text channel ID resolves to itself
//! 2. otherwise the first selectable channel of the same guild with the same
//!    name and parent category
//! 3. otherwise the voice channel's own ID
//!
//! Only channels that cannot be tied to a guild (unknown IDs, DMs) resolve to
//! nothing. The final fallback may name a channel the host refuses to post
//! into; that surfaces later as a send failure.

use voicelog_host::{ChannelId, Directory};

/// Resolve the text channel notifications about `voice_channel_id` go to
pub fn resolve_text_channel(
    directory: &dyn Directory,
    voice_channel_id: &ChannelId,
) -> Option<ChannelId> {
    let channel = directory.channel(voice_channel_id)?;
    let guild_id = channel.guild_id.as_ref().filter(|_| channel.is_guild())?;

    if channel.is_text() {
        return Some(channel.id);
    }

    let Some(groups) = directory.guild_channels(guild_id) else {
        tracing::trace!(%voice_channel_id, %guild_id, "guild channels unavailable, using voice channel");
        return Some(channel.id);
    };

    let associated = groups
        .selectable
        .into_iter()
        .find(|candidate| candidate.name == channel.name && candidate.parent_id == channel.parent_id)
        .map(|candidate| candidate.id);

    match associated {
        Some(text_channel_id) => {
            tracing::trace!(%voice_channel_id, %text_channel_id, "resolved associated text channel");
            Some(text_channel_id)
        }
        None => Some(channel.id),
    }
}
