//! User-facing settings
//!
//! Field names serialize to the keys the host persists, so a settings blob
//! exported from the host deserializes directly. Missing keys take their
//! defaults and unknown keys are ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use voicelog_host::{GuildId, SettingDescriptor};
use voicelog_state::EventKind;

use crate::error::SettingsError;

/// Key, description and default of one event kind's toggle and template
struct EventSettings {
    kind: EventKind,
    toggle_key: &'static str,
    toggle_description: &'static str,
    template_key: &'static str,
    template_description: &'static str,
    default_template: &'static str,
}

const EVENT_SETTINGS: [EventSettings; 18] = [
    EventSettings {
        kind: EventKind::Joined,
        toggle_key: "eventUserJoined",
        toggle_description: "Log user join events to voice text chat",
        template_key: "messageUserJoined",
        template_description: "Message format for when someone joins",
        default_template: "🎉 <@{userid}> joined <#{newChannelId}>",
    },
    EventSettings {
        kind: EventKind::Left,
        toggle_key: "eventUserLeft",
        toggle_description: "Log user leave events to voice text chat",
        template_key: "messageUserLeft",
        template_description: "Message format for when someone leaves",
        default_template: "👋 <@{userid}> left <#{oldChannelId}>",
    },
    EventSettings {
        kind: EventKind::Connected,
        toggle_key: "eventUserConnected",
        toggle_description: "Log user connect events to voice text chat",
        template_key: "messageUserConnected",
        template_description: "Message format for when someone connects to voice",
        default_template: "🔊 <@{userid}> connected to <#{newChannelId}>",
    },
    EventSettings {
        kind: EventKind::Disconnected,
        toggle_key: "eventUserDisconnected",
        toggle_description: "Log user disconnect events to voice text chat",
        template_key: "messageUserDisconnected",
        template_description: "Message format for when someone disconnects from voice",
        default_template: "🔇 <@{userid}> disconnected from <#{oldChannelId}>",
    },
    EventSettings {
        kind: EventKind::Moved,
        toggle_key: "eventUserMoved",
        toggle_description: "Log user move events to voice text chat",
        template_key: "messageUserMoved",
        template_description: "Message format for when someone moves between voice channels",
        default_template: "🔄 <@{userid}> moved to <#{newChannelId}>",
    },
    EventSettings {
        kind: EventKind::Default,
        toggle_key: "eventUserDefault",
        toggle_description: "Log user default events to voice text chat",
        template_key: "messageUserDefault",
        template_description: "Default message format for fallback",
        default_template: "📢 <@{userid}> changed voice channel",
    },
    EventSettings {
        kind: EventKind::Muted,
        toggle_key: "eventUserMuted",
        toggle_description: "Log user mute events to voice text chat",
        template_key: "messageUserMuted",
        template_description: "Message format for when someone mutes themselves",
        default_template: "🔇 <@{userid}> muted themselves",
    },
    EventSettings {
        kind: EventKind::Unmuted,
        toggle_key: "eventUserUnmuted",
        toggle_description: "Log user unmute events to voice text chat",
        template_key: "messageUserUnmuted",
        template_description: "Message format for when someone unmutes themselves",
        default_template: "🔊 <@{userid}> unmuted themselves",
    },
    EventSettings {
        kind: EventKind::Deafened,
        toggle_key: "eventUserDeafens",
        toggle_description: "Log user deafen events to voice text chat",
        template_key: "messageUserDeafened",
        template_description: "Message format for when someone deafens themselves",
        default_template: "🤐 <@{userid}> deafened themselves",
    },
    EventSettings {
        kind: EventKind::Undeafened,
        toggle_key: "eventUserUndeafens",
        toggle_description: "Log user undeafen events to voice text chat",
        template_key: "messageUserUndeafened",
        template_description: "Message format for when someone undeafens themselves",
        default_template: "👂 <@{userid}> undeafened themselves",
    },
    EventSettings {
        kind: EventKind::CameraOn,
        toggle_key: "eventUserCameraOn",
        toggle_description: "Log user camera on events to voice text chat",
        template_key: "messageUserCameraOn",
        template_description: "Message format for when someone enables camera",
        default_template: "📹 <@{userid}> enabled their camera",
    },
    EventSettings {
        kind: EventKind::CameraOff,
        toggle_key: "eventUserCameraOff",
        toggle_description: "Log user camera off events to voice text chat",
        template_key: "messageUserCameraOff",
        template_description: "Message format for when someone disables camera",
        default_template: "📴 <@{userid}> disabled their camera",
    },
    EventSettings {
        kind: EventKind::StreamStart,
        toggle_key: "eventUserStreamStart",
        toggle_description: "Log user stream start events to voice text chat",
        template_key: "messageUserStreamStart",
        template_description: "Message format for when someone starts streaming",
        default_template: "📺 <@{userid}> started streaming",
    },
    EventSettings {
        kind: EventKind::StreamStop,
        toggle_key: "eventUserStreamStop",
        toggle_description: "Log user stream stop events to voice text chat",
        template_key: "messageUserStreamStop",
        template_description: "Message format for when someone stops streaming",
        default_template: "⏹️ <@{userid}> stopped streaming",
    },
    EventSettings {
        kind: EventKind::ServerMuted,
        toggle_key: "eventUserServerMuted",
        toggle_description: "Log user server mute events to voice text chat",
        template_key: "messageUserServerMuted",
        template_description: "Message format for when someone gets muted by server/admin",
        default_template: "🔇 <@{userid}> was muted by server/admin",
    },
    EventSettings {
        kind: EventKind::ServerUnmuted,
        toggle_key: "eventUserServerUnmuted",
        toggle_description: "Log user server unmute events to voice text chat",
        template_key: "messageUserServerUnmuted",
        template_description: "Message format for when someone gets unmuted by server/admin",
        default_template: "🔊 <@{userid}> was unmuted by server/admin",
    },
    EventSettings {
        kind: EventKind::ServerDeafened,
        toggle_key: "eventUserServerDeafened",
        toggle_description: "Log user server deafen events to voice text chat",
        template_key: "messageUserServerDeafened",
        template_description: "Message format for when someone gets deafened by server/admin",
        default_template: "🤐 <@{userid}> was deafened by server/admin",
    },
    EventSettings {
        kind: EventKind::ServerUndeafened,
        toggle_key: "eventUserServerUndeafened",
        toggle_description: "Log user server undeafen events to voice text chat",
        template_key: "messageUserServerUndeafened",
        template_description: "Message format for when someone gets undeafened by server/admin",
        default_template: "👂 <@{userid}> was undeafened by server/admin",
    },
];

const TEMPLATE_REFERENCE: &str = "{username} {displayname} {userid} {avatar} {oldChannelName} {oldChannelId} {newChannelName} {newChannelId} {guildName} {guildId} {now}";

fn event_settings(kind: EventKind) -> &'static EventSettings {
    // EVENT_SETTINGS is in EventKind::ALL order
    &EVENT_SETTINGS[EventKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or_default()]
}

/// Default message template for an event kind
pub fn default_template(kind: EventKind) -> &'static str {
    event_settings(kind).default_template
}

/// Every setting the voice log reads
///
/// Invariant: each `EventKind` has exactly one toggle and one template,
/// reachable through `toggle` and `template`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Master switch; when off whole batches are skipped
    pub enabled: bool,
    pub only_monitor_own_channel: bool,
    pub trigger_on_own_events: bool,
    /// Report every raw event payload to diagnostics
    pub console_logging: bool,
    /// Newline-separated guild IDs that bypass `only_monitor_own_channel`
    pub whitelisted_guilds: String,

    /// Author display-name template
    /// Default: "Clyde"
    pub author_name: String,
    /// Author icon template; empty means no icon
    pub author_icon_url: String,

    pub event_user_joined: bool,
    pub event_user_left: bool,
    pub event_user_connected: bool,
    pub event_user_disconnected: bool,
    pub event_user_moved: bool,
    pub event_user_default: bool,
    pub event_user_muted: bool,
    pub event_user_unmuted: bool,
    pub event_user_deafens: bool,
    pub event_user_undeafens: bool,
    pub event_user_camera_on: bool,
    pub event_user_camera_off: bool,
    pub event_user_stream_start: bool,
    pub event_user_stream_stop: bool,
    pub event_user_server_muted: bool,
    pub event_user_server_unmuted: bool,
    pub event_user_server_deafened: bool,
    pub event_user_server_undeafened: bool,

    pub message_user_joined: String,
    pub message_user_left: String,
    pub message_user_connected: String,
    pub message_user_disconnected: String,
    pub message_user_moved: String,
    pub message_user_default: String,
    pub message_user_muted: String,
    pub message_user_unmuted: String,
    pub message_user_deafened: String,
    pub message_user_undeafened: String,
    pub message_user_camera_on: String,
    pub message_user_camera_off: String,
    pub message_user_stream_start: String,
    pub message_user_stream_stop: String,
    pub message_user_server_muted: String,
    pub message_user_server_unmuted: String,
    pub message_user_server_deafened: String,
    pub message_user_server_undeafened: String,
}

impl Default for Settings {
    fn default() -> Self {
        let template = |kind| default_template(kind).to_string();

        Self {
            enabled: true,
            only_monitor_own_channel: false,
            trigger_on_own_events: false,
            console_logging: false,
            whitelisted_guilds: String::new(),

            author_name: "Clyde".to_string(),
            author_icon_url: String::new(),

            event_user_joined: true,
            event_user_left: true,
            event_user_connected: true,
            event_user_disconnected: true,
            event_user_moved: true,
            event_user_default: true,
            event_user_muted: true,
            event_user_unmuted: true,
            event_user_deafens: true,
            event_user_undeafens: true,
            event_user_camera_on: true,
            event_user_camera_off: true,
            event_user_stream_start: true,
            event_user_stream_stop: true,
            event_user_server_muted: true,
            event_user_server_unmuted: true,
            event_user_server_deafened: true,
            event_user_server_undeafened: true,

            message_user_joined: template(EventKind::Joined),
            message_user_left: template(EventKind::Left),
            message_user_connected: template(EventKind::Connected),
            message_user_disconnected: template(EventKind::Disconnected),
            message_user_moved: template(EventKind::Moved),
            message_user_default: template(EventKind::Default),
            message_user_muted: template(EventKind::Muted),
            message_user_unmuted: template(EventKind::Unmuted),
            message_user_deafened: template(EventKind::Deafened),
            message_user_undeafened: template(EventKind::Undeafened),
            message_user_camera_on: template(EventKind::CameraOn),
            message_user_camera_off: template(EventKind::CameraOff),
            message_user_stream_start: template(EventKind::StreamStart),
            message_user_stream_stop: template(EventKind::StreamStop),
            message_user_server_muted: template(EventKind::ServerMuted),
            message_user_server_unmuted: template(EventKind::ServerUnmuted),
            message_user_server_deafened: template(EventKind::ServerDeafened),
            message_user_server_undeafened: template(EventKind::ServerUndeafened),
        }
    }
}

impl Settings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Only channel membership changes, no mute/deafen/camera/stream noise
    pub fn quiet() -> Self {
        let mut settings = Self::default();
        for kind in EventKind::ALL {
            let keep = matches!(
                kind,
                EventKind::Connected | EventKind::Disconnected | EventKind::Moved
            );
            settings.set_toggle(kind, keep);
        }
        settings
    }

    /// Parse a persisted settings blob
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// `<config dir>/voicelog/settings.json`
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("voicelog").join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Whether notifications of this kind are enabled
    pub fn toggle(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::Joined => self.event_user_joined,
            EventKind::Left => self.event_user_left,
            EventKind::Connected => self.event_user_connected,
            EventKind::Disconnected => self.event_user_disconnected,
            EventKind::Moved => self.event_user_moved,
            EventKind::Default => self.event_user_default,
            EventKind::Muted => self.event_user_muted,
            EventKind::Unmuted => self.event_user_unmuted,
            EventKind::Deafened => self.event_user_deafens,
            EventKind::Undeafened => self.event_user_undeafens,
            EventKind::CameraOn => self.event_user_camera_on,
            EventKind::CameraOff => self.event_user_camera_off,
            EventKind::StreamStart => self.event_user_stream_start,
            EventKind::StreamStop => self.event_user_stream_stop,
            EventKind::ServerMuted => self.event_user_server_muted,
            EventKind::ServerUnmuted => self.event_user_server_unmuted,
            EventKind::ServerDeafened => self.event_user_server_deafened,
            EventKind::ServerUndeafened => self.event_user_server_undeafened,
        }
    }

    pub fn set_toggle(&mut self, kind: EventKind, enabled: bool) {
        *self.toggle_mut(kind) = enabled;
    }

    fn toggle_mut(&mut self, kind: EventKind) -> &mut bool {
        match kind {
            EventKind::Joined => &mut self.event_user_joined,
            EventKind::Left => &mut self.event_user_left,
            EventKind::Connected => &mut self.event_user_connected,
            EventKind::Disconnected => &mut self.event_user_disconnected,
            EventKind::Moved => &mut self.event_user_moved,
            EventKind::Default => &mut self.event_user_default,
            EventKind::Muted => &mut self.event_user_muted,
            EventKind::Unmuted => &mut self.event_user_unmuted,
            EventKind::Deafened => &mut self.event_user_deafens,
            EventKind::Undeafened => &mut self.event_user_undeafens,
            EventKind::CameraOn => &mut self.event_user_camera_on,
            EventKind::CameraOff => &mut self.event_user_camera_off,
            EventKind::StreamStart => &mut self.event_user_stream_start,
            EventKind::StreamStop => &mut self.event_user_stream_stop,
            EventKind::ServerMuted => &mut self.event_user_server_muted,
            EventKind::ServerUnmuted => &mut self.event_user_server_unmuted,
            EventKind::ServerDeafened => &mut self.event_user_server_deafened,
            EventKind::ServerUndeafened => &mut self.event_user_server_undeafened,
        }
    }

    /// Message template of this kind
    pub fn template(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::Joined => &self.message_user_joined,
            EventKind::Left => &self.message_user_left,
            EventKind::Connected => &self.message_user_connected,
            EventKind::Disconnected => &self.message_user_disconnected,
            EventKind::Moved => &self.message_user_moved,
            EventKind::Default => &self.message_user_default,
            EventKind::Muted => &self.message_user_muted,
            EventKind::Unmuted => &self.message_user_unmuted,
            EventKind::Deafened => &self.message_user_deafened,
            EventKind::Undeafened => &self.message_user_undeafened,
            EventKind::CameraOn => &self.message_user_camera_on,
            EventKind::CameraOff => &self.message_user_camera_off,
            EventKind::StreamStart => &self.message_user_stream_start,
            EventKind::StreamStop => &self.message_user_stream_stop,
            EventKind::ServerMuted => &self.message_user_server_muted,
            EventKind::ServerUnmuted => &self.message_user_server_unmuted,
            EventKind::ServerDeafened => &self.message_user_server_deafened,
            EventKind::ServerUndeafened => &self.message_user_server_undeafened,
        }
    }

    /// Guild IDs from `whitelisted_guilds`, trimmed, blank lines dropped
    pub fn allowed_guilds(&self) -> Vec<GuildId> {
        self.whitelisted_guilds
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(GuildId::new)
            .collect()
    }

    pub fn is_guild_allowed(&self, guild_id: &GuildId) -> bool {
        self.whitelisted_guilds
            .lines()
            .any(|line| line.trim() == guild_id.as_str())
    }

    /// Settings schema in the order the host displays it
    pub fn schema() -> Vec<SettingDescriptor> {
        let defaults = Self::default();
        let mut schema = vec![
            SettingDescriptor::boolean(
                "enabled",
                "Enable voice channel join/leave logging",
                defaults.enabled,
            ),
            SettingDescriptor::boolean(
                "onlyMonitorOwnChannel",
                "Only monitor your current voice channel or the channel you are viewing",
                defaults.only_monitor_own_channel,
            ),
            SettingDescriptor::boolean(
                "triggerOnOwnEvents",
                "Trigger chat messages on your own voice events",
                defaults.trigger_on_own_events,
            ),
            SettingDescriptor::boolean(
                "consoleLogging",
                "Enable console logging for voice state updates",
                defaults.console_logging,
            ),
            SettingDescriptor::string(
                "whitelistedGuilds",
                "List of guild IDs to always monitor (even if Only Monitor Own Channel is on) - Newline separated",
                defaults.whitelisted_guilds,
            ),
            SettingDescriptor::string(
                "authorName",
                "Author name for bot messages (displayed as the sender). Variables: {username}=username, {displayname}=display name, {userid}=user ID",
                defaults.author_name,
            ),
            SettingDescriptor::string(
                "authorIconUrl",
                "Author icon URL for bot messages (leave empty for default). Variables: {username}=username, {displayname}=display name, {userid}=user ID, {avatar}=avatar URL",
                defaults.author_icon_url,
            ),
        ];

        schema.extend(EVENT_SETTINGS.iter().map(|event| {
            SettingDescriptor::boolean(event.toggle_key, event.toggle_description, true)
        }));

        schema.extend(EVENT_SETTINGS.iter().map(|event| {
            SettingDescriptor::string(
                event.template_key,
                event.template_description,
                event.default_template,
            )
        }));

        schema.push(
            SettingDescriptor::string(
                "messageTemplateReference",
                "Template Reference - Variables: {username}=username, {displayname}=display name, {userid}=user ID, {oldChannelName}=previous channel name, {oldChannelId}=previous channel ID, {newChannelName}=new channel name, {newChannelId}=new channel ID, {guildName}=server name, {guildId}=server ID, {now}=current time and date",
                TEMPLATE_REFERENCE,
            )
            .read_only(),
        );

        schema
    }
}
