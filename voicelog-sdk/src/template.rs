//! Template rendering
//!
//! Templates are plain strings with `{placeholder}` tags. Rendering is a
//! single left-to-right scan: each recognised tag is replaced by its value
//! exactly once, and substituted values are never rescanned, so a username
//! like `{guildName}` comes out literally. Unknown tags, and known tags with
//! no value in the context, are left as written.
//!
//! # Placeholders
//!
//! | Tag                | Value                                   |
//! |--------------------|-----------------------------------------|
//! | `{username}`       | subject's username                      |
//! | `{displayname}`    | global name, else username              |
//! | `{userid}`         | subject's ID                            |
//! | `{avatar}`         | avatar URL, author templates only       |
//! | `{oldChannelName}` | old channel name, else "Unknown Channel" |
//! | `{oldChannelId}`   | old channel ID, else empty              |
//! | `{newChannelName}` | new channel name, else "Unknown Channel" |
//! | `{newChannelId}`   | new channel ID, else empty              |
//! | `{guildName}`      | guild name, else "Unknown Guild"        |
//! | `{guildId}`        | guild ID, else empty                    |
//! | `{now}`            | local date-time at render time          |

use std::collections::HashMap;

use chrono::{Local, NaiveDateTime};
use voicelog_host::{ChannelId, ChannelRecord, GuildRecord, UserRecord};

const UNKNOWN_CHANNEL: &str = "Unknown Channel";
const UNKNOWN_GUILD: &str = "Unknown Guild";

/// `{now}` format, e.g. "10/16/2026, 3:04:05 PM"
pub const NOW_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

// ============================================================================
// Clock
// ============================================================================

/// Source of the `{now}` timestamp
pub trait Clock: Send + Sync {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Format a timestamp the way `{now}` renders it
pub fn format_now(now: NaiveDateTime) -> String {
    now.format(NOW_FORMAT).to_string()
}

// ============================================================================
// Placeholders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Username,
    DisplayName,
    UserId,
    Avatar,
    OldChannelName,
    OldChannelId,
    NewChannelName,
    NewChannelId,
    GuildName,
    GuildId,
    Now,
}

impl Placeholder {
    /// Look up a tag by the text between its braces (case-sensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let placeholder = match tag {
            "username" => Placeholder::Username,
            "displayname" => Placeholder::DisplayName,
            "userid" => Placeholder::UserId,
            "avatar" => Placeholder::Avatar,
            "oldChannelName" => Placeholder::OldChannelName,
            "oldChannelId" => Placeholder::OldChannelId,
            "newChannelName" => Placeholder::NewChannelName,
            "newChannelId" => Placeholder::NewChannelId,
            "guildName" => Placeholder::GuildName,
            "guildId" => Placeholder::GuildId,
            "now" => Placeholder::Now,
            _ => return None,
        };
        Some(placeholder)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Placeholder::Username => "username",
            Placeholder::DisplayName => "displayname",
            Placeholder::UserId => "userid",
            Placeholder::Avatar => "avatar",
            Placeholder::OldChannelName => "oldChannelName",
            Placeholder::OldChannelId => "oldChannelId",
            Placeholder::NewChannelName => "newChannelName",
            Placeholder::NewChannelId => "newChannelId",
            Placeholder::GuildName => "guildName",
            Placeholder::GuildId => "guildId",
            Placeholder::Now => "now",
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// Values available to one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: HashMap<Placeholder, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// User fields plus `{now}`
    pub fn for_user(user: &UserRecord, now: &str) -> Self {
        Self::new()
            .with(Placeholder::Username, &user.username)
            .with(Placeholder::DisplayName, user.display_name())
            .with(Placeholder::UserId, user.id.as_str())
            .with(Placeholder::Now, now)
    }

    /// Author templates additionally see `{avatar}`
    pub fn for_author(user: &UserRecord, now: &str) -> Self {
        Self::for_user(user, now).with(
            Placeholder::Avatar,
            user.avatar_url.as_deref().unwrap_or_default(),
        )
    }

    /// Old and new channel fields; names come from the directory records
    pub fn with_channels(
        self,
        old_channel_id: Option<&ChannelId>,
        old_channel: Option<&ChannelRecord>,
        new_channel_id: Option<&ChannelId>,
        new_channel: Option<&ChannelRecord>,
    ) -> Self {
        let name = |channel: Option<&ChannelRecord>| {
            channel
                .map(|c| c.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_CHANNEL)
                .to_string()
        };
        let id = |id: Option<&ChannelId>| id.map(ChannelId::as_str).unwrap_or_default().to_string();

        self.with(Placeholder::OldChannelName, name(old_channel))
            .with(Placeholder::OldChannelId, id(old_channel_id))
            .with(Placeholder::NewChannelName, name(new_channel))
            .with(Placeholder::NewChannelId, id(new_channel_id))
    }

    pub fn with_guild(self, guild: Option<&GuildRecord>) -> Self {
        let name = guild
            .map(|g| g.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_GUILD);
        let id = guild.map(|g| g.id.as_str()).unwrap_or_default();

        self.with(Placeholder::GuildName, name)
            .with(Placeholder::GuildId, id)
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Substitute every known placeholder in one pass
///
/// Returns `None` for an empty or whitespace-only template: nothing to send.
pub fn render(template: &str, context: &TemplateContext) -> Option<String> {
    if template.trim().is_empty() {
        return None;
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let tag = &after[..close];
            Placeholder::from_tag(tag)
                .and_then(|p| context.get(p))
                .map(|value| (value, close))
        });

        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Some(out)
}
