//! Event router
//!
//! Runs every raw event of a batch through filtering, classification and
//! dispatch, strictly in array order. Per event:
//!
//! ```text
//! diagnostics ─▶ own-event filter ─▶ own-channel filter ─▶ user lookup
//!     ─▶ text-channel check ─▶ self correction ─▶ classify
//!     ─▶ render + send (awaited in order) ─▶ tracker.record
//! ```
//!
//! Any filter or lookup miss ends the event early, before the tracker is
//! touched. Send failures are reported and otherwise ignored.

use std::sync::Arc;

use voicelog_host::{
    ChannelId, ChannelRecord, Diagnostic, Diagnostics, Directory, GuildRecord, LookupMiss,
    MessageAuthor, MessageSink, OutgoingMessage, Session, UserId, UserRecord, VoiceStateBatch,
    VoiceStateEvent,
};
use voicelog_state::{classify, SemanticEvent, VoiceStateTracker};

use crate::resolver::resolve_text_channel;
use crate::settings::Settings;
use crate::template::{format_now, render, Clock, SystemClock, TemplateContext};

/// Host collaborators the router talks to
#[derive(Clone)]
pub struct HostServices {
    pub directory: Arc<dyn Directory>,
    pub session: Arc<dyn Session>,
    pub sink: Arc<dyn MessageSink>,
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl HostServices {
    pub fn new(
        directory: Arc<dyn Directory>,
        session: Arc<dyn Session>,
        sink: Arc<dyn MessageSink>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            directory,
            session,
            sink,
            diagnostics,
        }
    }

    /// Use one host object for directory, session and sink
    pub fn from_host<H>(host: Arc<H>, diagnostics: Arc<dyn Diagnostics>) -> Self
    where
        H: Directory + Session + MessageSink + 'static,
    {
        Self {
            directory: host.clone(),
            session: host.clone(),
            sink: host,
            diagnostics,
        }
    }
}

/// What happened to one raw event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Local user's event while `trigger_on_own_events` is off
    SkippedOwnEvent,
    /// Outside the monitored channels while `only_monitor_own_channel` is on
    SkippedUnmonitored,
    /// Subject not in the directory
    UnknownUser,
    /// No text channel for the event's voice channel
    NoTextChannel,
    /// Classified and dispatched; the tracker now holds this event's flags
    Processed {
        /// Semantic events the classifier produced
        classified: usize,
        /// Messages the host accepted
        sent: usize,
        /// Messages the host rejected
        failed: usize,
    },
}

impl EventOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, EventOutcome::Processed { .. })
    }
}

/// Voice-state router
///
/// Owns the `VoiceStateTracker`; nothing else mutates it.
pub struct VoiceLogRouter {
    settings: Settings,
    tracker: VoiceStateTracker,
    services: HostServices,
    clock: Arc<dyn Clock>,
}

impl VoiceLogRouter {
    pub fn new(settings: Settings, services: HostServices) -> Self {
        Self::with_tracker(settings, services, VoiceStateTracker::new())
    }

    /// Start from an existing tracker, e.g. one seeded in a test
    pub fn with_tracker(
        settings: Settings,
        services: HostServices,
        tracker: VoiceStateTracker,
    ) -> Self {
        Self {
            settings,
            tracker,
            services,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for `{now}`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply new settings; takes effect from the next event
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn tracker(&self) -> &VoiceStateTracker {
        &self.tracker
    }

    /// Process a batch in array order
    ///
    /// Returns one outcome per event, or nothing when the voice log is
    /// disabled.
    pub async fn handle_batch(&mut self, batch: &VoiceStateBatch) -> Vec<EventOutcome> {
        if !self.settings.enabled {
            tracing::trace!(events = batch.voice_states.len(), "voice log disabled, batch skipped");
            return Vec::new();
        }

        let current_user_id = self.services.session.current_user_id();

        let mut outcomes = Vec::with_capacity(batch.voice_states.len());
        for event in &batch.voice_states {
            let outcome = self.handle_event(event, current_user_id.as_ref()).await;
            tracing::debug!(user_id = %event.user_id, ?outcome, "voice state processed");
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Process one event
    pub async fn handle_event(
        &mut self,
        event: &VoiceStateEvent,
        current_user_id: Option<&UserId>,
    ) -> EventOutcome {
        if self.settings.console_logging {
            self.report_payload(event);
        }

        let is_me = current_user_id == Some(&event.user_id);
        if is_me && !self.settings.trigger_on_own_events {
            return EventOutcome::SkippedOwnEvent;
        }

        let current_channel_id = event.current_channel_id();

        if self.settings.only_monitor_own_channel && !self.is_monitored(current_channel_id) {
            return EventOutcome::SkippedUnmonitored;
        }

        let directory = Arc::clone(&self.services.directory);

        let Some(user) = directory.user(&event.user_id) else {
            self.report_miss(event, LookupMiss::User(event.user_id.clone()));
            return EventOutcome::UnknownUser;
        };

        let Some(current_channel_id) = current_channel_id else {
            return EventOutcome::NoTextChannel;
        };

        let voice_channel = directory.channel(current_channel_id);
        let guild = voice_channel
            .as_ref()
            .and_then(|channel| channel.guild_id.as_ref())
            .and_then(|guild_id| directory.guild(guild_id));

        let Some(target) = resolve_text_channel(directory.as_ref(), current_channel_id) else {
            self.report_miss(event, LookupMiss::TextChannel(current_channel_id.clone()));
            return EventOutcome::NoTextChannel;
        };

        let old_channel_id = if is_me {
            self.tracker.correct_old_channel(event)
        } else {
            event.old_channel_id.clone()
        };

        let semantic_events = classify(
            event,
            self.tracker.get(&event.user_id),
            old_channel_id.as_ref(),
        );

        let channels = ChannelNames {
            old: old_channel_id.as_ref().and_then(|id| directory.channel(id)),
            new: event.channel_id.as_ref().and_then(|id| directory.channel(id)),
        };

        let mut sent = 0;
        let mut failed = 0;

        for semantic in &semantic_events {
            if !self.settings.toggle(semantic.kind) {
                continue;
            }

            let text_channel_id = if &semantic.voice_channel_id == current_channel_id {
                target.clone()
            } else {
                match resolve_text_channel(directory.as_ref(), &semantic.voice_channel_id) {
                    Some(id) => id,
                    None => {
                        self.report_miss(
                            event,
                            LookupMiss::TextChannel(semantic.voice_channel_id.clone()),
                        );
                        continue;
                    }
                }
            };

            let Some(message) = self.compose(semantic, &user, &channels, guild.as_ref()) else {
                continue;
            };

            match self.services.sink.send(&text_channel_id, message).await {
                Ok(()) => sent += 1,
                Err(error) => {
                    failed += 1;
                    self.services.diagnostics.report(Diagnostic::SendFailed {
                        user_id: event.user_id.clone(),
                        event: semantic.kind.as_str(),
                        channel_id: text_channel_id,
                        error,
                    });
                }
            }
        }

        self.tracker.record(event);

        EventOutcome::Processed {
            classified: semantic_events.len(),
            sent,
            failed,
        }
    }

    /// Whether an event in `channel_id` passes `only_monitor_own_channel`
    fn is_monitored(&self, channel_id: Option<&ChannelId>) -> bool {
        let Some(channel_id) = channel_id else {
            return false;
        };

        let directory = self.services.directory.as_ref();
        let session = self.services.session.as_ref();

        let allowlisted = directory
            .channel(channel_id)
            .and_then(|channel| channel.guild_id)
            .is_some_and(|guild_id| self.settings.is_guild_allowed(&guild_id));
        if allowlisted {
            return true;
        }

        if session.selected_voice_channel_id().as_ref() == Some(channel_id) {
            return true;
        }

        let Some(viewed) = session.viewed_channel_id() else {
            return false;
        };
        &viewed == channel_id || resolve_text_channel(directory, channel_id) == Some(viewed)
    }

    /// Render the body and author of one notification
    ///
    /// `None` when the body template is blank.
    fn compose(
        &self,
        semantic: &SemanticEvent,
        user: &UserRecord,
        channels: &ChannelNames,
        guild: Option<&GuildRecord>,
    ) -> Option<OutgoingMessage> {
        let now = format_now(self.clock.now());

        let context = TemplateContext::for_user(user, &now)
            .with_channels(
                semantic.old_channel_id.as_ref(),
                channels.old.as_ref(),
                semantic.new_channel_id.as_ref(),
                channels.new.as_ref(),
            )
            .with_guild(guild);
        let content = render(self.settings.template(semantic.kind), &context)?;

        let author_context = TemplateContext::for_author(user, &now);
        let username = render(&self.settings.author_name, &author_context).unwrap_or_default();
        let avatar_url = render(&self.settings.author_icon_url, &author_context)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Some(OutgoingMessage {
            content,
            author: Some(MessageAuthor {
                username,
                avatar_url,
            }),
        })
    }

    fn report_payload(&self, event: &VoiceStateEvent) {
        let payload = serde_json::to_string_pretty(event).unwrap_or_else(|e| {
            tracing::warn!(user_id = %event.user_id, error = %e, "failed to serialize voice state");
            format!("{event:?}")
        });
        self.services.diagnostics.report(Diagnostic::VoiceStateReceived {
            user_id: event.user_id.clone(),
            payload,
        });
    }

    fn report_miss(&self, event: &VoiceStateEvent, miss: LookupMiss) {
        self.services.diagnostics.report(Diagnostic::LookupMiss {
            user_id: event.user_id.clone(),
            miss,
        });
    }
}

/// Directory records behind `{oldChannelName}` and `{newChannelName}`
struct ChannelNames {
    old: Option<ChannelRecord>,
    new: Option<ChannelRecord>,
}
