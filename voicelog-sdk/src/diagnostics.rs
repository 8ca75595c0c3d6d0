//! Default diagnostics sink
//!
//! Routes every `Diagnostic` into `tracing`. Raw payloads go out at `info`
//! under the `voicelog` target so they can be filtered with
//! `VOICELOG_LOG_LEVEL=voicelog=info`.

use voicelog_host::{Diagnostic, Diagnostics, LookupMiss};

/// Diagnostics sink that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self
    }
}

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::VoiceStateReceived { user_id, payload } => {
                tracing::info!(target: "voicelog", "Voice state update for user {}: {}", user_id, payload);
            }
            Diagnostic::LookupMiss { user_id, miss } => match miss {
                LookupMiss::User(missing) => {
                    tracing::debug!(%user_id, %missing, "user not in directory, event skipped");
                }
                LookupMiss::TextChannel(channel_id) => {
                    tracing::debug!(%user_id, %channel_id, "no text channel for voice channel, event skipped");
                }
            },
            Diagnostic::SendFailed {
                user_id,
                event,
                channel_id,
                error,
            } => {
                tracing::warn!(%user_id, event, %channel_id, %error, "failed to send voice log message");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicelog_host::{ChannelId, SendError, UserId};

    #[test]
    fn test_reports_without_subscriber() {
        let diagnostics = TracingDiagnostics::new();
        diagnostics.report(Diagnostic::LookupMiss {
            user_id: UserId::new("42"),
            miss: LookupMiss::User(UserId::new("42")),
        });
        diagnostics.report(Diagnostic::SendFailed {
            user_id: UserId::new("42"),
            event: "move",
            channel_id: ChannelId::new("100"),
            error: SendError::Unavailable("offline".to_string()),
        });
    }
}
