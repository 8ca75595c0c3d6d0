//! Replay fixtures
//!
//! A fixture is a host snapshot plus the batches to feed through it:
//!
//! ```json
//! {
//!   "currentUserId": "1",
//!   "users": [{ "id": "42", "username": "alice" }],
//!   "guilds": [{ "id": "G", "name": "Guild" }],
//!   "channels": [{ "id": "100", "type": 2, "guildId": "G", "name": "lobby" }],
//!   "batches": [{ "voiceStates": [{ "userId": "42", "channelId": "100" }] }]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use voicelog_host::{HostSnapshot, VoiceStateBatch};

#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    #[serde(flatten)]
    pub host: HostSnapshot,
    #[serde(default)]
    pub batches: Vec<VoiceStateBatch>,
}

impl Fixture {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid fixture JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    /// Total number of events across all batches
    pub fn event_count(&self) -> usize {
        self.batches.iter().map(|b| b.voice_states.len()).sum()
    }
}
