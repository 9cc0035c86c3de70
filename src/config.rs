//! Pacing constants and per-session defaults.

use crate::level::SkillLevel;

/// Millisecond timings for playback and turn transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    pub flash_ms: u32,            // how long a pad stays lit
    pub step_ms: u32,             // spacing between consecutive flashes
    pub player_turn_lead_ms: u32, // slack after playback before input opens
    pub next_round_delay_ms: u32, // pause between a completed round and the next playback
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            flash_ms: 500,
            step_ms: 600,
            player_turn_lead_ms: 1000,
            next_round_delay_ms: 1000,
        }
    }
}

impl Timing {
    /// Delay from the start of a computer turn until the player may answer.
    pub fn player_turn_delay_ms(&self, sequence_len: usize) -> u32 {
        sequence_len as u32 * self.step_ms + self.player_turn_lead_ms
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub timing: Timing,
    pub default_level: SkillLevel,
}
