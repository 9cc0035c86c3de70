//! Playback schedule for the computer's sequence.
//!
//! The state machine only decides *what* to show; it hands the presentation layer an
//! [`AnimationQueue`] of timed cues and a single scheduler turns each cue into a
//! pad flash plus its sound.

use crate::config::Timing;
use crate::pad::PadColor;

/// One pad activation relative to the start of playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cue {
    pub color: PadColor,
    pub start_ms: u32,
    pub duration_ms: u32,
}

impl Cue {
    pub fn end_ms(&self) -> u32 {
        self.start_ms + self.duration_ms
    }
}

/// Append-only list of cues.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationQueue {
    cues: Vec<Cue>,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cue `i` starts at `(i + 1) * step_ms` and lasts `flash_ms`.
    pub fn for_sequence(sequence: &[PadColor], timing: &Timing) -> Self {
        let mut queue = Self::new();
        for (i, &color) in sequence.iter().enumerate() {
            queue.push(Cue {
                color,
                start_ms: (i as u32 + 1) * timing.step_ms,
                duration_ms: timing.flash_ms,
            });
        }
        queue
    }

    pub fn push(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Time at which the last cue has finished.
    pub fn total_ms(&self) -> u32 {
        self.cues.iter().map(Cue::end_ms).max().unwrap_or(0)
    }
}

impl IntoIterator for AnimationQueue {
    type Item = Cue;
    type IntoIter = std::vec::IntoIter<Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.into_iter()
    }
}
