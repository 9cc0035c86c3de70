//! Turns a click on the pad container into an [`InputEvent`].
//!
//! Before a game the pads double as level buttons; during a game they are the
//! playing surface. Which meaning a click has depends only on whether the session
//! is idle.

use log::warn;

use crate::game::InputEvent;
use crate::level::SkillLevel;
use crate::pad::{PadColor, pad_for, pad_for_level};

/// What the click landed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// A pad element (`data-color`).
    Pad(PadColor),
    /// The level number inside a pad, as carried by its `data-level` attribute.
    Label(String),
}

pub fn route(target: ClickTarget, idle: bool) -> Option<InputEvent> {
    match (target, idle) {
        (ClickTarget::Pad(color), true) => {
            let level = SkillLevel::try_from(pad_for(color).level).ok()?;
            Some(InputEvent::LevelChosen(level))
        }
        (ClickTarget::Pad(color), false) => Some(InputEvent::PadPressed(color)),
        (ClickTarget::Label(text), true) => match text.parse::<SkillLevel>() {
            Ok(level) => Some(InputEvent::LevelChosen(level)),
            Err(e) => {
                warn!("ignoring level label click: {e}");
                None
            }
        },
        // Labels are blank during a game; the click belongs to the pad around it.
        (ClickTarget::Label(text), false) => text
            .parse::<SkillLevel>()
            .ok()
            .and_then(|level| pad_for_level(level.get()))
            .map(|pad| InputEvent::PadPressed(pad.color)),
    }
}
