//! The four colored pads: their ids, sounds, DOM classes and level numbers.
//! The table is fixed for the lifetime of the program.

use std::fmt;
use std::str::FromStr;

/// Color identifier of a pad. The string form (`"red"`, ...) is what the page
/// carries in `data-color` attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PadColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl PadColor {
    pub const ALL: [PadColor; 4] = [PadColor::Red, PadColor::Green, PadColor::Blue, PadColor::Yellow];

    pub fn as_str(self) -> &'static str {
        match self {
            PadColor::Red => "red",
            PadColor::Green => "green",
            PadColor::Blue => "blue",
            PadColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pad color '{0}'")]
pub struct PadError(pub String);

impl FromStr for PadColor {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PadColor::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PadError(s.to_string()))
    }
}

/// Static description of one pad.
#[derive(Debug, Clone, Copy)]
pub struct Pad {
    pub color: PadColor,
    pub sound: &'static str,    // audio asset, relative to the page
    pub selector: &'static str, // CSS class of the pad element
    pub level: u8,              // skill level shown on the pad before a game
}

pub const PADS: [Pad; 4] = [
    Pad { color: PadColor::Red, sound: "assets/simon-says-sound-1.mp3", selector: "js-pad-red", level: 1 },
    Pad { color: PadColor::Green, sound: "assets/simon-says-sound-2.mp3", selector: "js-pad-green", level: 2 },
    Pad { color: PadColor::Blue, sound: "assets/simon-says-sound-3.mp3", selector: "js-pad-blue", level: 3 },
    Pad { color: PadColor::Yellow, sound: "assets/simon-says-sound-4.mp3", selector: "js-pad-yellow", level: 4 },
];

pub fn pad_for(color: PadColor) -> &'static Pad {
    match color {
        PadColor::Red => &PADS[0],
        PadColor::Green => &PADS[1],
        PadColor::Blue => &PADS[2],
        PadColor::Yellow => &PADS[3],
    }
}

pub fn pad_for_level(level: u8) -> Option<&'static Pad> {
    PADS.iter().find(|p| p.level == level)
}
