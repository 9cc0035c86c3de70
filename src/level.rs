//! Skill levels and the number of rounds each one asks for.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("Please enter level 1, 2, 3, or 4")]
    OutOfRange(u8),
    #[error("'{0}' is not a skill level")]
    InvalidLabel(String),
}

/// Target round count for a skill level.
pub fn rounds_for_level(level: u8) -> Result<u32, LevelError> {
    match level {
        1 => Ok(8),
        2 => Ok(14),
        3 => Ok(20),
        4 => Ok(31),
        other => Err(LevelError::OutOfRange(other)),
    }
}

/// A skill level known to be in 1..=4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct SkillLevel(u8);

impl SkillLevel {
    pub const MIN: SkillLevel = SkillLevel(1);
    pub const MAX: SkillLevel = SkillLevel(4);

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn max_rounds(self) -> u32 {
        // constructor guarantees range
        rounds_for_level(self.0).unwrap_or(0)
    }
}

impl Default for SkillLevel {
    fn default() -> Self {
        SkillLevel::MIN
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = LevelError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        rounds_for_level(level).map(|_| SkillLevel(level))
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> u8 {
        level.0
    }
}

/// Parses the number printed on a pad.
impl FromStr for SkillLevel {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| LevelError::InvalidLabel(s.to_string()))?;
        SkillLevel::try_from(n)
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
