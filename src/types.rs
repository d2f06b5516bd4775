use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Roast,
    Aggressive,
    Funny,
    Freestyle,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Roast,
        Category::Aggressive,
        Category::Funny,
        Category::Freestyle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Roast => "roast",
            Category::Aggressive => "aggressive",
            Category::Funny => "funny",
            Category::Freestyle => "freestyle",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Display label used in notices ("Rapper 1" / "Rapper 2")
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "Rapper 1",
            Side::Right => "Rapper 2",
        }
    }

    /// Voice a side starts out with before the user picks one
    pub fn default_voice(&self) -> Voice {
        match self {
            Side::Left => Voice::EnInRohan,
            Side::Right => Voice::EnInAarav,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    #[default]
    None,
    Left,
    Right,
}

impl From<Side> for Turn {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Turn::Left,
            Side::Right => Turn::Right,
        }
    }
}

/// Reactions the audience can throw at a battle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    ThumbsUp,
    Fire,
    Laugh,
    MindBlown,
}

impl Reaction {
    pub const ALL: [Reaction; 4] = [
        Reaction::ThumbsUp,
        Reaction::Fire,
        Reaction::Laugh,
        Reaction::MindBlown,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            Reaction::ThumbsUp => "👍",
            Reaction::Fire => "🔥",
            Reaction::Laugh => "😂",
            Reaction::MindBlown => "🤯",
        }
    }

    pub fn from_emoji(emoji: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.emoji() == emoji)
    }
}

/// Allow-listed TTS voices.
///
/// The relay rejects any `voiceId` that does not parse into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voice {
    EnUsNatalie,
    EnInRohan,
    EnInAarav,
}

impl Voice {
    pub const ALL: [Voice; 3] = [Voice::EnUsNatalie, Voice::EnInRohan, Voice::EnInAarav];

    /// Identifier understood by the upstream provider
    pub fn id(&self) -> &'static str {
        match self {
            Voice::EnUsNatalie => "en-US-natalie",
            Voice::EnInRohan => "en-IN-rohan",
            Voice::EnInAarav => "en-IN-aarav",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Voice::EnUsNatalie => "Natalie (Female)",
            Voice::EnInRohan => "Rohan (Male)",
            Voice::EnInAarav => "Aarav (Male)",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid voice ID: {0}")]
pub struct UnknownVoice(pub String);

impl FromStr for Voice {
    type Err = UnknownVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.id() == s)
            .ok_or_else(|| UnknownVoice(s.to_string()))
    }
}

impl Serialize for Voice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Voice {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Timing knobs for a battle run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    pub duration: Duration,
    /// Countdown at or below this is flagged urgent
    pub urgent_threshold: Duration,
    /// Delay between two revealed characters
    pub reveal_interval: Duration,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(120),
            urgent_threshold: Duration::from_secs(30),
            reveal_interval: Duration::from_millis(50),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_allow_list() {
        assert_eq!("en-US-natalie".parse::<Voice>(), Ok(Voice::EnUsNatalie));
        assert_eq!("en-IN-rohan".parse::<Voice>(), Ok(Voice::EnInRohan));
        assert_eq!("en-IN-aarav".parse::<Voice>(), Ok(Voice::EnInAarav));
        assert!("en-US-bogus".parse::<Voice>().is_err());
        assert!("".parse::<Voice>().is_err());
    }

    #[test]
    fn test_voice_serde_uses_provider_id() {
        let json = serde_json::to_string(&Voice::EnInAarav).unwrap();
        assert_eq!(json, "\"en-IN-aarav\"");

        let voice: Voice = serde_json::from_str("\"en-US-natalie\"").unwrap();
        assert_eq!(voice, Voice::EnUsNatalie);
        assert!(serde_json::from_str::<Voice>("\"en-US-marcus\"").is_err());
    }

    #[test]
    fn test_side_default_voices() {
        assert_eq!(Side::Left.default_voice(), Voice::EnInRohan);
        assert_eq!(Side::Right.default_voice(), Voice::EnInAarav);
    }

    #[test]
    fn test_reaction_emoji_lookup() {
        for reaction in Reaction::ALL {
            assert_eq!(Reaction::from_emoji(reaction.emoji()), Some(reaction));
        }
        assert_eq!(Reaction::from_emoji("💀"), None);
    }
}
