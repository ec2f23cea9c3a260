//! Keyword-based mood detection for incoming messages.
//!
//! Pure substring containment over a lower-cased copy of the message. The
//! tables carry both English and Chinese terms. There is no scoring: the first
//! table with any hit wins, and angry is checked before happy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ANGRY: &[&str] = &["angry", "mad", "怒", "生氣"];

const HAPPY: &[&str] = &["happy", "love", "開心", "喜"];

/// Classification order. Earlier entries win ties.
const PRIORITY: &[Mood] = &[Mood::Angry, Mood::Happy];

/// Emotional category used to pick a reply template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Angry,
    Happy,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Angry, Mood::Happy, Mood::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Angry => "angry",
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
        }
    }

    /// Keywords that select this mood. Neutral has none.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Mood::Angry => ANGRY,
            Mood::Happy => HAPPY,
            Mood::Neutral => &[],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angry" => Ok(Mood::Angry),
            "happy" => Ok(Mood::Happy),
            "neutral" => Ok(Mood::Neutral),
            other => Err(format!("unknown mood label: {}", other)),
        }
    }
}

/// Classify a message into a [`Mood`].
pub fn detect_mood(message: &str) -> Mood {
    let low = message.to_lowercase();
    PRIORITY
        .iter()
        .find(|mood| mood.keywords().iter().any(|w| low.contains(w)))
        .copied()
        .unwrap_or(Mood::Neutral)
}
