use crate::error::FormatError;
use crate::mood::{detect_mood, Mood};
use crate::profile::CharacterProfile;
use crate::template;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One generated reply with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub reply: String,
    pub mood: Mood,
    /// RFC 3339 UTC instant, e.g. `2025-01-01T08:30:00.000000+00:00`.
    pub timestamp: String,
}

/// Anything that can turn a user message into a character reply.
///
/// The HTTP layer only sees this trait, so it can be handed a stub in tests.
pub trait Responder: Send + Sync {
    fn respond(&self, message: &str) -> Result<Reply, FormatError>;

    /// Clear per-conversation state. Must not fail.
    fn reset(&self);
}

/// ResponseEngine — rule-based replies for a single character.
///
/// Holds the loaded profile for the lifetime of the process. Stateless
/// between calls, so one instance can serve concurrent requests behind an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct ResponseEngine {
    profile: CharacterProfile,
}

impl ResponseEngine {
    pub fn new(profile: CharacterProfile) -> Self {
        if !profile.has_neutral() {
            tracing::warn!(
                "Character '{}' has no neutral template; unmatched moods will echo the message",
                profile.name
            );
        }
        for (mood, err) in profile.validate() {
            tracing::warn!("Template for mood '{}' will fail to render: {}", mood, err);
        }
        Self { profile }
    }

    pub fn profile(&self) -> &CharacterProfile {
        &self.profile
    }

    /// Build a reply stamped with `now`.
    pub fn respond_at(&self, message: &str, now: DateTime<Utc>) -> Result<Reply, FormatError> {
        let mood = detect_mood(message);
        let reply = template::render(&self.profile, mood, message)?;
        tracing::debug!(%mood, "Rendered reply for '{}'", self.profile.name);
        Ok(Reply {
            reply,
            mood,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, false),
        })
    }
}

impl Responder for ResponseEngine {
    fn respond(&self, message: &str) -> Result<Reply, FormatError> {
        self.respond_at(message, Utc::now())
    }

    fn reset(&self) {
        // No per-conversation state yet (affinity, short-term memory).
        tracing::debug!("Reset requested for '{}'", self.profile.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn damian() -> ResponseEngine {
        let profile = CharacterProfile::new("Damian", HashMap::new())
            .with_template(Mood::Neutral, "{name} says: {msg}")
            .with_template(Mood::Angry, "{name} snaps: {msg}");
        ResponseEngine::new(profile)
    }

    #[test]
    fn test_angry_scenario() {
        let reply = damian().respond("I am so mad").unwrap();
        assert_eq!(reply.mood, Mood::Angry);
        assert_eq!(reply.reply, "Damian snaps: I am so mad");
    }

    #[test]
    fn test_neutral_scenario() {
        let reply = damian().respond("hello there").unwrap();
        assert_eq!(reply.mood, Mood::Neutral);
        assert_eq!(reply.reply, "Damian says: hello there");
    }

    #[test]
    fn test_happy_falls_back_to_neutral_template() {
        let reply = damian().respond("I love tea").unwrap();
        assert_eq!(reply.mood, Mood::Happy);
        assert_eq!(reply.reply, "Damian says: I love tea");
    }

    #[test]
    fn test_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let reply = damian().respond_at("hi", now).unwrap();
        assert_eq!(reply.timestamp, "2025-01-02T03:04:05.000000+00:00");
        assert!(DateTime::parse_from_rfc3339(&reply.timestamp).is_ok());
    }

    #[test]
    fn test_format_error_does_not_poison_engine() {
        let profile = CharacterProfile::new("D", HashMap::new())
            .with_template(Mood::Neutral, "{name}: {msg}")
            .with_template(Mood::Angry, "{name} {rage}");
        let engine = ResponseEngine::new(profile);

        let err = engine.respond("so angry").unwrap_err();
        assert_eq!(err, FormatError::UnknownPlaceholder("rage".into()));

        let ok = engine.respond("hello").unwrap();
        assert_eq!(ok.reply, "D: hello");
    }

    #[test]
    fn test_reset_has_no_effect() {
        let engine = damian();
        let now = Utc::now();
        let before = engine.respond_at("I am so mad", now).unwrap();
        engine.reset();
        engine.reset();
        let after = engine.respond_at("I am so mad", now).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reply_json_shape() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let reply = damian().respond_at("hello", now).unwrap();
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["reply"], "Damian says: hello");
        assert_eq!(json["mood"], "neutral");
        assert_eq!(json["timestamp"], "2025-01-02T03:04:05.000000+00:00");
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResponseEngine>();
    }
}
