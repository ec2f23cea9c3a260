//! Rule-based replies for a single scripted character.
//!
//! A message is classified into a [`Mood`] by keyword, the matching template
//! is picked from the [`CharacterProfile`], and `{name}` / `{msg}` are
//! substituted into it.

pub mod config;
pub mod engine;
pub mod error;
pub mod mood;
pub mod profile;
pub mod template;

pub use config::SoloConfig;
pub use engine::{Reply, Responder, ResponseEngine};
pub use error::{ConfigError, FormatError};
pub use mood::{detect_mood, Mood};
pub use profile::CharacterProfile;
pub use template::render;
