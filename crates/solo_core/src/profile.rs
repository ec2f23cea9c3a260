use crate::error::{ConfigError, FormatError};
use crate::mood::Mood;
use crate::template;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;

/// Used when neither the mood's template nor `neutral` is available.
pub const DEFAULT_TEMPLATE: &str = "{msg}";

/// CharacterProfile — identity and reply templates for the one scripted character.
///
/// Built once from a YAML character file and never mutated afterwards.
/// Only `basic_info.name` and `speech_patterns` are read; every other
/// section of the file is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterProfile {
    pub name: String,
    templates: HashMap<Mood, String>,
}

impl CharacterProfile {
    pub fn new(name: impl Into<String>, templates: HashMap<Mood, String>) -> Self {
        Self {
            name: name.into(),
            templates,
        }
    }

    /// Add or replace the template for one mood.
    pub fn with_template(mut self, mood: Mood, template: impl Into<String>) -> Self {
        self.templates.insert(mood, template.into());
        self
    }

    /// Read and validate a character file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_yaml_str(&content)?;
        tracing::info!(
            "Loaded character '{}' from {} ({} templates)",
            profile.name,
            path.display(),
            profile.templates.len()
        );
        Ok(profile)
    }

    /// Parse a character document.
    ///
    /// Requires `basic_info.name` (string) and `speech_patterns` (mapping of
    /// mood label to template string). Labels outside the known mood set are
    /// skipped with a warning.
    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        if src.trim().is_empty() {
            return Err(ConfigError::Empty);
        }
        let root = match serde_yaml::from_str::<Value>(src)? {
            Value::Mapping(m) => m,
            Value::Null => return Err(ConfigError::Empty),
            _ => return Err(ConfigError::NotAMapping),
        };

        let basic_info = root
            .get("basic_info")
            .ok_or(ConfigError::MissingKey("basic_info"))?;
        let speech_patterns = root
            .get("speech_patterns")
            .ok_or(ConfigError::MissingKey("speech_patterns"))?;

        let name = basic_info
            .get("name")
            .ok_or(ConfigError::MissingKey("basic_info.name"))?
            .as_str()
            .ok_or_else(|| ConfigError::InvalidSection {
                key: "basic_info",
                reason: "`name` must be a string".to_string(),
            })?;

        let patterns = speech_patterns
            .as_mapping()
            .ok_or_else(|| ConfigError::InvalidSection {
                key: "speech_patterns",
                reason: "expected a mapping of mood to template".to_string(),
            })?;

        Ok(Self::new(name, parse_templates(patterns)?))
    }

    /// Template for `mood`, falling back to `neutral`, then to [`DEFAULT_TEMPLATE`].
    ///
    /// An empty template for `mood` counts as absent. An empty `neutral` is
    /// still used as the fallback.
    pub fn template_for(&self, mood: Mood) -> &str {
        self.templates
            .get(&mood)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.neutral().unwrap_or(DEFAULT_TEMPLATE))
    }

    fn neutral(&self) -> Option<&str> {
        self.templates.get(&Mood::Neutral).map(String::as_str)
    }

    /// Whether a `neutral` template exists to catch unmatched moods.
    pub fn has_neutral(&self) -> bool {
        self.neutral().is_some()
    }

    pub fn templates(&self) -> &HashMap<Mood, String> {
        &self.templates
    }

    /// Templates that would fail to render, in mood order.
    pub fn validate(&self) -> Vec<(Mood, FormatError)> {
        let mut problems: Vec<_> = self
            .templates
            .iter()
            .filter_map(|(mood, t)| template::check(t).err().map(|e| (*mood, e)))
            .collect();
        problems.sort_by_key(|(mood, _)| *mood);
        problems
    }
}

fn parse_templates(patterns: &Mapping) -> Result<HashMap<Mood, String>, ConfigError> {
    let mut templates = HashMap::new();
    for (key, value) in patterns {
        let label = key.as_str().ok_or_else(|| ConfigError::InvalidSection {
            key: "speech_patterns",
            reason: format!("mood labels must be strings, got {:?}", key),
        })?;
        // `angry:` with no value is treated like a missing template
        if value.is_null() {
            tracing::warn!("Template for mood '{}' is empty; using fallback", label);
            continue;
        }
        let text = value.as_str().ok_or_else(|| ConfigError::InvalidSection {
            key: "speech_patterns",
            reason: format!("template for '{}' must be a string", label),
        })?;
        match label.parse::<Mood>() {
            Ok(mood) => {
                templates.insert(mood, text.to_string());
            }
            Err(_) => {
                tracing::warn!("Ignoring template for unknown mood '{}'", label);
            }
        }
    }
    Ok(templates)
}
