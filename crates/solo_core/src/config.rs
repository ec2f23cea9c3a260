use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default character file, relative to the working directory.
pub const DEFAULT_CHARACTER_PATH: &str = "damian_knight_dusk.yaml";

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SoloConfig {
    pub server: ServerConfig,
    pub character: CharacterConfig,
}

impl SoloConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: SoloConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CHAR_YAML_PATH") {
            self.character.path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = std::env::var("PORT") {
            match v.parse() {
                Ok(n) => self.server.port = n,
                Err(_) => tracing::warn!("Ignoring invalid PORT value '{}'", v),
            }
        }
    }

    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// YAML file with `basic_info` and `speech_patterns`.
    pub path: PathBuf,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CHARACTER_PATH),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = SoloConfig::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.character.path, PathBuf::from(DEFAULT_CHARACTER_PATH));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
[server]
port = 9000
"#;
        let cfg: SoloConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.server.port, 9000);
        // Defaults for unspecified fields
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.character.path, PathBuf::from(DEFAULT_CHARACTER_PATH));
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[server]
host = "127.0.0.1"
port = 3000

[character]
path = "characters/lyra.yaml"
"#;
        let cfg: SoloConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
        assert_eq!(cfg.character.path, PathBuf::from("characters/lyra.yaml"));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[server\nport = ").unwrap();
        assert!(SoloConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        // Part 1: env overrides
        std::env::set_var("CHAR_YAML_PATH", "other.yaml");
        std::env::set_var("PORT", "8123");
        std::env::set_var("HOST", "127.0.0.1");

        let mut cfg = SoloConfig::default();
        cfg.apply_env_overrides();

        assert_eq!(cfg.character.path, PathBuf::from("other.yaml"));
        assert_eq!(cfg.server.port, 8123);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8123");

        // Invalid port keeps the previous value
        std::env::set_var("PORT", "not-a-port");
        cfg.apply_env_overrides();
        assert_eq!(cfg.server.port, 8123);

        // Clean up env vars before testing defaults
        std::env::remove_var("CHAR_YAML_PATH");
        std::env::remove_var("PORT");
        std::env::remove_var("HOST");

        // Part 2: nonexistent path returns defaults (no env interference)
        let cfg = SoloConfig::load_or_default("/nonexistent/solo.toml");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.character.path, PathBuf::from(DEFAULT_CHARACTER_PATH));
    }
}
