//! md2puml configuration loading
//!
//! Loads configuration from `~/.config/md2puml/config.toml` (or
//! `MD2PUML_CONFIG` env). Every key is optional:
//!
//! ```toml
//! model = "gpt-4o-mini"
//! temperature = 0.3
//! base_url = "https://api.openai.com/v1"
//! api_key_env = "OPENAI_API_KEY"
//! sections = ["Data Model & Persistence", "Primary Flows"]
//! output = "diagram.puml"
//! ```

use crate::api_client::{
    DEFAULT_API_KEY_ENV, DEFAULT_MODEL, DEFAULT_TEMPERATURE, OPENAI_API_BASE, OpenAiConfig,
};
use crate::error::{Md2PumlError, Result};
use crate::section::DEFAULT_SECTIONS;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Md2PumlConfig {
    /// Chat model used for generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0-2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// API root, e.g. `https://api.openai.com/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Level-2 headings to extract, in order
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,

    /// Output path used when `-o` is not given
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_base_url() -> String {
    OPENAI_API_BASE.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_sections() -> Vec<String> {
    DEFAULT_SECTIONS.iter().map(|s| (*s).to_string()).collect()
}

fn default_output() -> PathBuf {
    PathBuf::from("diagram.puml")
}

impl Default for Md2PumlConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            sections: default_sections(),
            output: default_output(),
        }
    }
}

impl Md2PumlConfig {
    /// Environment variable for config path override
    pub const ENV_CONFIG_PATH: &'static str = "MD2PUML_CONFIG";

    /// Environment variable overriding `base_url`
    pub const ENV_BASE_URL: &'static str = "OPENAI_BASE_URL";

    /// Environment variable overriding `model`
    pub const ENV_MODEL: &'static str = "MD2PUML_MODEL";

    /// Default config filename
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "config.toml";

    /// Load configuration and apply environment overrides
    ///
    /// Resolution order for the file:
    /// 1. `explicit` (from `--config`); must exist
    /// 2. `MD2PUML_CONFIG` environment variable
    /// 3. `~/.config/md2puml/config.toml`
    ///
    /// If an implicit config file doesn't exist, defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let path = Self::resolve_config_path();
                if path.exists() {
                    Self::load_from_path(&path)?
                } else {
                    tracing::debug!(
                        path = %path.display(),
                        "md2puml config not found, using defaults"
                    );
                    Self::default()
                }
            }
        };

        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Md2PumlError::config_with_source(
                format!("failed to read config at {}", path.display()),
                e,
            )
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: Md2PumlConfig = toml::from_str(contents)
            .map_err(|e| Md2PumlError::config_with_source("failed to parse config", e))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = non_empty(Self::ENV_BASE_URL) {
            tracing::debug!(%base_url, "base_url overridden from environment");
            self.base_url = base_url;
        }
        if let Some(model) = non_empty(Self::ENV_MODEL) {
            tracing::debug!(%model, "model overridden from environment");
            self.model = model;
        }
    }

    /// Resolve the configuration file path
    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("md2puml")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Md2PumlError::config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.sections.is_empty() {
            return Err(Md2PumlError::config("sections must not be empty"));
        }

        if self.sections.iter().any(|s| s.trim().is_empty()) {
            return Err(Md2PumlError::config("section titles must not be blank"));
        }

        if let Some((i, dup)) = self
            .sections
            .iter()
            .enumerate()
            .find(|(i, title)| self.sections[..*i].contains(title))
        {
            return Err(Md2PumlError::config(format!(
                "section {dup:?} is listed more than once (entry {})",
                i + 1
            )));
        }

        if self.model.trim().is_empty() {
            return Err(Md2PumlError::config("model must not be empty"));
        }

        if self.api_key_env.trim().is_empty() {
            return Err(Md2PumlError::config("api_key_env must not be empty"));
        }

        Ok(())
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Build the client configuration, reading the key from the environment
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            base_url: self.base_url.clone(),
            api_key: self.api_key(),
            api_key_env: self.api_key_env.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let cfg = Md2PumlConfig::default();
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.temperature, 0.3);
        assert_eq!(cfg.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.api_key_env, "OPENAI_API_KEY");
        assert_eq!(
            cfg.sections,
            vec!["Data Model & Persistence".to_string(), "Primary Flows".to_string()]
        );
        assert_eq!(cfg.output, PathBuf::from("diagram.puml"));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let cfg = Md2PumlConfig::parse("").expect("should parse");
        assert_eq!(cfg, Md2PumlConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            model = "gpt-4o"
            temperature = 0.0
            base_url = "http://localhost:8080/v1"
            api_key_env = "MY_KEY"
            sections = ["Architecture"]
            output = "docs/arch.puml"
        "#;

        let cfg = Md2PumlConfig::parse(toml).expect("should parse");
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.temperature, 0.0);
        assert_eq!(cfg.base_url, "http://localhost:8080/v1");
        assert_eq!(cfg.api_key_env, "MY_KEY");
        assert_eq!(cfg.sections, vec!["Architecture".to_string()]);
        assert_eq!(cfg.output, PathBuf::from("docs/arch.puml"));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = Md2PumlConfig::parse("modle = \"gpt-4o\"").expect_err("should fail");
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_validate_temperature_range() {
        let err = Md2PumlConfig::parse("temperature = 3.5").expect_err("should fail");
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_sections() {
        assert!(Md2PumlConfig::parse("sections = []").is_err());
        assert!(Md2PumlConfig::parse("sections = [\"  \"]").is_err());
    }

    #[test]
    fn test_validate_rejects_repeated_sections() {
        let err = Md2PumlConfig::parse("sections = [\"Primary Flows\", \"Other\", \"Primary Flows\"]")
            .expect_err("should fail");
        assert!(err.to_string().contains("\"Primary Flows\" is listed more than once"));

        assert!(Md2PumlConfig::parse("sections = [\"Primary Flows\", \"Other\"]").is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_BASE_URL", "http://127.0.0.1:9999/v1"),
            ("MD2PUML_MODEL", "gpt-4.1-mini"),
        ]);
        let mut cfg = Md2PumlConfig::default();
        cfg.apply_env(|key| env.get(key).map(|v| (*v).to_string()));
        assert_eq!(cfg.base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(cfg.model, "gpt-4.1-mini");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut cfg = Md2PumlConfig::default();
        cfg.apply_env(|_| Some(String::new()));
        assert_eq!(cfg, Md2PumlConfig::default());
    }

    #[test]
    fn test_load_from_missing_explicit_path_fails() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let err = Md2PumlConfig::load(Some(&dir.path().join("nope.toml"))).expect_err("should fail");
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"gpt-4o\"\n").expect("write");
        let cfg = Md2PumlConfig::load_from_path(&path).expect("should load");
        assert_eq!(cfg.model, "gpt-4o");
    }

    #[test]
    fn test_openai_config_carries_settings() {
        let cfg = Md2PumlConfig {
            model: "gpt-4o".to_string(),
            api_key_env: "MD2PUML_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let client_cfg = cfg.openai_config();
        assert_eq!(client_cfg.model, "gpt-4o");
        assert_eq!(client_cfg.api_key, None);
        assert_eq!(client_cfg.api_key_env, "MD2PUML_TEST_KEY_THAT_IS_NEVER_SET");
    }
}
