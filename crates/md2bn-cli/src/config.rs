//! Configuration file support for md2bn CLI
//!
//! Loads settings from `_md2bn.toml` configuration file.

use anyhow::{Context, Result};
use md2bn_core::{Languages, Options, Registry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_md2bn.toml";

/// Schema URL for the configuration file
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/md2bn/md2bn/main/crates/md2bn-cli/schema/md2bn.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Output format configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
    /// Transformer configuration
    #[serde(skip_serializing_if = "TransformConfig::is_empty")]
    pub transform: TransformConfig,
    /// Code block languages known to the highlighter, on top of the built-in set
    #[serde(skip_serializing_if = "LanguagesConfig::is_empty")]
    pub languages: LanguagesConfig,
}

/// Format of the rendered semantic tree
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Semantic tree as JSON
    Json,
    /// Semantic tree serialized to HTML markup
    Html,
}

impl OutputFormat {
    /// Extension appended to the input stem when no output path is given
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "bn.json",
            OutputFormat::Html => "html",
        }
    }
}

/// Output format configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" (semantic tree) or "html" (default: "json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Pretty-print JSON output (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.format.is_none() && self.pretty.is_none()
    }
}

/// Transformer configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct TransformConfig {
    /// Maximum node nesting before a document is rejected (default: 256)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Rewrite language aliases such as "go" to the highlighter's name "golang" (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize_languages: Option<bool>,
}

impl TransformConfig {
    fn is_empty(&self) -> bool {
        self.max_depth.is_none() && self.normalize_languages.is_none()
    }
}

/// Extra highlighter languages
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct LanguagesConfig {
    /// Additional language names the highlighter registers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<String>>,
    /// Additional aliases, mapping an alias to a language name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<BTreeMap<String, String>>,
}

impl LanguagesConfig {
    fn is_empty(&self) -> bool {
        self.extra.is_none() && self.aliases.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_md2bn.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_URL, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        let defaults = Options::default();
        Config {
            output: OutputConfig {
                format: Some(OutputFormat::Json),
                pretty: Some(true),
            },
            transform: TransformConfig {
                max_depth: Some(defaults.max_depth),
                normalize_languages: Some(defaults.normalize_languages),
            },
            // Left for the user; the built-in table covers the common languages
            languages: LanguagesConfig::default(),
        }
    }

    /// Transformer options, falling back to the library defaults
    pub fn transform_options(&self) -> Options {
        let defaults = Options::default();
        Options {
            max_depth: self.transform.max_depth.unwrap_or(defaults.max_depth),
            normalize_languages: self
                .transform
                .normalize_languages
                .unwrap_or(defaults.normalize_languages),
        }
    }

    /// The built-in language table extended with the configured entries
    pub fn languages(&self) -> Languages {
        let mut languages = Languages::highlight_defaults();
        for name in self.languages.extra.iter().flatten() {
            languages.register(name.as_str());
        }
        for (alias, name) in self.languages.aliases.iter().flatten() {
            languages.alias(alias.as_str(), name.as_str());
        }
        languages
    }

    /// The standard handler registry using the configured language table
    pub fn registry(&self) -> Registry {
        Registry::standard().with_languages(self.languages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.output.format.is_none());
        assert!(config.transform.max_depth.is_none());
        assert!(config.languages.extra.is_none());
    }

    #[test]
    fn test_parse_output_section() {
        let config: Config = toml::from_str(
            r#"
            [output]
            format = "html"
            pretty = false
            "#,
        )
        .unwrap();

        assert_eq!(config.output.format, Some(OutputFormat::Html));
        assert_eq!(config.output.pretty, Some(false));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [output]
            format = "markdown"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_transform_options() {
        let config: Config = toml::from_str(
            r#"
            [transform]
            normalize_languages = true
            "#,
        )
        .unwrap();

        let options = config.transform_options();
        assert!(options.normalize_languages);
        assert_eq!(options.max_depth, Options::default().max_depth);

        let config: Config = toml::from_str("[transform]\nmax_depth = 12").unwrap();
        assert_eq!(config.transform_options().max_depth, 12);
    }

    #[test]
    fn test_parse_languages_section() {
        let config: Config = toml::from_str(
            r#"
            [languages]
            extra = ["rust", "Zig"]
            aliases = { rs = "rust" }
            "#,
        )
        .unwrap();

        let languages = config.languages();
        assert!(languages.recognizes("rust"));
        assert!(languages.recognizes("zig"));
        assert_eq!(languages.canonical("rs"), Some("rust"));
        // Built-in entries survive
        assert_eq!(languages.canonical("go"), Some("golang"));

        assert!(config.registry().languages().recognizes("rs"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[output]\nformat = \"html\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Html));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[output\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_serialize_empty_config() {
        let config = Config::default();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema"));
        // Empty config should have minimal content
        assert!(!toml.contains("[output]"));
        assert!(!toml.contains("[languages]"));
    }

    #[test]
    fn test_serialize_sample_config() {
        let config = Config::sample();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("format = \"json\""));
        assert!(toml.contains("max_depth = 256"));
    }

    #[test]
    fn test_json_schema_generation() {
        let schema = Config::json_schema_string().unwrap();
        assert!(schema.contains("\"title\""));
        assert!(schema.contains("OutputConfig"));
        assert!(schema.contains("TransformConfig"));
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::sample();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.output.format, parsed.output.format);
        assert_eq!(config.transform.max_depth, parsed.transform.max_depth);
    }
}
