//! Console configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `SNIPPET_CONSOLE_*` environment variables.

use crate::error::{ConsoleError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides, e.g. `SNIPPET_CONSOLE_MAX_INPUT_LENGTH`
pub const ENV_PREFIX: &str = "SNIPPET_CONSOLE";

/// Default document ceiling in characters
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 16_000;

/// Entry in the help/reference catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpEntry {
    /// Title shown in the catalog
    pub title: String,
    /// Text inserted verbatim at the caret
    pub snippet: String,
}

impl HelpEntry {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum document length in characters
    pub max_input_length: usize,

    /// Initial state of the auto-indent toggle
    pub auto_indent_enabled: bool,

    /// Initial state of the suggestions toggle
    pub suggestions_enabled: bool,

    /// Initial state of the Ctrl+R submit toggle
    pub compile_on_ctrl_r: bool,

    /// Maximum number of suggestions offered at once
    pub max_suggestions: usize,

    /// Height of one text row, in scroll-offset units
    pub line_height: f32,

    /// Run refreshes on `tick()` rather than after every event
    pub defer_refresh: bool,

    /// Help/reference catalog
    pub help_snippets: Vec<HelpEntry>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            auto_indent_enabled: true,
            suggestions_enabled: true,
            compile_on_ctrl_r: true,
            max_suggestions: 10,
            line_height: 16.0,
            defer_refresh: true,
            help_snippets: default_help_snippets(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from an optional TOML file plus environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading console config from {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: ConsoleConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the console cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_input_length == 0 {
            return Err(ConsoleError::InvalidConfig(
                "max_input_length must be greater than zero".to_string(),
            ));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(ConsoleError::InvalidConfig(format!(
                "line_height must be a positive number, got {}",
                self.line_height
            )));
        }
        if self.max_suggestions == 0 {
            return Err(ConsoleError::InvalidConfig(
                "max_suggestions must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn default_help_snippets() -> Vec<HelpEntry> {
    vec![
        HelpEntry::new(
            "Using directives",
            "using System;\nusing System.Collections.Generic;\nusing System.Linq;\n",
        ),
        HelpEntry::new(
            "Print a value",
            "Console.WriteLine(\"value: \" + value);\n",
        ),
        HelpEntry::new(
            "Loop over a list",
            "var items = new List<int> { 1, 2, 3 };\nforeach (var item in items)\n{\n    Console.WriteLine(item);\n}\n",
        ),
        HelpEntry::new(
            "Define a class",
            "public class Example\n{\n    public int Value { get; set; }\n\n    public override string ToString() => $\"Example({Value})\";\n}\n",
        ),
        HelpEntry::new(
            "Iterator method",
            "IEnumerable<int> Countdown(int from)\n{\n    for (int i = from; i > 0; i--)\n        yield return i;\n}\n",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.compile_on_ctrl_r);
        assert!(!config.help_snippets.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_from_file_keeps_defaults_for_missing_keys() {
        let file = toml_file("max_input_length = 256\nsuggestions_enabled = false");

        let config = ConsoleConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.max_input_length, 256);
        assert!(!config.suggestions_enabled);
        assert_eq!(config.max_suggestions, 10);
        assert_eq!(config.help_snippets, default_help_snippets());
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        std::env::set_var("SNIPPET_CONSOLE_MAX_SUGGESTIONS", "3");
        let config = ConsoleConfig::load(None);
        std::env::remove_var("SNIPPET_CONSOLE_MAX_SUGGESTIONS");

        assert_eq!(config.unwrap().max_suggestions, 3);
    }

    #[test]
    #[serial]
    fn test_invalid_values_rejected() {
        let file = toml_file("line_height = 0.0");

        let err = ConsoleConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidConfig(_)));
    }

    #[test]
    #[serial]
    fn test_missing_file_is_an_error() {
        let err = ConsoleConfig::load(Some(Path::new("/nonexistent/console.toml"))).unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ConsoleConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: ConsoleConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
