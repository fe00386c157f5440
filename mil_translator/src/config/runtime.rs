// RUNTIME PREFERENCES (observability only — never token ids or instructions)

use serde::{Deserialize, Serialize};
use std::env;

/// Log level as a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn to_events_log_level(self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }

    fn from_env_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warning" | "warn" => Some(LogLevel::Warning),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to track per-operator usage counts in the metrics
    pub track_operator_patterns: bool,

    /// Whether error log events include position context
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            track_operator_patterns: env::var("MIL_LEXICAL_TRACK_OPERATORS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            include_position_in_errors: env::var("MIL_LEXICAL_INCLUDE_POSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Minimum level an event needs to be emitted
    pub min_log_level: LogLevel,

    /// Emit JSON lines instead of plain text
    pub use_structured_logging: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var("MIL_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevel::from_env_value(&v))
                .unwrap_or(LogLevel::Info),
            use_structured_logging: env::var("MIL_STRUCTURED_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

/// All runtime preferences, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorPreferences {
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl TranslatorPreferences {
    /// Parse preferences from a TOML document. Missing sections and keys
    /// fall back to the environment-derived defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let preferences = TranslatorPreferences::default();
        assert!(preferences.lexical.include_position_in_errors);
        assert!(!preferences.logging.use_structured_logging);
    }

    #[test]
    fn toml_round_trip() {
        let toml_text = r#"
            [lexical]
            track_operator_patterns = true
            include_position_in_errors = false

            [logging]
            min_log_level = "debug"
            use_structured_logging = true
        "#;
        let preferences = TranslatorPreferences::from_toml_str(toml_text).expect("valid toml");
        assert!(preferences.lexical.track_operator_patterns);
        assert!(!preferences.lexical.include_position_in_errors);
        assert_eq!(preferences.logging.min_log_level, LogLevel::Debug);
        assert!(preferences.logging.use_structured_logging);
    }

    #[test]
    fn partial_toml_keeps_defaults_elsewhere() {
        let preferences =
            TranslatorPreferences::from_toml_str("[logging]\nmin_log_level = \"error\"\n")
                .expect("valid toml");
        assert_eq!(preferences.logging.min_log_level, LogLevel::Error);
        assert!(preferences.lexical.include_position_in_errors);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(TranslatorPreferences::from_toml_str("logging = 3").is_err());
    }

    #[test]
    fn log_level_env_values() {
        assert_eq!(LogLevel::from_env_value("WARN"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_env_value("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_env_value("loud"), None);
    }
}
