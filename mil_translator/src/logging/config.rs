//! Runtime configuration access for the logging system.

use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install the logging preferences for this process. May only happen once.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Logging preferences already initialized".to_string())
}

fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Minimum level events must have to be emitted.
pub fn get_min_log_level() -> LogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Whether the configured logger emits JSON lines instead of plain text.
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_uninitialized() {
        // Works whether or not another test initialized the preferences:
        // every configuration yields a valid level.
        let level = get_min_log_level();
        assert!(level <= LogLevel::Debug);
    }
}
