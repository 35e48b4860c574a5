use super::{types::Config, ConfigError};

/// Largest accepted default list size.
pub const MAX_LIST_LIMIT: u32 = 500;

/// Longest accepted recent window (ten years).
pub const MAX_RECENT_WINDOW_HOURS: i64 = 24 * 365 * 10;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Recent window is between 1 hour and ten years
/// - Default list sizes are within 1..=500
/// - Caption mode is a known code
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Catalog validation
    if !(1..=MAX_RECENT_WINDOW_HOURS).contains(&config.catalog.recent_window_hours) {
        return Err(ConfigError::ValidationError(format!(
            "catalog.recent_window_hours must be between 1 and {}, got {}",
            MAX_RECENT_WINDOW_HOURS, config.catalog.recent_window_hours
        )));
    }

    for (name, value) in [
        ("catalog.latest_limit", config.catalog.latest_limit),
        ("catalog.trending_limit", config.catalog.trending_limit),
    ] {
        if !(1..=MAX_LIST_LIMIT).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between 1 and {}, got {}",
                name, MAX_LIST_LIMIT, value
            )));
        }
    }

    // Caption validation
    if crate::caption::CaptionMode::try_from(config.caption.default_mode).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "caption.default_mode must be 1, 2 or 3, got {}",
            config.caption.default_mode
        )));
    }

    Ok(())
}
