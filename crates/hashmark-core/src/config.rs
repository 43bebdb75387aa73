//! Editor timing and class-name configuration.

use std::time::Duration;

/// Quiet window for debounced input handlers.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;
/// Cursor blink half-period.
pub const BLINK_INTERVAL_MS: u64 = 500;
/// Demo typing speed.
pub const MS_PER_CHARACTER: u64 = 20;
/// How long the demo lingers on a line before converting it.
pub const PAUSE_MS: u64 = 1500;

/// Element name of a generic container the host may insert on Enter.
pub const STRAY_CONTAINER_TAG: &str = "div";
/// Element name of the trailing-whitespace placeholder.
pub const LINE_BREAK_TAG: &str = "br";

/// Runtime configuration injected into the editor components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    pub debounce_delay: Duration,
    pub blink_interval: Duration,
    pub ms_per_character: Duration,
    pub pause_duration: Duration,
    /// Class marking hidden elements whose text the demo types out.
    pub demo_class: &'static str,
    /// Class on the fake cursor element.
    pub cursor_class: &'static str,
    /// Class on the element the fake cursor trails.
    pub before_cursor_class: &'static str,
    /// Class toggled on every blink.
    pub visible_class: &'static str,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            blink_interval: Duration::from_millis(BLINK_INTERVAL_MS),
            ms_per_character: Duration::from_millis(MS_PER_CHARACTER),
            pause_duration: Duration::from_millis(PAUSE_MS),
            demo_class: "demo-text",
            cursor_class: "cursor",
            before_cursor_class: "before-cursor",
            visible_class: "visible",
        }
    }
}

/// Clamp a duration to whole milliseconds for timer APIs that take `u32`.
pub fn as_millis_u32(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.debounce_delay, Duration::from_millis(250));
        assert_eq!(config.blink_interval, Duration::from_millis(500));
        assert_eq!(config.ms_per_character, Duration::from_millis(20));
        assert_eq!(config.pause_duration, Duration::from_millis(1500));
    }

    #[test]
    fn test_as_millis_saturates() {
        assert_eq!(as_millis_u32(Duration::from_millis(250)), 250);
        assert_eq!(as_millis_u32(Duration::from_secs(u64::MAX)), u32::MAX);
    }
}
