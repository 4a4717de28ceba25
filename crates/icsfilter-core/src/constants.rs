/// File name of the filter rule document.
pub const RULES_FILE_NAME: &str = "iCalendarFilters.json";

/// Directory (below the user config dir) searched first for the rule document.
pub const RULES_DIR: &str = "webcal-client";

/// Directory (below the user config dir) used when [`RULES_DIR`] holds no rule document.
pub const RULES_FALLBACK_DIR: &str = const_str::concat!("com.jolla", "/", "calendar");

/// Shortest text that can still be a rule document: `{"calendars":[]}`.
pub const RULES_MIN_LEN: usize = r#"{"calendars":[]}"#.len();

/// Prefix for environment variables read by [`crate::config::Settings::load`].
pub const ENV_PREFIX: &str = "ICSFILTER";

/// Optional TOML configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = const_str::concat!("icsfilter", ".toml");

/// Whether a calendar rule adds the absolute reminder to timed components too,
/// when the rule document does not say.
pub const DEFAULT_BOTH_REMINDERS: bool = false;

/// Whether failed matches subtract from the quorum sum instead of being ignored.
pub const DEFAULT_SUM_NEGATIVE_MATCHES: bool = false;
