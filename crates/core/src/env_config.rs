//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable, falling back to `default`.
///
/// Unset variables fall back silently. Set but unparsable values log a warning
/// and fall back, so a typo in `LIFTLOG_POLL_INTERVAL_MS` never aborts startup.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_with_default(var, std::env::var(var).ok().as_deref(), default)
}

/// Parse an already-read value for `var`, with the same fallback rules as
/// [`env_parse_with_default`].
pub fn parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    let Some(value) = raw else {
        return default;
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!(
                var,
                value = %value,
                default = %default,
                "invalid env var value, using default"
            );
            default
        },
    }
}
