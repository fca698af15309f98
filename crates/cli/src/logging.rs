//! Logger setup for the binary.
//!
//! The core only talks to the `log` facade. This module picks the filter
//! from `--log`, then `RUST_LOG`, then [`DEFAULT_FILTER`], and installs
//! `env_logger` with it.

use env_logger::Builder;

/// Filter used when neither `--log` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Environment variable consulted when `--log` is absent.
pub const FILTER_ENV: &str = "RUST_LOG";

/// Chooses the filter string. Blank values count as unset.
pub fn resolve_filter(flag: Option<&str>, env: Option<&str>) -> String {
    [flag, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|filter| !filter.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Installs `env_logger` with the resolved filter and returns that filter.
///
/// A second call leaves the first logger in place and says so at `warn`.
pub fn init_logging(flag: Option<&str>) -> String {
    let env = std::env::var(FILTER_ENV).ok();
    let filter = resolve_filter(flag, env.as_deref());

    let installed = Builder::new()
        .parse_filters(&filter)
        .format_target(false)
        .try_init();
    match installed {
        Ok(()) => log::debug!("log filter: {filter}"),
        Err(e) => log::warn!("logger error: {e}"),
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let filter = resolve_filter(Some("quad_renderer_core=debug"), Some("warn"));
        assert_eq!(filter, "quad_renderer_core=debug");
    }

    #[test]
    fn environment_applies_without_flag() {
        assert_eq!(resolve_filter(None, Some("trace")), "trace");
    }

    #[test]
    fn blank_values_fall_through_to_default() {
        assert_eq!(resolve_filter(Some("  "), Some("")), DEFAULT_FILTER);
        assert_eq!(resolve_filter(None, None), DEFAULT_FILTER);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(resolve_filter(Some(" error \n"), None), "error");
    }

    #[test]
    fn second_init_keeps_the_first_logger() {
        let first = init_logging(Some("warn"));
        let second = init_logging(Some("trace"));
        assert_eq!(first, "warn");
        assert_eq!(second, "trace");
        assert!(log::max_level() <= log::LevelFilter::Warn);
    }
}
