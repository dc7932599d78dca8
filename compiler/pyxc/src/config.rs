//! Session configuration.
//!
//! | Variable            | Effect                                      |
//! |---------------------|---------------------------------------------|
//! | `PYXC_ERROR_LIMIT`  | Maximum errors kept per batch (0 = no limit) |
//! | `PYXC_PARALLEL_LEX` | Lex the files of a batch on the rayon pool  |
//! | `NO_COLOR`          | Disable ANSI colours in terminal output     |
//!
//! Log verbosity is controlled by `RUST_LOG` alone (see [`crate::init_tracing`]).

use pyxc_diagnostic::{ColorMode, DiagnosticConfig};
use thiserror::Error;

pub const ERROR_LIMIT_VAR: &str = "PYXC_ERROR_LIMIT";
pub const PARALLEL_LEX_VAR: &str = "PYXC_PARALLEL_LEX";
pub const NO_COLOR_VAR: &str = "NO_COLOR";

/// An environment variable with a value that cannot be used.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: expected a non-negative integer")]
    InvalidNumber { var: &'static str, value: String },

    #[error("invalid value '{value}' for {var}: expected 0, 1, true or false")]
    InvalidFlag { var: &'static str, value: String },
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionConfig {
    pub diagnostics: DiagnosticConfig,
    /// Lex every file of a batch in parallel before parsing them in order.
    pub parallel_lexing: bool,
    pub color: ColorMode,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.diagnostics = self.diagnostics.with_error_limit(limit);
        self
    }

    #[must_use]
    pub fn with_parallel_lexing(mut self, enabled: bool) -> Self {
        self.parallel_lexing = enabled;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// Invalid values are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Same as [`SessionConfig::from_env`], with variables read through `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ERROR_LIMIT_VAR) {
            match parse_limit(ERROR_LIMIT_VAR, &value) {
                Ok(limit) => config = config.with_error_limit(limit),
                Err(err) => tracing::warn!(%err, "ignoring invalid configuration"),
            }
        }
        if let Some(value) = lookup(PARALLEL_LEX_VAR) {
            match parse_flag(PARALLEL_LEX_VAR, &value) {
                Ok(enabled) => config.parallel_lexing = enabled,
                Err(err) => tracing::warn!(%err, "ignoring invalid configuration"),
            }
        }
        // Any non-empty NO_COLOR disables colour (https://no-color.org).
        if lookup(NO_COLOR_VAR).is_some_and(|v| !v.is_empty()) {
            config.color = ColorMode::Never;
        }

        tracing::debug!(?config, "session configuration");
        config
    }
}

fn parse_limit(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> SessionConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SessionConfig::from_vars(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        assert_eq!(config_from(&[]), SessionConfig::default());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config_from(&[
            (ERROR_LIMIT_VAR, "25"),
            (PARALLEL_LEX_VAR, "true"),
            (NO_COLOR_VAR, "1"),
        ]);
        assert_eq!(config.diagnostics.error_limit, 25);
        assert!(config.parallel_lexing);
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = config_from(&[(ERROR_LIMIT_VAR, "lots"), (PARALLEL_LEX_VAR, "maybe")]);
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_empty_no_color_is_ignored() {
        assert_eq!(config_from(&[(NO_COLOR_VAR, "")]).color, ColorMode::Auto);
    }

    #[test]
    fn test_error_messages() {
        let err = parse_limit(ERROR_LIMIT_VAR, "-3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value '-3' for PYXC_ERROR_LIMIT: expected a non-negative integer"
        );
        assert_eq!(parse_flag(PARALLEL_LEX_VAR, " On "), Ok(true));
    }
}
