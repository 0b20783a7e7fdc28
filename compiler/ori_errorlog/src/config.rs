//! Per-context configuration.

/// Environment variable that turns on echoing of every pushed diagnostic.
pub const SHOW_DIAGNOSTICS_ENV: &str = "ORI_SHOW_DIAGNOSTICS";

/// Configuration for a diagnostic context.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Write each pushed message's full text to the sink as it arrives.
    /// Messages are stored either way.
    pub echo_to_sink: bool,
}

impl DiagnosticConfig {
    /// Read configuration from the process environment.
    ///
    /// `ORI_SHOW_DIAGNOSTICS` set to `1`, `true`, `yes` or `on` (any case)
    /// enables echoing.
    pub fn from_env() -> Self {
        let echo_to_sink = std::env::var(SHOW_DIAGNOSTICS_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        DiagnosticConfig { echo_to_sink }
    }

    #[must_use]
    pub fn with_echo(mut self, echo_to_sink: bool) -> Self {
        self.echo_to_sink = echo_to_sink;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_does_not_echo() {
        assert!(!DiagnosticConfig::default().echo_to_sink);
        assert!(DiagnosticConfig::default().with_echo(true).echo_to_sink);
    }

    #[test]
    fn flag_parsing() {
        for on in ["1", "true", "TRUE", " yes ", "On"] {
            assert!(parse_flag(on), "{on:?} should enable echo");
        }
        for off in ["", "0", "false", "no", "maybe"] {
            assert!(!parse_flag(off), "{off:?} should not enable echo");
        }
    }
}
