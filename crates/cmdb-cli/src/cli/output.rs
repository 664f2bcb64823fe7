//! Output styling and JSON printing.

use std::env;

use anyhow::Result;
use serde::Serialize;

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Emit JSON instead of text.
    pub json: bool,
    /// Whether to use colors in text output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Build the output config from the `--json` flag and the environment.
    ///
    /// Colors are disabled when `NO_COLOR` is set (any value) or when
    /// `CMDB_COLOR` is "0" or "false", and always in JSON mode.
    pub fn from_env(json: bool) -> Self {
        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = !json
            && env::var_os("NO_COLOR").is_none()
            && env::var("CMDB_COLOR").map_or(true, |v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self { json, use_colors }
    }

    /// Apply the color choice to `colored` for the rest of the process.
    pub fn apply(self) {
        if !self.use_colors {
            colored::control::set_override(false);
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
