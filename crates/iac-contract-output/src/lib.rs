//! Report rendering for iac-contract commands.
//!
//! Every command result implements [`OutputFormatter`] and is printed in one
//! of the [`OutputFormat`]s chosen from CLI flags and the `[pretty]` config.

use nu_ansi_term::Color;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

/// When to emit ANSI colors.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colors when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to on/off. `NO_COLOR` always wins; `assume_tty` stands in for
    /// terminal detection (used when pretty output was asked for explicitly).
    pub fn enabled(self, assume_tty: bool) -> bool {
        if no_color() {
            return false;
        }
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => assume_tty || stdout_is_tty(),
        }
    }
}

/// The `[pretty]` config section.
///
/// ```toml
/// [pretty]
/// enabled = true   # default: on when stdout is a terminal
/// colors = "never" # "auto", "always", or "never"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default)]
pub struct PrettyConfig {
    pub enabled: Option<bool>,
    pub colors: Option<ColorMode>,
}

impl PrettyConfig {
    fn color_mode(&self) -> ColorMode {
        self.colors.unwrap_or_default()
    }
}

fn no_color() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// How a report is printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, no colors
    #[default]
    Compact,
    /// Aligned text, optionally colored
    Pretty { colors: bool },
    Json,
    /// One JSON value per line; top-level arrays are split into elements
    JsonLines,
}

impl OutputFormat {
    /// Pick the format from CLI flags, falling back to the config.
    ///
    /// JSON flags beat text flags, `--compact` beats `--pretty`.
    pub fn from_cli(
        json: bool,
        jsonl: bool,
        pretty: bool,
        compact: bool,
        config: &PrettyConfig,
    ) -> Self {
        match (jsonl, json) {
            (true, _) => return OutputFormat::JsonLines,
            (false, true) => return OutputFormat::Json,
            _ => {}
        }
        if compact {
            return OutputFormat::Compact;
        }
        if pretty || config.enabled.unwrap_or_else(stdout_is_tty) {
            OutputFormat::Pretty {
                colors: config.color_mode().enabled(pretty),
            }
        } else {
            OutputFormat::Compact
        }
    }
}

/// A command result that can be printed as text or JSON.
pub trait OutputFormatter: Serialize + schemars::JsonSchema {
    /// Plain text rendering.
    fn format_text(&self) -> String;

    /// Human-oriented rendering; plain text unless overridden.
    fn format_pretty(&self, colors: bool) -> String {
        let _ = colors;
        self.format_text()
    }

    fn render(&self, format: &OutputFormat) -> String {
        match format {
            OutputFormat::Compact => self.format_text(),
            OutputFormat::Pretty { colors } => self.format_pretty(*colors),
            OutputFormat::Json => to_json(self),
            OutputFormat::JsonLines => match serde_json::to_value(self) {
                Ok(serde_json::Value::Array(items)) => items
                    .iter()
                    .map(to_json)
                    .collect::<Vec<_>>()
                    .join("\n"),
                Ok(value) => to_json(&value),
                Err(err) => json_error(&err),
            },
        }
    }

    fn print(&self, format: &OutputFormat) {
        println!("{}", self.render(format));
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| json_error(&err))
}

fn json_error(err: &serde_json::Error) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}

/// Print the JSON schema of a report type (`--output-schema`).
pub fn print_output_schema<T: OutputFormatter>() {
    let schema = schemars::schema_for!(T);
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).unwrap_or_else(|err| json_error(&err))
    );
}

/// `✓` or `✗`, bold green or red when colored.
pub fn status_mark(ok: bool, colors: bool) -> String {
    let (mark, color) = if ok {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };
    paint(mark, colors, |s| color.bold().paint(s).to_string())
}

/// Grey out secondary text when colored.
pub fn dim(text: &str, colors: bool) -> String {
    paint(text, colors, |s| Color::DarkGray.paint(s).to_string())
}

fn paint(text: &str, colors: bool, style: impl Fn(&str) -> String) -> String {
    if colors { style(text) } else { text.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, schemars::JsonSchema)]
    struct Missing {
        framework: &'static str,
        missing: Vec<&'static str>,
    }

    impl OutputFormatter for Missing {
        fn format_text(&self) -> String {
            format!("{}: {}", self.framework, self.missing.join(", "))
        }
    }

    #[derive(Serialize, schemars::JsonSchema)]
    struct Names(Vec<&'static str>);

    impl OutputFormatter for Names {
        fn format_text(&self) -> String {
            self.0.join("\n")
        }
    }

    #[test]
    fn test_json_flags_win() {
        let config = PrettyConfig {
            enabled: Some(true),
            colors: None,
        };
        assert_eq!(
            OutputFormat::from_cli(true, false, true, false, &config),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::from_cli(true, true, false, false, &config),
            OutputFormat::JsonLines
        );
    }

    #[test]
    fn test_compact_beats_pretty_config() {
        let config = PrettyConfig {
            enabled: Some(true),
            colors: Some(ColorMode::Always),
        };
        assert_eq!(
            OutputFormat::from_cli(false, false, false, true, &config),
            OutputFormat::Compact
        );
    }

    #[test]
    fn test_pretty_without_colors() {
        let config = PrettyConfig {
            enabled: Some(true),
            colors: Some(ColorMode::Never),
        };
        assert_eq!(
            OutputFormat::from_cli(false, false, false, false, &config),
            OutputFormat::Pretty { colors: false }
        );
        let disabled = PrettyConfig {
            enabled: Some(false),
            colors: None,
        };
        assert_eq!(
            OutputFormat::from_cli(false, false, false, false, &disabled),
            OutputFormat::Compact
        );
    }

    #[test]
    fn test_render() {
        let report = Missing {
            framework: "bicep",
            missing: vec!["vmHost", "acrNetworkPosture"],
        };
        assert_eq!(
            report.render(&OutputFormat::Compact),
            "bicep: vmHost, acrNetworkPosture"
        );
        assert_eq!(
            report.render(&OutputFormat::Pretty { colors: true }),
            "bicep: vmHost, acrNetworkPosture"
        );
        assert_eq!(
            report.render(&OutputFormat::Json),
            r#"{"framework":"bicep","missing":["vmHost","acrNetworkPosture"]}"#
        );
    }

    #[test]
    fn test_json_lines_split_arrays() {
        let names = Names(vec!["assets", "messaging"]);
        assert_eq!(
            names.render(&OutputFormat::JsonLines),
            "\"assets\"\n\"messaging\""
        );
    }

    #[test]
    fn test_plain_marks() {
        assert_eq!(status_mark(true, false), "✓");
        assert_eq!(status_mark(false, false), "✗");
        assert_eq!(dim("(2 keys)", false), "(2 keys)");
        assert_ne!(status_mark(true, true), "✓");
    }
}
