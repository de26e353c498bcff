//! Command-line argument definitions for the Tessera CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, output format,
//! configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// What the CLI writes for a diagram.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rendered SVG image
    #[default]
    Svg,
    /// Resolved geometry as JSON
    Json,
}

impl OutputFormat {
    fn default_output(self) -> &'static str {
        match self {
            OutputFormat::Svg => "out.svg",
            OutputFormat::Json => "out.json",
        }
    }
}

/// Command-line arguments for the Tessera diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input block diagram file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file [default: out.svg or out.json]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The output path, falling back to a default named after the format.
    pub fn output_path(&self) -> &str {
        self.output
            .as_deref()
            .unwrap_or_else(|| self.format.default_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["tessera", "diagram.blk"]);
        assert_eq!(args.input, "diagram.blk");
        assert_eq!(args.format, OutputFormat::Svg);
        assert_eq!(args.output_path(), "out.svg");
        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
    }

    #[test]
    fn test_json_format_changes_default_output() {
        let args = Args::parse_from(["tessera", "diagram.blk", "--format", "json"]);
        assert_eq!(args.output_path(), "out.json");

        let args = Args::parse_from(["tessera", "diagram.blk", "-f", "json", "-o", "geo.json"]);
        assert_eq!(args.output_path(), "geo.json");
    }
}
