//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lps",
    version,
    about = "Laptop Price Studio - estimate laptop prices from hardware specifications",
    long_about = "Estimate laptop prices with a fitted model bundle.\n\n\
                  A bundle is a JSON file holding the fitted pipeline under `model`\n\
                  and the price scaling under `scaler`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate the price of one configuration.
    Predict(PredictArgs),

    /// Estimate a price for every row of a CSV file.
    Batch(BatchArgs),

    /// List the allowed values of every field.
    Options,

    /// Show what a model bundle contains.
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct BundleArgs {
    /// Model bundle to load.
    #[arg(
        long = "bundle",
        value_name = "PATH",
        default_value = "artifacts/laptop_price_bundle.json"
    )]
    pub bundle: PathBuf,

    /// Refuse the bundle unless its SHA-256 matches this hex digest.
    #[arg(long = "expect-sha256", value_name = "HEX")]
    pub expect_sha256: Option<String>,
}

#[derive(Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,

    #[command(flatten)]
    pub record: RecordArgs,

    /// Print the estimate as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// A record given either as a JSON file or field by field.
#[derive(Args)]
pub struct RecordArgs {
    /// JSON object keyed by column name (Brand, Processor, ...).
    #[arg(
        long = "record",
        value_name = "FILE",
        conflicts_with_all = [
            "brand", "processor", "generation", "series", "ram_gb", "storage_gb",
            "screen_size", "os", "gpu_brand", "gpu_model", "gpu_memory_gb",
        ]
    )]
    pub record: Option<PathBuf>,

    #[arg(long, required_unless_present = "record")]
    pub brand: Option<String>,

    #[arg(long, required_unless_present = "record")]
    pub processor: Option<String>,

    /// CPU generation.
    #[arg(long, required_unless_present = "record")]
    pub generation: Option<i64>,

    /// CPU series letter code (H, U, P, ...).
    #[arg(long, required_unless_present = "record")]
    pub series: Option<String>,

    #[arg(long = "ram-gb", required_unless_present = "record")]
    pub ram_gb: Option<i64>,

    #[arg(long = "storage-gb", required_unless_present = "record")]
    pub storage_gb: Option<i64>,

    /// Screen diagonal in inches.
    #[arg(long = "screen-size", required_unless_present = "record")]
    pub screen_size: Option<f64>,

    #[arg(long, required_unless_present = "record")]
    pub os: Option<String>,

    #[arg(long = "gpu-brand", required_unless_present = "record")]
    pub gpu_brand: Option<String>,

    #[arg(long = "gpu-model", required_unless_present = "record")]
    pub gpu_model: Option<String>,

    #[arg(long = "gpu-memory-gb", required_unless_present = "record")]
    pub gpu_memory_gb: Option<i64>,
}

#[derive(Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,

    /// CSV file with one configuration per row and a header naming the columns.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asus_flags() -> Vec<&'static str> {
        vec![
            "lps", "predict", "--brand", "ASUS", "--processor", "Intel i7", "--generation", "12",
            "--series", "H", "--ram-gb", "16", "--storage-gb", "512", "--screen-size", "15.6",
            "--os", "Windows 11", "--gpu-brand", "NVIDIA", "--gpu-model", "RTX 3060",
            "--gpu-memory-gb", "6",
        ]
    }

    #[test]
    fn field_flags_parse() {
        let cli = Cli::try_parse_from(asus_flags()).expect("parse");
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.record.brand.as_deref(), Some("ASUS"));
        assert_eq!(args.record.screen_size, Some(15.6));
        assert_eq!(
            args.bundle.bundle,
            PathBuf::from("artifacts/laptop_price_bundle.json")
        );
    }

    #[test]
    fn record_file_replaces_field_flags() {
        let cli = Cli::try_parse_from(["lps", "predict", "--record", "asus.json", "--json"])
            .expect("parse");
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert!(args.json);
        assert_eq!(args.record.record, Some(PathBuf::from("asus.json")));
    }

    #[test]
    fn missing_field_flag_is_an_error() {
        let mut flags = asus_flags();
        flags.truncate(flags.len() - 2);
        assert!(Cli::try_parse_from(flags).is_err());
    }

    #[test]
    fn record_file_conflicts_with_field_flags() {
        let mut flags = asus_flags();
        flags.extend(["--record", "asus.json"]);
        assert!(Cli::try_parse_from(flags).is_err());
    }
}
