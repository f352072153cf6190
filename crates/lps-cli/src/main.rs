//! Laptop Price Studio CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use lps_artifact::ArtifactError;
use lps_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use lps_cli::commands::{run_batch, run_inspect, run_options, run_predict};
use lps_cli::logging::{LogConfig, LogFormat, init_logging};
use lps_cli::summary::{print_batch, print_estimate, print_failure, print_rejection};
use lps_cli::types::{EXIT_FAILURE, EXIT_OK, PredictOutcome};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FAILURE);
    }
    let exit_code = match cli.command {
        Command::Predict(args) => match run_predict(&args) {
            Ok(outcome) => {
                let printed = match &outcome {
                    PredictOutcome::Estimated { record, result } => {
                        print_estimate(record, result, args.json)
                    }
                    PredictOutcome::Rejected(rejection) => {
                        print_rejection(rejection);
                        Ok(())
                    }
                    PredictOutcome::Failed(error) => {
                        print_failure(error);
                        Ok(())
                    }
                };
                match printed {
                    Ok(()) => outcome.exit_code(),
                    Err(error) => report_error(&error),
                }
            }
            Err(error) => report_error(&error),
        },
        Command::Batch(args) => match run_batch(&args) {
            Ok(report) => {
                print_batch(&report);
                report.exit_code()
            }
            Err(error) => report_error(&error),
        },
        Command::Options => match run_options() {
            Ok(()) => EXIT_OK,
            Err(error) => report_error(&error),
        },
        Command::Inspect(args) => match run_inspect(&args) {
            Ok(()) => EXIT_OK,
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

/// Prints a fatal error and returns the exit code for it.
fn report_error(error: &anyhow::Error) -> i32 {
    if let Some(artifact) = error.downcast_ref::<ArtifactError>() {
        tracing::error!(error = %artifact, "Model bundle unusable");
        eprintln!("error: {}", artifact.user_message());
        eprintln!("  cause: {artifact}");
    } else {
        eprintln!("error: {error:#}");
    }
    EXIT_FAILURE
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
