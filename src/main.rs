//! Photo Date Sorter - moves photos into folders named after their capture date
//!
//! Thin command-line shell around the sorting engine: it collects the
//! input/output directories and the date format, installs the log sink,
//! and reports the outcome.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use photo_date_sorter::i18n::Strings;
use photo_date_sorter::{Cli, FileOutcome, RunSummary, SortRequest, Sorter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored terminal output for the CLI

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_title(title: &str) {
        let _ = stdout().execute(Print(style("✓ ").with(CliTheme::SUCCESS).bold()));
        let _ = stdout().execute(Print(format!("{}\n", title.bold())));
    }

    pub fn print_error(msg: &str) {
        let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_key_value(key: &str, value: &str, value_color: Option<Color>) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = match value_color {
            Some(color) => style(value).with(color),
            None => style(value).bold(),
        };
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: usize, color: Color) {
        print_key_value(key, &value.to_string(), Some(color));
    }

    pub fn print_result(status_icon: &str, status_color: Color, source: &str, dest_or_msg: &str) {
        let icon_styled = style(status_icon).with(status_color).bold();
        let source_styled = style(source).italic();
        let msg_styled = style(dest_or_msg).with(CliTheme::HINT);

        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(icon_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(source_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(msg_styled));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(label: &str, path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  📁 ").with(CliTheme::ACCENT)));
        let _ = stdout().execute(Print(style(format!("{}: ", label)).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            cli_output::print_error(&format!("{} {:#}", Strings::sorting_failed(), e));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Get the executable directory for Config and Log directories
    let exe_dir = get_executable_dir()?;

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| get_log_path(&exe_dir, &cli));

    let _guard = setup_logging(&cli, &log_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Photo Date Sorter starting"
    );
    info!(log_file = %log_path.display(), "Log file location");

    let request = load_request(&cli, &exe_dir)?;

    if let Some(ref config_path) = cli.init_config {
        if request.has_paths() {
            request.save_to_file(config_path)?;
        } else {
            SortRequest::write_sample_config(config_path)?;
        }
        info!(config_file = %config_path.display(), "Configuration file written");
        cli_output::print_hint(&format!(
            "{} {}",
            Strings::config_written(),
            config_path.display()
        ));
        return Ok(ExitCode::SUCCESS);
    }

    if !request.has_paths() {
        error!("Input or output directory not specified");
        cli_output::print_error(Strings::input_output_required());
        return Ok(ExitCode::FAILURE);
    }

    if cli.verbose {
        info!(?request, "Sort request");
    }

    let result = Sorter::new(request).and_then(|sorter| sorter.run());

    match result {
        Ok(summary) => {
            print_summary(&summary, cli.verbose);
            cli_output::print_log_path(Strings::log_file(), &log_path.display().to_string());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Sorting aborted");
            cli_output::print_error(&format!("{} {}", Strings::sorting_failed(), e));
            cli_output::print_log_path(Strings::log_file(), &log_path.display().to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the end-of-run report
fn print_summary(summary: &RunSummary, verbose: bool) {
    use cli_output::*;

    print_separator();
    print_title(Strings::sorting_complete());
    print_separator();

    print_blank();
    print_stat(Strings::stat_total(), summary.total(), CliTheme::ACCENT);
    print_stat(Strings::stat_dated(), summary.dated, CliTheme::SUCCESS);
    print_stat(Strings::stat_no_date(), summary.no_date, CliTheme::WARNING);
    print_stat(Strings::stat_skipped(), summary.skipped, CliTheme::HINT);
    print_stat(Strings::stat_failed(), summary.failed, CliTheme::ERROR);
    print_blank();

    if verbose && !summary.outcomes.is_empty() {
        print_separator();
        print_hint(Strings::detailed_results());
        print_blank();

        for outcome in &summary.outcomes {
            match outcome {
                FileOutcome::Moved {
                    source,
                    destination,
                    ..
                } => print_result(
                    "✓",
                    CliTheme::SUCCESS,
                    &source.display().to_string(),
                    &format!("→ {}", destination.display()),
                ),
                FileOutcome::AlreadySorted { source } => print_result(
                    "=",
                    CliTheme::HINT,
                    &source.display().to_string(),
                    Strings::stat_skipped(),
                ),
                FileOutcome::Failed { source, error } => print_result(
                    "✗",
                    CliTheme::ERROR,
                    &source.display().to_string(),
                    error,
                ),
            }
        }
    }

    if summary.failed > 0 {
        print_separator();
        print_error(&Strings::failed_files(summary.failed));
        print_blank();
        for outcome in summary.failures() {
            if let FileOutcome::Failed { source, error } = outcome {
                print_key_value(&source.display().to_string(), error, Some(CliTheme::ERROR));
            }
        }
    }
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Determine the log file path based on config file or timestamp
fn get_log_path(exe_dir: &Path, cli: &Cli) -> PathBuf {
    let log_dir = exe_dir.join("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    if let Some(config_name) = cli.config_name() {
        let config_log_dir = log_dir.join(&config_name);
        let log_filename = format!("{}_{}.log", config_name, timestamp);
        config_log_dir.join(log_filename)
    } else {
        let log_filename = format!("SortRun_{}.log", timestamp);
        log_dir.join(log_filename)
    }
}

/// Resolve config path - supports shorthand syntax
///
/// `holiday` may refer to `holiday.toml` or `<exe dir>/Config/holiday.toml`.
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    if with_extension.exists() {
        return with_extension;
    }

    let config_dir = exe_dir.join("Config");
    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());

    let mut in_config_dir = config_dir.join(filename);
    if in_config_dir.extension().is_none() {
        in_config_dir = in_config_dir.with_extension("toml");
    }

    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Build the sort request from a config file and/or CLI arguments
fn load_request(cli: &Cli, exe_dir: &Path) -> Result<SortRequest> {
    let request = if let Some(ref config_path) = cli.config {
        let resolved_path = resolve_config_path(exe_dir, config_path);
        info!(config_file = %resolved_path.display(), "Loading configuration from file");
        let file_request = SortRequest::load_from_file(&resolved_path)?;
        cli.merge_with_request(file_request)
    } else {
        cli.to_request()
    };

    Ok(request)
}

/// Setup logging (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<WorkerGuard> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(guard)
}
