//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use vault_sweeper::core::config::Config;
use vault_sweeper::core::errors::VswError;
use vault_sweeper::host::commands::CommandRegistry;
use vault_sweeper::host::notifications::{Notice, NotificationLevel, Notifier, RecordingNotifier};
use vault_sweeper::host::plugin::{DELETE_UNTITLED_COMMAND, UntitledCleanupPlugin};
use vault_sweeper::logger::activity::{ActivityLoggerConfig, ActivityLoggerHandle, spawn_logger};
use vault_sweeper::logger::jsonl::JsonlConfig;
use vault_sweeper::scanner::cleaner::{CleanerConfig, VaultCleaner};
use vault_sweeper::vault::fs_store::FsVaultStore;

/// Vault Sweeper — deletes blank "Untitled" notes from a markdown vault.
#[derive(Debug, Parser)]
#[command(
    name = "vsw",
    author,
    version,
    about = "Vault Sweeper - remove blank untitled notes",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Vault root directory (overrides config and VSW_VAULT_ROOT).
    #[arg(long, global = true, value_name = "PATH")]
    vault: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Delete blank untitled notes.
    Run(RunArgs),
    /// List notes that would be deleted, without deleting.
    Preview,
    /// List the commands the cleanup plugin registers.
    Commands,
    /// Show the effective configuration.
    Config,
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct RunArgs {
    /// Report what would be deleted without deleting.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// Some deletions failed.
    #[error("{0}")]
    Partial(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
            Self::Partial(_) => 4,
        }
    }
}

impl From<VswError> for CliError {
    fn from(err: VswError) -> Self {
        match err {
            VswError::InvalidConfig { .. }
            | VswError::MissingConfig { .. }
            | VswError::ConfigParse { .. }
            | VswError::VaultRoot { .. }
            | VswError::UnknownCommand { .. } => Self::User(err.to_string()),
            VswError::Serialization { .. } => Self::Internal(err.to_string()),
            _ => Self::Runtime(err.to_string()),
        }
    }
}

/// Prints notices to the terminal, colored by level.
///
/// Error notices are not printed: the failing command returns the error and
/// `main` reports it once, with the exit code.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NotificationLevel::Info => println!("{}", notice.message.green()),
            NotificationLevel::Warning => println!("{}", notice.message.yellow()),
            NotificationLevel::Error => {}
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Run(args) => run_cleanup(cli, args),
        Command::Preview => run_preview(cli),
        Command::Commands => run_commands(cli),
        Command::Config => run_config(cli),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(vault) = &cli.vault {
        config.vault.root.clone_from(vault);
    }
    Ok(config)
}

fn open_cleaner(
    config: &Config,
    dry_run: bool,
    logger: Option<ActivityLoggerHandle>,
) -> Result<VaultCleaner<FsVaultStore>, CliError> {
    let store = FsVaultStore::from_config(&config.vault)?;
    let mut cleaner_config = CleanerConfig::from(&config.cleaner);
    cleaner_config.dry_run |= dry_run;
    cleaner_config.vault_label = store.root().to_string_lossy().into_owned();
    Ok(VaultCleaner::new(store, cleaner_config, logger))
}

/// Running activity logger, if logging is enabled.
struct LoggerThread {
    handle: ActivityLoggerHandle,
    join: JoinHandle<()>,
}

impl LoggerThread {
    fn start(config: &Config) -> Result<Option<Self>, CliError> {
        if !config.logging.enabled {
            return Ok(None);
        }
        let jsonl = JsonlConfig::from(&config.logging);
        let (handle, join) = spawn_logger(ActivityLoggerConfig::new(jsonl))?;
        Ok(Some(Self { handle, join }))
    }

    fn stop(self) {
        self.handle.shutdown();
        if self.join.join().is_err() {
            eprintln!("[VSW-LOGGER] logger thread panicked; activity log may be incomplete");
        }
        let dropped = self.handle.dropped_events();
        if dropped > 0 {
            eprintln!("[VSW-LOGGER] {dropped} activity events dropped under back-pressure");
        }
    }
}

fn run_cleanup(cli: &Cli, args: &RunArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let mode = output_mode(cli);
    let logger = LoggerThread::start(&config)?;

    let result = invoke_cleanup(&config, args.dry_run, mode, logger.as_ref());

    if let Some(logger) = logger {
        logger.stop();
    }
    result
}

fn invoke_cleanup(
    config: &Config,
    dry_run: bool,
    mode: OutputMode,
    logger: Option<&LoggerThread>,
) -> Result<(), CliError> {
    let cleaner = open_cleaner(config, dry_run, logger.map(|l| l.handle.clone()))?;

    let recorder = Arc::new(RecordingNotifier::new());
    let notifier: Arc<dyn Notifier> = match mode {
        OutputMode::Human => Arc::new(ConsoleNotifier),
        OutputMode::Json => Arc::clone(&recorder) as Arc<dyn Notifier>,
    };

    let plugin = Arc::new(UntitledCleanupPlugin::new(cleaner, notifier));
    let mut registry = CommandRegistry::new();
    Arc::clone(&plugin).on_load(&mut registry)?;
    registry.invoke(DELETE_UNTITLED_COMMAND.id)?;

    let report = plugin
        .last_report()
        .ok_or_else(|| CliError::Internal("cleanup finished without a report".to_string()))?;

    match mode {
        OutputMode::Human => {
            for failure in &report.read_failures {
                eprintln!(
                    "  {} {} ({})",
                    "skipped:".yellow(),
                    failure.path,
                    failure.error_code
                );
            }
            for failure in &report.failed {
                eprintln!("  {} {}: {}", "failed:".red(), failure.path, failure.error);
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "run",
                "notice": recorder.last(),
                "report": serde_json::to_value(&report)?,
            });
            write_json_line(&payload)?;
        }
    }

    if report.failed_count() > 0 {
        return Err(CliError::Partial(format!(
            "{} of {} file(s) could not be deleted",
            report.failed_count(),
            report.candidates
        )));
    }
    Ok(())
}

fn run_preview(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let cleaner = open_cleaner(&config, true, None)?;
    let plan = cleaner.plan()?;

    match output_mode(cli) {
        OutputMode::Human => {
            if plan.candidates.is_empty() {
                println!("No files to delete.");
            } else {
                println!(
                    "{} of {} file(s) would be deleted:",
                    plan.candidates.len(),
                    plan.files_scanned
                );
                for file in &plan.candidates {
                    println!("  {}", file.path().cyan());
                }
            }
            for failure in &plan.read_failures {
                eprintln!(
                    "  {} {} ({})",
                    "unreadable:".yellow(),
                    failure.path,
                    failure.error_code
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "preview",
                "vault": cleaner.config().vault_label,
                "plan": serde_json::to_value(&plan)?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_commands(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let cleaner = open_cleaner(&config, false, None)?;
    let plugin = Arc::new(UntitledCleanupPlugin::new(cleaner, RecordingNotifier::new()));
    let mut registry = CommandRegistry::new();
    Arc::clone(&plugin).on_load(&mut registry)?;

    match output_mode(cli) {
        OutputMode::Human => {
            for spec in registry.list() {
                println!("{}  {}", spec.id.bold(), spec.name);
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "commands",
                "commands": serde_json::to_value(registry.list())?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_config(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let hash = config.stable_hash()?;

    match output_mode(cli) {
        OutputMode::Human => {
            let toml_str = toml::to_string_pretty(&config)
                .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
            println!("# source: {}", config.paths.config_file.display());
            println!("# hash: {hash}");
            println!("{toml_str}");
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "config",
                "config": serde_json::to_value(&config)?,
                "hash": hash,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("VSW_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_before_and_after_subcommand() {
        let before = Cli::try_parse_from([
            "vsw",
            "--config",
            "/tmp/vsw.toml",
            "--vault",
            "/tmp/notes",
            "--json",
            "--no-color",
            "run",
        ]);
        assert!(before.is_ok());

        let after = Cli::try_parse_from(["vsw", "run", "--dry-run", "--json", "--no-color"]);
        assert!(after.is_ok());
    }

    #[test]
    fn parses_every_subcommand() {
        let cases = [
            vec!["vsw", "run"],
            vec!["vsw", "run", "--dry-run"],
            vec!["vsw", "preview"],
            vec!["vsw", "commands"],
            vec!["vsw", "config"],
        ];
        for case in cases {
            assert!(Cli::try_parse_from(case.clone()).is_ok(), "failed: {case:?}");
        }
        assert!(Cli::try_parse_from(["vsw", "sweep"]).is_err());
    }

    #[test]
    fn completions_support_bash_zsh_and_fish() {
        for shell in ["bash", "zsh", "fish"] {
            let parsed = Cli::try_parse_from(["vsw", "completions", shell]);
            assert!(parsed.is_ok(), "failed shell parse for {shell}");
        }
    }

    #[test]
    fn output_mode_resolution_honors_precedence() {
        assert_eq!(
            resolve_output_mode(true, Some("human"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("json"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode(false, Some("human"), false),
            OutputMode::Human
        );
        assert_eq!(resolve_output_mode(false, Some("auto"), true), OutputMode::Human);
        assert_eq!(resolve_output_mode(false, None, false), OutputMode::Json);
        assert_eq!(resolve_output_mode(false, Some("yaml"), true), OutputMode::Human);
    }

    #[test]
    fn exit_codes_follow_contract() {
        assert_eq!(CliError::User(String::new()).exit_code(), 1);
        assert_eq!(CliError::Runtime(String::new()).exit_code(), 2);
        assert_eq!(CliError::Internal(String::new()).exit_code(), 3);
        assert_eq!(CliError::Partial(String::new()).exit_code(), 4);
    }

    #[test]
    fn vault_errors_map_to_user_errors() {
        let err = CliError::from(VswError::VaultRoot {
            path: PathBuf::from("/missing"),
            details: "not found".to_string(),
        });
        assert_eq!(err.exit_code(), 1);
        let err = CliError::from(VswError::ScanInProgress);
        assert_eq!(err.exit_code(), 2);
    }
}
