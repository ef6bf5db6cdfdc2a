// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, LogLevel, TranslationProvider};
use crate::app_controller::Controller;
use crate::translation::CancellationToken;

mod app_config;
mod app_controller;
mod chunking;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    OpenAI,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate documents using AI providers (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Segment documents and report token estimates without translating
    Estimate(EstimateArgs),

    /// Check that the configured translation backend answers
    TestConnection(ConnectionArgs),

    /// Generate shell completions for doctrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file, or output directory for directory input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code or name (e.g. 'en', 'fra', 'Chinese')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code or name (e.g. 'en', 'fra', 'Chinese')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct EstimateArgs {
    /// Input document or directory to inspect
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ConnectionArgs {
    /// Translation provider to probe instead of the configured one
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// doctrans - document translation with AI
///
/// Splits documents into model-sized segments, translates them through a
/// configurable provider and reassembles the result.
#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered document translation tool")]
#[command(long_about = "doctrans splits documents into model-sized segments, translates them \
through a configurable AI provider and reassembles the result.

EXAMPLES:
    doctrans document.md                        # Translate using default config
    doctrans -s en -t fr document.md            # Translate from English to French
    doctrans -p openai -m gpt-4 document.md     # Use specific provider and model
    doctrans docs/ -o translated/               # Translate every document in a directory
    doctrans estimate document.md               # Report segments and token estimates
    doctrans test-connection                    # Probe the configured backend
    doctrans completions bash > doctrans.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED PROVIDERS:
    ollama - Local Ollama server (default: llama2)
    openai - OpenAI API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file, or output directory for directory input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code or name (e.g. 'en', 'fra', 'Chinese')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code or name (e.g. 'en', 'fra', 'Chinese')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter_of(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Load the configuration, creating a default file when none exists.
/// The CLI log level wins over the configured one.
fn load_or_create_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    if let Some(cmd_log_level) = cli_log_level {
        log::set_max_level(level_filter_of(cmd_log_level.clone().into()));
    }

    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    if let Some(log_level) = cli_log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter_of(config.log_level));
    }

    Ok(config)
}

/// Spawn the interrupt handler. The first Ctrl-C requests a cooperative
/// stop through the token; a second one exits immediately.
fn spawn_interrupt_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current segment");
            signal_token.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Second interrupt, exiting immediately");
                std::process::exit(130);
            }
        }
    });

    cancel
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        Some(Commands::Estimate(args)) => run_estimate(args),
        Some(Commands::TestConnection(args)) => run_test_connection(args).await,
        None => {
            // Default behavior - use top-level args for convenience
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output: cli.output,
                provider: cli.provider,
                model: cli.model,
                source_language: cli.source_language,
                target_language: cli.target_language,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path, options.log_level.as_ref())?;

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.model = model.clone();
        }
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    let controller = Controller::with_config(config)?;
    let cancel = spawn_interrupt_handler();

    controller.run(options.input_path, options.output, &cancel).await
}

fn run_estimate(options: EstimateArgs) -> Result<()> {
    let config = load_or_create_config(&options.config_path, options.log_level.as_ref())?;
    let controller = Controller::with_config(config)?;
    controller.estimate(options.input_path)
}

async fn run_test_connection(options: ConnectionArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path, options.log_level.as_ref())?;

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    let controller = Controller::with_config(config)?;
    controller.test_connection().await
}
