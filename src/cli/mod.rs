//! Command-line interface for konto-console.
//!
//! Provides scriptable access to the account console:
//! - `show`: Render a section of a snapshot file
//! - `send`: Send a command and show the fresh snapshot
//! - `export`: Download registry sheets
//! - `config`: Inspect and initialize configuration
//! - `completions`: Generate shell completions

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::dispatch::AuthToken;
use crate::error::{KontoError, Result};
use crate::model::Role;

/// Client for the land-registry account console.
#[derive(Debug, Parser)]
#[command(name = "konto")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides the configuration file).
    #[arg(short = 's', long, global = true, env = "KONTO_SERVER")]
    pub server: Option<String>,

    /// Session token.
    #[arg(short = 't', long, global = true, env = "KONTO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output as JSON.
    #[arg(long, global = true, env = "KONTO_JSON")]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "KONTO_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "KONTO_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "KONTO_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Session token from `--token` / `KONTO_TOKEN`.
    #[must_use]
    pub fn auth(&self) -> Option<AuthToken> {
        self.token.clone().and_then(AuthToken::new)
    }

    /// Load configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_layered(self.config.as_deref())?;
        if let Some(server) = &self.server {
            config.server.url = server.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a section of a snapshot file.
    Show(ShowArgs),

    /// Send a command to the backend.
    Send(SendArgs),

    /// Download registry sheets.
    Export(ExportArgs),

    /// Manage configuration.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Snapshot file (bare snapshot or `ok` reply).
    pub snapshot: PathBuf,

    /// Section by sidebar index or key (e.g. `2` or `benutzer`).
    #[arg(short = 'S', long)]
    pub section: Option<String>,

    /// Filter rows (case-insensitive substring).
    #[arg(short = 'f', long)]
    pub filter: Option<String>,

    /// Mark rows as selected.
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Select every visible row.
    #[arg(long, conflicts_with = "select")]
    pub select_all: bool,

    /// Table width in characters.
    #[arg(short = 'w', long, default_value = "120")]
    pub width: usize,
}

/// Arguments for the send command.
#[derive(Debug, Parser)]
pub struct SendArgs {
    /// Command to send.
    #[command(subcommand)]
    pub command: SendCommand,

    /// Snapshot file of the running session; the reply must match its role.
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Section of the reply to render.
    #[arg(short = 'S', long, global = true)]
    pub section: Option<String>,
}

/// Commands understood by the backend.
#[derive(Debug, Subcommand)]
pub enum SendCommand {
    /// Grant access requests.
    ApproveAccess {
        /// Access request ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Reject access requests.
    RejectAccess {
        /// Access request ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Withdraw granted access.
    WithdrawAccess {
        /// Access request ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Create a user.
    CreateUser {
        /// Display name.
        #[arg(long)]
        name: String,
        /// E-mail (the login).
        #[arg(long)]
        email: String,
        /// Initial password.
        #[arg(long, env = "KONTO_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// Role of the new user.
        #[arg(long, default_value = "gast")]
        role: String,
    },
    /// Delete users.
    DeleteUsers {
        /// User e-mails.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Change the role of a user.
    EditUserRole {
        /// New role.
        role: String,
        /// User e-mail.
        id: String,
        /// Further selected users.
        selection: Vec<String>,
    },
    /// Generate a new key pair for a user.
    GenerateKeypair {
        /// User e-mail.
        id: String,
    },
    /// Create a district.
    CreateDistrict {
        /// Federal state (code or name).
        #[arg(long)]
        land: String,
        /// Local court.
        #[arg(long)]
        court: String,
        /// District name.
        #[arg(long)]
        district: String,
    },
    /// Delete districts.
    DeleteDistricts {
        /// District ids (`land/amtsgericht/bezirk`).
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Change an account setting.
    EditSetting {
        /// Setting key.
        key: String,
        /// New value.
        value: String,
    },
    /// Subscribe to changes of a registry sheet.
    Subscribe {
        /// Delivery channel (`email` or `webhook`).
        #[arg(long = "type")]
        kind: String,
        /// Local court.
        #[arg(long)]
        court: String,
        /// District name.
        #[arg(long)]
        district: String,
        /// Sheet number.
        #[arg(long)]
        sheet: String,
        /// E-mail address or webhook URL.
        #[arg(long)]
        target: String,
        /// Optional file reference.
        #[arg(long, default_value = "")]
        reference: String,
    },
    /// End subscriptions.
    EndSubscriptions {
        /// Subscription ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Any other action.
    Custom {
        /// Action name.
        action: String,
        /// Positional arguments.
        args: Vec<String>,
    },
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Sheet ids (`land/amtsgericht/bezirk/blatt`).
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Target directory (overrides `export.directory`).
    #[arg(short = 'o', long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Config action to perform.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration file path.
    Path,

    /// Initialize configuration file with defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "konto", &mut io::stdout());
}

/// Parse a role given on the command line.
pub(crate) fn parse_role(value: &str) -> Result<Role> {
    value.parse()
}

/// Initialize tracing on stderr. `RUST_LOG` overrides `--log-level`.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    if let Err(e) = tracing_subscriber::registry()
        .with(log_layer(cli.log_format).with_filter(filter))
        .try_init()
    {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Formatting layer for one log format. Dispatch spans are closed with
/// their timing in the JSON output so request round trips can be traced.
fn log_layer(
    format: LogFormat,
) -> Box<dyn tracing_subscriber::Layer<tracing_subscriber::Registry> + Send + Sync> {
    use tracing_subscriber::{fmt, fmt::format::FmtSpan, Layer};

    let layer = fmt::layer().with_writer(io::stderr);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Compact => layer.compact().with_target(false).boxed(),
        LogFormat::Pretty => layer.pretty().with_file(true).with_line_number(true).boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

/// Build the runtime that drives network commands.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| KontoError::io("Failed to start async runtime", e))
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    match &cli.command {
        Commands::Show(args) => commands::show::run(&cli, args),
        Commands::Send(args) => runtime()?.block_on(commands::send::run(&cli, args)),
        Commands::Export(args) => runtime()?.block_on(commands::export::run(&cli, args)),
        Commands::Config(args) => commands::config::run(&cli, args),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
