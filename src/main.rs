use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pipebridge::config::{Config, ConfigError, CursorMode};
use pipebridge::{diagnostics, logging, Bridge, Command, ExitReason, InboxWriter, ShutdownHandle};

const EXIT_CANCELLED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "pipebridge", version, about = "File-backed build/test command bridge")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Poll the inbox and answer commands (default)
    Serve(ServeArgs),
    /// Append a prompt and its command to the inbox
    Send {
        /// Command to send after the lines
        #[arg(value_enum)]
        command: Command,
        /// Prompt lines
        lines: Vec<String>,
        /// Override the inbox path
        #[arg(long)]
        inbox: Option<PathBuf>,
    },
    /// Print the default config file path
    ConfigPath,
}

#[derive(clap::Args, Debug, Default)]
struct ServeArgs {
    /// Override the inbox path
    #[arg(long)]
    inbox: Option<PathBuf>,
    /// Override the outbox (sink A) path
    #[arg(long)]
    outbox: Option<PathBuf>,
    /// Override the mirror (sink B) path
    #[arg(long)]
    mirror: Option<PathBuf>,
    /// Delay between polling passes in milliseconds
    #[arg(long)]
    poll_ms: Option<u64>,
    /// How the inbox read position moves between passes
    #[arg(long, value_enum)]
    cursor: Option<CursorMode>,
    /// Do not echo inbox lines to stdout
    #[arg(long)]
    no_echo: bool,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(inbox) = self.inbox {
            config.inbox.path = inbox;
        }
        if let Some(outbox) = self.outbox {
            config.sinks.outbox = outbox;
        }
        if let Some(mirror) = self.mirror {
            config.sinks.mirror = mirror;
        }
        if let Some(poll_ms) = self.poll_ms {
            config.polling.interval_ms = poll_ms;
        }
        if let Some(cursor) = self.cursor {
            config.inbox.cursor = cursor;
        }
        if self.no_echo {
            config.echo = false;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config;

    match cli.command.unwrap_or_else(|| Action::Serve(ServeArgs::default())) {
        Action::Serve(args) => serve(config_path.as_deref(), args),
        Action::Send {
            command,
            lines,
            inbox,
        } => {
            let config = load_config(config_path.as_deref())?;
            let inbox = inbox.unwrap_or(config.inbox.path);
            InboxWriter::append(&inbox)?
                .send_prompt(command, &lines)
                .with_context(|| format!("Failed to send '{}' prompt", command))?;
            Ok(ExitCode::SUCCESS)
        }
        Action::ConfigPath => {
            let path = config_path.unwrap_or_else(Config::config_path);
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads `--config` when given, otherwise the platform default location.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn serve(config_path: Option<&Path>, args: ServeArgs) -> Result<ExitCode> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    config.validate()?;

    diagnostics::redirect_stdio(&config.diagnostics)?;
    logging::init_tracing();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let mut bridge = Bridge::open(&config)?;
    let reason = runtime.block_on(async {
        let shutdown = ShutdownHandle::new();
        shutdown.on_ctrl_c();
        bridge.run(&shutdown).await
    })?;

    Ok(match reason {
        ExitReason::Quit => ExitCode::SUCCESS,
        ExitReason::Cancelled => ExitCode::from(EXIT_CANCELLED),
    })
}
