use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use qianliclaw::api::{AppState, RouterOptions, create_router_with};
use qianliclaw::app_config::{APP_NAME, AppConfig, default_config_dir, expand_str_path};
use qianliclaw::settings::SettingsStore;
use qianliclaw::status::StatusSnapshot;
use qianliclaw::{ConsoleContext, PathResolver};

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn async_serve(ctx: RuntimeContext, cmd: ServeCommand) -> Result<()> {
    handle_serve(&ctx, cmd).await
}

#[tokio::main]
async fn async_health(ctx: RuntimeContext, cmd: HealthCommand) -> Result<()> {
    handle_health(&ctx, cmd).await
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = RuntimeContext::new(cli.common.clone())?;
    ctx.init_logging();
    debug!(config_file = %ctx.config_file.display(), "Resolved config file");

    match cli.command {
        Command::Serve(cmd) => async_serve(ctx, cmd),
        Command::Status => handle_status(),
        Command::Health(cmd) => async_health(ctx, cmd),
        Command::Config { command } => handle_config(&ctx, command),
        Command::Completions { shell } => handle_completions(shell),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "QianliClaw - local admin console for OpenClaw.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    debug: bool,
    /// Enable trace logging (overrides other levels)
    #[arg(long, global = true)]
    trace: bool,
    /// Output machine readable JSON
    #[arg(long, global = true)]
    json: bool,
    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true, conflicts_with = "color")]
    no_color: bool,
    /// Control color output (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    color: ColorOption,
    /// Include targets and source locations in log lines
    #[arg(long = "diagnostics", global = true)]
    diagnostics: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorOption {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve(ServeCommand),
    /// Print the status snapshot
    Status,
    /// Run `openclaw health` once
    Health(HealthCommand),
    /// Inspect and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct ServeCommand {
    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
    /// Directory of the built console UI
    #[arg(long, value_name = "PATH")]
    web_dir: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct HealthCommand {
    /// Path of the openclaw executable
    #[arg(long, value_name = "PATH")]
    cli_path: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Output the effective configuration
    Show,
    /// Print the resolved config file path
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone)]
struct RuntimeContext {
    common: CommonOpts,
    config_file: PathBuf,
    config: AppConfig,
}

impl RuntimeContext {
    fn new(common: CommonOpts) -> Result<Self> {
        let config_file = match common.config.as_deref() {
            Some(path) => {
                let expanded = match path.to_str() {
                    Some(text) => expand_str_path(text)?,
                    None => path.to_path_buf(),
                };
                if expanded.is_dir() {
                    expanded.join("config.toml")
                } else {
                    expanded
                }
            }
            None => default_config_dir()
                .ok_or_else(|| anyhow!("unable to determine configuration directory"))?
                .join("config.toml"),
        };

        let config = AppConfig::load(&config_file)
            .with_context(|| format!("loading config from {}", config_file.display()))?;

        Ok(Self {
            common,
            config_file,
            config,
        })
    }

    fn init_logging(&self) {
        use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

        let level = self.effective_log_level();
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{APP_NAME}={level},tower_http={level}")));

        if self.common.json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .try_init()
                .ok();
        } else {
            let force_color = matches!(self.common.color, ColorOption::Always)
                || env::var_os("FORCE_COLOR").is_some();
            let disable_color = self.common.no_color
                || matches!(self.common.color, ColorOption::Never)
                || env::var_os("NO_COLOR").is_some()
                || (!force_color && !io::stderr().is_terminal());

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(!disable_color)
                        .with_target(self.common.diagnostics)
                        .with_file(self.common.diagnostics)
                        .with_line_number(self.common.diagnostics),
                )
                .try_init()
                .ok();
        }
    }

    fn effective_log_level(&self) -> &str {
        if self.common.quiet {
            "error"
        } else if self.common.trace {
            "trace"
        } else if self.common.debug {
            "debug"
        } else {
            match self.common.verbose {
                0 => self.config.logging.level.as_str(),
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

async fn handle_serve(ctx: &RuntimeContext, cmd: ServeCommand) -> Result<()> {
    let resolver = PathResolver::from_env();
    let settings = SettingsStore::in_home(resolver.home());
    info!(settings = %settings.path().display(), "Starting console server");

    let web_dir = match cmd.web_dir.as_deref() {
        Some(dir) => Some(expand_str_path(dir)?),
        None => ctx.config.web_dir()?,
    };
    if let Some(dir) = web_dir.as_deref().filter(|dir| !dir.is_dir()) {
        warn!(dir = %dir.display(), "Console UI directory does not exist");
    }

    let state = AppState::new(resolver, settings, ctx.config.health_checker());
    let app = create_router_with(
        state,
        RouterOptions {
            body_limit: ctx.config.server.body_limit_bytes,
            web_dir: web_dir.as_deref(),
        },
    );

    let host = cmd.host.unwrap_or_else(|| ctx.config.server.host.clone());
    let port = cmd.port.unwrap_or(ctx.config.server.port);

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding to {host}:{port}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn handle_status() -> Result<()> {
    let resolver = PathResolver::from_env();
    let settings = SettingsStore::in_home(resolver.home());
    let console = ConsoleContext::load(resolver, &settings);
    print_json(&StatusSnapshot::collect(&console))
}

async fn handle_health(ctx: &RuntimeContext, cmd: HealthCommand) -> Result<()> {
    let cli_path = match cmd.cli_path {
        Some(path) => Some(path),
        None => {
            let resolver = PathResolver::from_env();
            SettingsStore::in_home(resolver.home())
                .read()
                .openclaw_cli_path
        }
    };

    let result = ctx.config.health_checker().check(cli_path.as_deref()).await;
    print_json(&result)?;

    if !result.ok {
        bail!("health check failed");
    }
    Ok(())
}

fn handle_config(ctx: &RuntimeContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if ctx.common.json {
                print_json(&ctx.config)
            } else {
                print!(
                    "{}",
                    toml::to_string_pretty(&ctx.config).context("serializing config to TOML")?
                );
                Ok(())
            }
        }
        ConfigCommand::Path => {
            println!("{}", ctx.config_file.display());
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = &ctx.config_file;
            if path.exists() && !force {
                bail!(
                    "config file {} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory {}", parent.display()))?;
            }
            let body = AppConfig::default_toml(path)?;
            fs::write(path, body)
                .with_context(|| format!("writing config file to {}", path.display()))?;
            info!(path = %path.display(), "Wrote default config");
            Ok(())
        }
    }
}

fn handle_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing output to JSON")?;
    println!("{text}");
    Ok(())
}
