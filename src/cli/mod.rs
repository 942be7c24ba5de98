use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::browser::{Browser, PrintBrowser, SystemBrowser};
use crate::commands::{CommandContext, InfoFlags, ReportFlags};
use crate::probe::SystemProbe;
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "devdiag",
    version,
    about = "Developer environment diagnostics and pre-filled issue reports"
)]
pub struct Cli {
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Per-process timeout in seconds for environment probes.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Display dev environment version information
    Info(InfoArgs),
    /// Open a pre-filled bug report (or feature request) in the browser
    Report(ReportArgs),
    /// Print a shell completion script
    Completion(CompletionArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// output raw json
    #[arg(short, long)]
    pub json: bool,
    /// output yml
    #[arg(short, long, conflicts_with = "json")]
    pub yml: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// request a feature instead of reporting a bug
    #[arg(short, long)]
    pub feature: bool,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
    #[arg(long)]
    pub json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let stdout_is_tty = io::stdout().is_terminal();
    let stderr_is_tty = io::stderr().is_terminal();

    let home_dir = crate::platform::effective_home_dir()?;

    let env_config_path = std::env::var_os("DEVDIAG_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;
    tracing::debug!(config_path = ?cfg.config_path, "configuration loaded");

    let ui_cfg = UiConfig {
        color: stdout_is_tty && cfg.ui.color && !cli.no_color,
        stderr_is_tty,
        quiet: cli.quiet,
    };

    let probe = SystemProbe::new(
        Duration::from_secs(cli.timeout.unwrap_or(cfg.probe.timeout_secs)),
        ui_cfg.stderr_is_tty && !ui_cfg.quiet,
    );

    match cli.command {
        Commands::Info(args) => {
            let flags = InfoFlags {
                json: args.json,
                yml: args.yml,
            };
            let ctx = CommandContext::new(flags, &cfg.host).with_color(ui_cfg.color);
            let mut out = io::stdout().lock();
            match crate::commands::info::run(&ctx, &probe, &mut out) {
                Ok(()) => {}
                Err(err) if err.is_broken_pipe() => {}
                Err(err) => return Err(crate::exit::command_err(err)),
            }
        }
        Commands::Report(args) => {
            let flags = ReportFlags {
                feature: args.feature,
            };
            let ctx = CommandContext::new(flags, &cfg.host);
            let browser: &dyn Browser = if cli.dry_run {
                &PrintBrowser
            } else {
                &SystemBrowser
            };
            let url = crate::commands::report::run(&ctx, &probe, browser)
                .map_err(crate::exit::command_err)?;
            if !cli.dry_run && !ui_cfg.quiet {
                eprintln!("Opened {url}");
            }
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "devdiag", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                if args.json {
                    let stdout = io::stdout();
                    serde_json::to_writer_pretty(stdout.lock(), &cfg)?;
                    println!();
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `devdiag config --show`");
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if cli.verbose {
        "warn,devdiag=debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("DEVDIAG_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "unsupported shell: {other} (expected bash|zsh|fish)"
        ))),
    }
}
