//! CARE Lab CLI.

use std::io::{self, IsTerminal};

use clap::Parser;
use tracing::level_filters::LevelFilter;

use care_lab_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use care_lab_cli::commands::{run_command, Workspace};
use care_lab_cli::logging::{init_logging, LogConfig, LogFormat};
use care_lab_cli::menu::Menu;

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let workspace = match Workspace::open(&cli.data_dir, cli.config.as_deref()) {
        Ok(workspace) => workspace,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Menu => {
            let stdin = io::stdin();
            let mut menu = Menu::new(workspace.clinic(), stdin.lock(), io::stdout());
            menu.run().map_err(anyhow::Error::from)
        }
        command => run_command(command, &workspace, &mut io::stdout()),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %error, "command failed");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags; `--log-level` wins over -v/-q.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();
    config
}
