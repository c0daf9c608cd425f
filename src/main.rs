use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use dgscribe::app::{init_logging, run_captions_command, run_transcribe_command, show_progress};
use dgscribe::cli::{Cli, Commands, ConfigAction};
use dgscribe::config::Config;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Transcribe(args) => {
            let progress = show_progress(cli.quiet, cli.verbose);
            init_logging(cli.quiet, cli.verbose, progress);
            let config = load_config(cli.config.as_deref())?;
            run_transcribe_command(config, &args, progress)?;
        }
        Commands::Captions { patterns } => {
            init_logging(cli.quiet, cli.verbose, false);
            run_captions_command(&patterns)?;
        }
        Commands::Config { action } => {
            init_logging(cli.quiet, cli.verbose, false);
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "dgscribe",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from the given path, or the default path if present.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        },
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

fn config_path(custom_path: Option<&Path>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path().context("could not determine config directory"),
    }
}

/// Handle config management commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    let path = config_path(custom_path)?;

    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default(&path)?.with_env_overrides();
            println!("{}", config.get_value(&key)?);
        }
        ConfigAction::Set { key, value } => {
            // no env overrides here, they must not leak into the file
            let mut config = Config::load_or_default(&path)?;
            config.set_value(&key, &value)?;
            config.save(&path)?;
            println!("Set {key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load_or_default(&path)?.with_env_overrides();
            print!("{}", config.to_display_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
