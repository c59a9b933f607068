//! `geotrail` - CLI for the geotrail location history
//!
//! This binary captures positions into the local history, lists them, and
//! manages display preferences.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;

use geotrail::cli::output::{render_record, render_records};
use geotrail::cli::{
    CaptureCommand, Cli, Command, ConfigCommand, ListCommand, PrefCommand, StatusCommand,
    ThemeCommand,
};
use geotrail::{
    derive_theme, init_logging, CaptureController, Config, Coordinate, FixedProvider,
    QueryFacade, Storage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Validation reports on a file that may not load, so it runs before the
    // active configuration is read.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Capture(cmd) => handle_capture(&config, &cmd).await,
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Pref(cmd) => handle_pref(&config, cmd).await,
        Command::Theme(cmd) => handle_theme(&config, &cmd).await,
        Command::Status(cmd) => handle_status(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let path = config.database_path();
    Storage::open(&path).with_context(|| format!("opening {}", path.display()))
}

async fn handle_capture(config: &Config, cmd: &CaptureCommand) -> anyhow::Result<()> {
    let provider = match (cmd.lat, cmd.lon) {
        (Some(latitude), Some(longitude)) => {
            FixedProvider::new(Coordinate::new(latitude, longitude)?)
        }
        _ => config
            .fixed_coordinate()?
            .map_or_else(FixedProvider::unconfigured, FixedProvider::new),
    };

    let storage = open_storage(config)?;
    let controller = CaptureController::new(provider, storage.locations())
        .with_provider_timeout(config.provider_timeout());

    let record = match controller.capture().await {
        Ok(record) => record,
        Err(e) if e.is_permission_error() => {
            bail!("{e}; allow location access and capture again")
        }
        Err(e) if e.is_storage_error() => {
            return Err(anyhow::Error::new(e)
                .context(format!("nothing recorded in {}", storage.path().display())));
        }
        Err(e) if e.is_retryable() => bail!("{e}; capture again to retry"),
        Err(e) => return Err(e.into()),
    };
    println!("{}", render_record(&record, cmd.format)?);
    Ok(())
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let query = QueryFacade::new(storage.locations());

    let records = query.list_all().await?;
    println!("{}", render_records(&records, cmd.format)?);
    Ok(())
}

async fn handle_pref(config: &Config, cmd: PrefCommand) -> anyhow::Result<()> {
    let preferences = open_storage(config)?.preferences();

    match cmd {
        PrefCommand::Get { name, default } => {
            println!("{}", preferences.get_bool(&name, default).await?);
        }
        PrefCommand::Set { name, value } => {
            preferences.set_bool(&name, value).await?;
            println!("{value}");
        }
        PrefCommand::Toggle { name } => {
            println!("{}", preferences.toggle_bool(&name, false).await?);
        }
    }
    Ok(())
}

async fn handle_theme(config: &Config, cmd: &ThemeCommand) -> anyhow::Result<()> {
    let dark_mode = open_storage(config)?.preferences().dark_mode().await?;
    let palette = derive_theme(dark_mode);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&palette)?);
    } else {
        println!("Theme:         {}", palette.name);
        println!("Background:    {}", palette.background);
        println!("On background: {}", palette.on_background);
        println!("Surface:       {}", palette.surface);
        println!("Primary:       {}", palette.primary);
        println!("On primary:    {}", palette.on_primary);
    }
    Ok(())
}

async fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats().await?;
    let dark_mode = storage.preferences().dark_mode().await?;

    if cmd.json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "stats": stats,
            "dark_mode": dark_mode,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("geotrail status");
        println!("---------------");
        println!("Database:      {}", storage.path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Locations:     {}", stats.total_locations);
        if let Some(oldest) = stats.oldest_capture {
            println!("Oldest:        {}", oldest.to_rfc3339());
        }
        if let Some(newest) = stats.newest_capture {
            println!("Newest:        {}", newest.to_rfc3339());
        }
        println!("Dark mode:     {dark_mode}");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Capture]");
                println!(
                    "  Provider timeout:   {} ms",
                    config.capture.provider_timeout_ms
                );
                println!();
                println!("[Provider]");
                match config.fixed_coordinate()? {
                    Some(coordinate) => println!(
                        "  Fixed position:     {}, {}",
                        coordinate.latitude(),
                        coordinate.longitude()
                    ),
                    None => println!("  Fixed position:     (none)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => return handle_validate(file),
    }
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => {
            println!("Configuration is valid.");
            Ok(())
        }
        Err(e) => bail!("configuration error: {e}"),
    }
}
