//! CLI command implementations
//!
//! Each command opens the catalog, performs one operation and returns the
//! `data` payload of the response. `run` prints it.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::catalog::{GameCatalog, Resolution};
use crate::config::Config;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::storage::NewGame;

use super::args::{Cli, Command, SearchArgs};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments, loads configuration, runs the command and writes the
/// success response. The caller reports errors.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load_or_default(&cli.config)?;
    Logger::set_min_severity(config.log_severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("data_dir", config.data_dir.as_str())],
    );

    let data = run_command(&config, cli.command)?;
    write_response(data)
}

/// Run one command against the catalog described by `config`
pub fn run_command(config: &Config, cmd: Command) -> CliResult<Value> {
    let mut catalog = GameCatalog::open(config)?;

    match cmd {
        Command::Add {
            name,
            price,
            stock,
            company,
            date,
            cover,
        } => {
            let draft = NewGame {
                nombre: name,
                precio: price,
                cantidad: stock,
                compania: company,
                fecha_publicacion: date,
            };
            add(&mut catalog, draft, &cover)
        }
        Command::Get { id } => get(&mut catalog, &id),
        Command::Delete { id } => delete(&mut catalog, &id),
        Command::List => Ok(json!({ "games": catalog.list()? })),
        Command::Search(args) => search(&catalog, args),
        Command::Stats => Ok(serde_json::to_value(catalog.statistics())?),
        Command::Rebuild => Ok(serde_json::to_value(catalog.rebuild()?)?),
        Command::Import { file } => {
            let count = catalog.import(&file)?;
            Ok(json!({ "imported": count }))
        }
        Command::Export { file } => {
            let count = catalog.export(&file)?;
            Ok(json!({ "exported": count }))
        }
    }
}

fn resolution_str(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Indexed => "indexed",
        Resolution::Rebuilt => "rebuilt",
    }
}

fn add(catalog: &mut GameCatalog, draft: NewGame, cover: &Path) -> CliResult<Value> {
    let bytes = fs::read(cover).map_err(|e| {
        CliError::io_error(format!("Failed to read cover {}: {}", cover.display(), e))
    })?;
    let cover_name = cover
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let game = catalog.register(draft, &bytes, &cover_name)?;
    Ok(json!({
        "id": game.id,
        "message": format!("Game '{}' added", game.nombre),
    }))
}

fn get(catalog: &mut GameCatalog, id: &str) -> CliResult<Value> {
    let found = catalog.find(id)?;
    let resolution = resolution_str(found.resolution);
    match found.value {
        Some(game) => Ok(json!({ "game": game, "resolution": resolution })),
        None => Err(CliError::not_found(id)),
    }
}

fn delete(catalog: &mut GameCatalog, id: &str) -> CliResult<Value> {
    let deleted = catalog.delete(id)?;
    if !deleted.value {
        return Err(CliError::not_found(id));
    }
    Ok(json!({
        "deleted": id,
        "resolution": resolution_str(deleted.resolution),
    }))
}

fn search(catalog: &GameCatalog, args: SearchArgs) -> CliResult<Value> {
    let games = match (args.name, args.company) {
        (Some(name), _) => catalog.find_by_name(&name)?.into_iter().collect(),
        (None, Some(company)) => catalog.filter_by_company(&company)?,
        (None, None) => Vec::new(),
    };
    Ok(json!({ "games": games }))
}
