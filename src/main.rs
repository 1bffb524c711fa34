// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mapwright CLI entrypoint.
//!
//! Manages the map collection in a store directory: list, create, show, delete, import and
//! export maps. Logs go to stderr (`RUST_LOG`, default `mapwright=info`).

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapwright::config::{default_config_path, default_store_dir, load_config, EditorConfig};
use mapwright::graph;
use mapwright::library::{MapLibrary, MapSearch, NewMap};
use mapwright::model::{Map, MapId, MapKind};
use mapwright::store::transfer::{collection_export_file_name, export_map, map_export_file_name};
use mapwright::store::{FileStorage, WriteDurability, MAPS_COLLECTION};

#[derive(Debug, Parser)]
#[command(name = "mapwright")]
#[command(about = "Author eight-directional place maps for text games", long_about = None)]
struct Cli {
    /// Directory holding the map collection
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Flush writes to stable storage (slower)
    #[arg(long, global = true)]
    durable_writes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List maps, one page at a time
    List {
        #[arg(long)]
        zone: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Create an empty map
    New {
        name: String,
        #[arg(long)]
        zone: Option<String>,
        /// free, protected or dangerous
        #[arg(long, default_value = "free")]
        kind: MapKind,
    },
    /// Print a map and its places
    Show { map_id: String },
    /// Delete a map and its places
    Delete { map_id: String },
    /// Import a JSON document (one map or an array of maps)
    Import { file: PathBuf },
    /// Export the whole collection, or a single map with --map
    Export {
        #[arg(long)]
        map: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapwright=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_ref());
    let store_dir = cli.store.clone().unwrap_or_else(default_store_dir);
    let durability = if cli.durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    };
    let storage =
        FileStorage::new(&store_dir, config.storage_prefix.clone()).with_durability(durability);
    tracing::debug!(store = %store_dir.display(), "using store");

    let mut library = MapLibrary::open(storage, config);
    run(&mut library, cli.command)
}

fn resolve_config(explicit: Option<&PathBuf>) -> EditorConfig {
    let Some(path) = explicit.cloned().or_else(default_config_path) else {
        return EditorConfig::default();
    };
    match load_config(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "using default config");
            EditorConfig::default()
        }
    }
}

fn parse_map_id(raw: &str) -> anyhow::Result<MapId> {
    MapId::new(raw).with_context(|| format!("invalid map id {raw:?}"))
}

fn run(library: &mut MapLibrary<FileStorage>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { zone, name, page } => {
            let page_size = library.config().page_size;
            let page_index = page.saturating_sub(1);
            let result = library.search(&MapSearch { zone, name }, page_index)?;
            for map in &result.items {
                println!(
                    "{}\t{}\t{}\t{}\t{} places\t{}",
                    map.id(),
                    map.zone(),
                    map.display_name(),
                    map.kind(),
                    map.places().len(),
                    map.last_modified_text().unwrap_or_default()
                );
            }
            println!(
                "page {}/{} ({} maps)",
                page_index + 1,
                result.page_count(page_size).max(1),
                result.total
            );
        }
        Command::New { name, zone, kind } => {
            let map = library.create_map(NewMap {
                name,
                zone,
                kind,
                description: None,
            })?;
            println!("{}", map.id());
        }
        Command::Show { map_id } => {
            let map_id = parse_map_id(&map_id)?;
            let Some(map) = library.get_map(&map_id)? else {
                bail!("map {map_id} not found");
            };
            print_map(&map);
        }
        Command::Delete { map_id } => {
            let map_id = parse_map_id(&map_id)?;
            if !library.delete_map(&map_id)? {
                bail!("map {map_id} not found");
            }
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let report = library.import_json(&text)?;
            println!("imported {} maps, skipped {}", report.upserted, report.skipped);
        }
        Command::Export { map, out } => {
            let (text, default_name) = match map {
                Some(map_id) => {
                    let map_id = parse_map_id(&map_id)?;
                    let Some(map) = library.get_map(&map_id)? else {
                        bail!("map {map_id} not found");
                    };
                    (export_map(&map)?, map_export_file_name(&map))
                }
                None => {
                    let Some(text) = library.export_all()? else {
                        bail!("no maps to export");
                    };
                    let today = chrono::Local::now().date_naive();
                    (text, collection_export_file_name(MAPS_COLLECTION, today))
                }
            };
            let path = out.unwrap_or_else(|| PathBuf::from(default_name));
            std::fs::write(&path, text)
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_map(map: &Map) {
    println!("{} [{}] {} ({})", map.id(), map.zone(), map.name(), map.kind());
    if let Some(description) = map.description() {
        println!("  {description}");
    }
    for place in map.places() {
        let exits = graph::neighbor_ids(place)
            .map(|(dir, id)| {
                let name = map.place(id).map_or(id.as_str(), |p| p.name());
                format!("{}:{name}", dir.as_str())
            })
            .collect::<Vec<_>>();
        println!("- {} {} -> {}", place.id(), place.name(), exits.join(", "));
        if let Some(teleport) = place.teleport() {
            println!(
                "    teleport: {}/{}",
                teleport.target_map_name, teleport.target_place_name
            );
        }
    }
    if map.places().is_empty() {
        println!("  (no places)");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use mapwright::model::MapKind;

    #[test]
    fn parses_new_with_kind_and_globals() {
        let cli = Cli::try_parse_from([
            "mapwright",
            "new",
            "Misty Forest",
            "--kind",
            "dangerous",
            "--store",
            "/tmp/maps",
            "--durable-writes",
        ])
        .expect("parse");

        assert!(cli.durable_writes);
        assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/maps")));
        let Command::New { name, kind, zone } = cli.command else {
            panic!("expected new");
        };
        assert_eq!(name, "Misty Forest");
        assert_eq!(kind, MapKind::Dangerous);
        assert_eq!(zone, None);
    }

    #[test]
    fn list_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["mapwright", "list", "--zone", "town"]).expect("parse");
        let Command::List { zone, name, page } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(zone.as_deref(), Some("town"));
        assert_eq!(name, None);
        assert_eq!(page, 1);
    }

    #[test]
    fn rejects_unknown_kind_and_missing_command() {
        assert!(Cli::try_parse_from(["mapwright", "new", "x", "--kind", "volcano"]).is_err());
        assert!(Cli::try_parse_from(["mapwright"]).is_err());
    }
}
