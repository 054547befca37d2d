// SPDX-License-Identifier: MPL-2.0
use media_deck::application::cache::{FolderCache, PlaylistCache};
use media_deck::application::loader::{LoadOutcome, PlaylistLoader};
use media_deck::application::navigation::NavigationEngine;
use media_deck::application::port::{Clock, KeyValueStore, PlaylistRepository};
use media_deck::application::scanner::Scanner;
use media_deck::config::{self, Config, Settings, SortOrder};
use media_deck::domain::media::{MediaFilter, MediaItem};
use media_deck::domain::playlist::{Playlist, Source};
use media_deck::error::{Error, Result};
use media_deck::infrastructure::playlists::PLAYLISTS_FILE;
use media_deck::infrastructure::{
    FileStore, FsModificationProbe, FsPathResolver, SystemClock, TomlPlaylistRepository,
};
use media_deck::{logging, paths};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

const HELP: &str = "\
media-deck: build and browse media playlists

USAGE:
  media-deck [OPTIONS] <COMMAND>

COMMANDS:
  scan [--recursive] [--filter F] [--force] PATH...    List media found in PATHs
  shuffle [--recursive] [--filter F] [--count N] PATH... Print N selections
  playlist [--force] [--count N] ID                     Load a playlist from playlists.toml
  playlists                                             List configured playlists
  evict                                                 Drop expired cache entries

OPTIONS:
  -v, --verbose          Increase log verbosity (repeatable)
  --sort ORDER           discovery | alphabetical | reverse-alphabetical
  --seed N               Seed the random selection
  --data-dir DIR         Override the data directory
  --config-dir DIR       Override the config directory
  -h, --help             Print this help

FILTERS:
  mixed (default) | photos | videos
";

struct GlobalArgs {
    sort: Option<SortOrder>,
    seed: Option<u64>,
    data_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
}

/// Services wired from configuration.
struct Context {
    loader: PlaylistLoader,
    folder_cache: FolderCache,
    playlist_cache: PlaylistCache,
    repository: Arc<TomlPlaylistRepository>,
    settings: Settings,
}

fn arg_error(error: pico_args::Error) -> Error {
    Error::Config(error.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    let mut verbosity = 0u8;
    if args.contains("-vv") {
        verbosity += 2;
    }
    while args.contains(["-v", "--verbose"]) {
        verbosity = verbosity.saturating_add(1);
    }
    logging::init(verbosity);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(mut args: pico_args::Arguments) -> Result<()> {
    let globals = GlobalArgs {
        sort: args.opt_value_from_str("--sort").map_err(arg_error)?,
        seed: args.opt_value_from_str("--seed").map_err(arg_error)?,
        data_dir: args.opt_value_from_str("--data-dir").map_err(arg_error)?,
        config_dir: args.opt_value_from_str("--config-dir").map_err(arg_error)?,
    };
    let command = args.subcommand().map_err(arg_error)?;

    let (config, warning) = config::load_with_override(globals.config_dir.clone());
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
    let context = build_context(config, &globals)?;
    let _settings_task = context.loader.follow_settings(&context.settings);
    if let Some(sort) = globals.sort {
        context.settings.set_sort_order(sort);
        // Applied synchronously so the first listing already uses it.
        context.loader.engine().set_sort_order(sort);
    }

    match command.as_deref() {
        Some("scan") => {
            let recursive = args.contains(["-r", "--recursive"]);
            let force = args.contains("--force");
            let filter = parse_filter(&mut args)?;
            let playlist = ad_hoc_playlist(finish_paths(args)?, filter, recursive);
            let outcome = context.loader.load_playlist(&playlist, force).await?;
            report(&outcome);
            for item in context.loader.engine().ordered_items() {
                println!("{item}");
            }
            Ok(())
        }
        Some("shuffle") => {
            let recursive = args.contains(["-r", "--recursive"]);
            let count: usize = args
                .opt_value_from_str("--count")
                .map_err(arg_error)?
                .unwrap_or(10);
            let filter = parse_filter(&mut args)?;
            let playlist = ad_hoc_playlist(finish_paths(args)?, filter, recursive);
            let outcome = context.loader.load_playlist(&playlist, false).await?;
            report(&outcome);
            print_selections(context.loader.engine(), count);
            Ok(())
        }
        Some("playlist") => {
            let force = args.contains("--force");
            let count: Option<usize> = args.opt_value_from_str("--count").map_err(arg_error)?;
            let id: String = args.free_from_str().map_err(arg_error)?;
            reject_leftovers(args)?;
            let outcome = context.loader.load_playlist_by_id(&id, force).await?;
            report(&outcome);
            match count {
                Some(count) => print_selections(context.loader.engine(), count),
                None => {
                    for item in context.loader.engine().ordered_items() {
                        println!("{item}");
                    }
                }
            }
            Ok(())
        }
        Some("playlists") => {
            reject_leftovers(args)?;
            for playlist in context.repository.playlists() {
                println!(
                    "{}\t{}\t{} source(s)\t{:?}",
                    playlist.id,
                    playlist.name,
                    playlist.sources.len(),
                    playlist.filter
                );
            }
            Ok(())
        }
        Some("evict") => {
            reject_leftovers(args)?;
            let folders = context.folder_cache.evict_expired()?;
            let playlists = context.playlist_cache.evict_expired()?;
            println!("evicted {folders} folder and {playlists} playlist entries");
            Ok(())
        }
        Some(other) => Err(Error::Config(format!("unknown command '{other}'"))),
        None => {
            print!("{HELP}");
            Ok(())
        }
    }
}

fn build_context(config: Config, globals: &GlobalArgs) -> Result<Context> {
    let cache_dir = paths::get_cache_dir_with_override(globals.data_dir.clone())
        .ok_or_else(|| Error::Config("cannot determine data directory".into()))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(cache_dir)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let folder_cache = FolderCache::new(
        Arc::clone(&store),
        Arc::new(FsModificationProbe),
        Arc::clone(&clock),
        config.folder_cache_validity(),
    );
    let playlist_cache = PlaylistCache::new(store, clock, config.playlist_cache_validity());

    let scanner = Scanner::new(Arc::new(FsPathResolver::with_volumes(config.volumes.clone())))
        .with_folder_cache(folder_cache.clone())
        .with_batch_size(config.batch_size());

    let repository = Arc::new(load_repository(globals.config_dir.clone())?);
    let engine = Arc::new(globals.seed.map_or_else(NavigationEngine::new, NavigationEngine::with_seed));
    let loader = PlaylistLoader::new(scanner, playlist_cache.clone(), engine)
        .with_repository(Arc::clone(&repository) as Arc<dyn PlaylistRepository>);

    Ok(Context {
        loader,
        folder_cache,
        playlist_cache,
        repository,
        settings: Settings::new(config),
    })
}

fn load_repository(config_dir: Option<PathBuf>) -> Result<TomlPlaylistRepository> {
    match paths::get_app_config_dir_with_override(config_dir) {
        Some(dir) => TomlPlaylistRepository::load_from_path(&dir.join(PLAYLISTS_FILE)),
        None => Ok(TomlPlaylistRepository::default()),
    }
}

fn parse_filter(args: &mut pico_args::Arguments) -> Result<MediaFilter> {
    let filter: Option<String> = args.opt_value_from_str("--filter").map_err(arg_error)?;
    match filter {
        Some(value) => value.parse().map_err(Error::Config),
        None => Ok(MediaFilter::default()),
    }
}

fn reject_leftovers(args: pico_args::Arguments) -> Result<()> {
    let rest = args.finish();
    if rest.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!("unexpected arguments: {rest:?}")))
    }
}

fn finish_paths(args: pico_args::Arguments) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for arg in args.finish() {
        let path = PathBuf::from(arg);
        if path.to_string_lossy().starts_with('-') {
            return Err(Error::Config(format!("unknown option {}", path.display())));
        }
        paths.push(path);
    }
    if paths.is_empty() {
        return Err(Error::Config("no PATH given".into()));
    }
    Ok(paths)
}

/// Builds a playlist for command-line paths. The id encodes every input so
/// each combination has its own cached result.
fn ad_hoc_playlist(paths: Vec<PathBuf>, filter: MediaFilter, recursive: bool) -> Playlist {
    let sources: Vec<Source> = paths.iter().map(|path| source_for(path, recursive)).collect();
    let listing: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    let id = format!("cli:{filter:?}:{recursive}:{}", listing.join("|"));
    Playlist::new(id, sources, filter)
}

fn source_for(path: &Path, recursive: bool) -> Source {
    let identifier = path.display().to_string();
    if path.is_file() {
        Source::file(identifier)
    } else {
        Source::folder(identifier, recursive)
    }
}

fn report(outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Suppressed => tracing::info!("playlist already loaded"),
        LoadOutcome::CacheHit { count } => tracing::info!(count, "loaded from cache"),
        LoadOutcome::Scanned { count } => tracing::info!(count, "scanned"),
    }
}

fn print_selections(engine: &NavigationEngine, count: usize) {
    let mut shown: Option<MediaItem> = engine.current();
    for _ in 0..count {
        let Some(item) = shown else {
            break;
        };
        println!("{item}");
        shown = engine.next();
    }
}
