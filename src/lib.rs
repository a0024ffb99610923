//! tvhelper - Organize TV show folders for media servers
//!
//! This library fetches a series record from TheTVDB, makes sure the base
//! directory holds a show folder named `<Series Name> {tvdb-<ID>}`, and stores
//! the fetched details as `show_details.json` inside it.

mod config;
mod folder_reconciler;
mod metadata_retrieval;
mod metadata_writer;
mod prompt;
mod temp;

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// Re-export error types
pub use config::ConfigError;
pub use folder_reconciler::FolderError;
pub use metadata_retrieval::MetadataRetrievalError;
pub use metadata_writer::MetadataWriteError;

pub use config::{Config, DEFAULT_API_URL, default_config_path};
pub use folder_reconciler::{
    clean_show_name, find_candidate_folder, reconcile_show_folder, season_folder_name,
    show_folder_name,
};
pub use metadata_retrieval::{
    Episode, MetadataProvider, Season, TvSeries, TvdbProvider, season_episodes,
};
pub use metadata_writer::{
    METADATA_FILE_NAME, NO_OVERVIEW, ShowDetails, write_show_details,
};
pub use prompt::{confirm_line, is_yes};

/// Progress event emitted while adding a series
///
/// These events allow library users to report what happens on disk and on
/// the network, or to stay silent.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Adding the series started
    Started { tvdb_id: u64, base_path: PathBuf },

    /// Logging in and fetching the series record
    FetchingSeries { tvdb_id: u64 },

    /// Series record fetched
    SeriesFetched {
        series_name: String,
        season_count: usize,
    },

    /// The operator said the candidate folder is not the right one
    NoFolderChanges,

    /// The candidate folder is renamed to the tagged name
    RenamingFolder { from: PathBuf, to: PathBuf },

    /// The operator kept the candidate folder's name
    FolderNotUpdated { folder: PathBuf },

    /// No candidate folder exists, the tagged folder is created
    CreatingFolder { path: PathBuf },

    /// A season folder exists inside the show folder
    SeasonFolderCreated { path: PathBuf },

    /// The metadata sidecar was written
    MetadataWritten { path: PathBuf },

    /// Adding the series is complete
    Complete { show_path: PathBuf },
}

/// Top-level error type for tvhelper operations
#[derive(Debug, Error)]
pub enum TvHelperError {
    /// Error while loading the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error during metadata retrieval
    #[error("Metadata retrieval error: {0}")]
    MetadataRetrieval(#[from] MetadataRetrievalError),

    /// Error while reconciling the show folder
    #[error("Folder error: {0}")]
    Folder(#[from] FolderError),

    /// Error while writing the metadata sidecar
    #[error("Metadata write error: {0}")]
    MetadataWrite(#[from] MetadataWriteError),
}

/// Adds a series to a media library folder
///
/// Logs in to TheTVDB, fetches the series, reconciles the show folder below
/// `base_path` and writes `show_details.json` into it.
///
/// By default the season set and episode mapping stay empty, so no season
/// folders are created and the sidecar lists no seasons. With `with_seasons`
/// the episode list is requested as well and every official season gets a
/// `Season <NN>` folder and a sidecar entry.
///
/// # Arguments
///
/// * `config` - Resolved API configuration
/// * `tvdb_id` - Catalog ID of the series
/// * `base_path` - Directory that holds the show folders
/// * `with_seasons` - Extract seasons and episodes from the fetched record
/// * `confirm` - Answers the yes/no questions asked about an existing folder
/// * `progress_callback` - Closure called with progress events (can be empty for silent operation)
///
/// # Returns
///
/// The path of the show folder
///
/// # Examples
///
/// ```no_run
/// use tvhelper::{add_series, Config};
/// use std::path::Path;
///
/// let config = Config::load(None).unwrap();
/// let show_path = add_series(
///     &config,
///     81189,
///     Path::new("/media/tv"),
///     false,
///     |_prompt: &str| Ok(true), // Accept every suggestion
///     |_| {},                   // Ignore all progress events
/// ).unwrap();
/// println!("{}", show_path.display());
/// ```
pub fn add_series<C, F>(
    config: &Config,
    tvdb_id: u64,
    base_path: &Path,
    with_seasons: bool,
    confirm: C,
    progress_callback: F,
) -> Result<PathBuf, TvHelperError>
where
    C: FnMut(&str) -> io::Result<bool>,
    F: FnMut(ProgressEvent),
{
    let provider = TvdbProvider::new(config);
    add_series_with(
        &provider,
        tvdb_id,
        base_path,
        with_seasons,
        confirm,
        progress_callback,
    )
}

/// Adds a series using the given metadata provider
///
/// See [`add_series`]; this variant lets callers supply the provider.
pub fn add_series_with<P, C, F>(
    provider: &P,
    tvdb_id: u64,
    base_path: &Path,
    with_seasons: bool,
    confirm: C,
    mut progress_callback: F,
) -> Result<PathBuf, TvHelperError>
where
    P: MetadataProvider,
    C: FnMut(&str) -> io::Result<bool>,
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::Started {
        tvdb_id,
        base_path: base_path.to_path_buf(),
    });

    progress_callback(ProgressEvent::FetchingSeries { tvdb_id });
    let series = provider.fetch_series(tvdb_id, with_seasons)?;
    info!(tvdb_id, name = %series.name, "Fetched series");

    progress_callback(ProgressEvent::SeriesFetched {
        series_name: series.name.clone(),
        season_count: series.seasons.len(),
    });

    let (seasons, episodes) = if with_seasons {
        (series.season_numbers(), season_episodes(&series))
    } else {
        (BTreeSet::new(), BTreeMap::new())
    };

    let show_path = reconcile_show_folder(
        base_path,
        &series.name,
        tvdb_id,
        &seasons,
        confirm,
        &mut progress_callback,
    )?;

    let metadata_path = write_show_details(&show_path, &series, &episodes)?;
    progress_callback(ProgressEvent::MetadataWritten {
        path: metadata_path,
    });

    progress_callback(ProgressEvent::Complete {
        show_path: show_path.clone(),
    });

    Ok(show_path)
}
