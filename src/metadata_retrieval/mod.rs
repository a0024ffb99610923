//! Data structures and traits for TV series metadata retrieval.
//!
//! This module provides structures to represent TV series, seasons, and episodes
//! as returned by the catalog, the provider trait used by the pipeline, and the
//! explicit extraction step that turns a fetched series into the season set and
//! season-to-episodes mapping consumed by the folder reconciler and the
//! metadata writer.
mod tvdb;
mod tvdb_types;

pub use tvdb::TvdbProvider;

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// Login was rejected or returned no token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Request to the metadata provider failed
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The requested series was not found
    #[error("Series not found: {0}")]
    SeriesNotFound(u64),
}

/// Represents a single episode of a TV series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// The season number this episode belongs to
    pub season_number: u32,
    /// The episode number within the season
    pub episode_number: u32,
    /// The episode title
    pub name: String,
}

/// Represents a season of a TV series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    /// The season number
    pub season_number: u32,
    /// List of episodes in this season, empty unless episodes were requested
    pub episodes: Vec<Episode>,
}

/// Represents a TV series record from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TvSeries {
    /// The catalog identifier
    pub id: u64,
    /// The display name of the TV series
    pub name: String,
    /// Free-text overview, absent when the catalog has none
    pub overview: Option<String>,
    /// List of seasons, sorted by season number
    pub seasons: Vec<Season>,
}

impl TvSeries {
    /// Returns the set of season numbers known for this series.
    pub fn season_numbers(&self) -> BTreeSet<u32> {
        self.seasons.iter().map(|s| s.season_number).collect()
    }
}

/// Builds the season-to-episodes mapping for a fetched series.
///
/// Every known season gets an entry, including seasons without any episodes.
pub fn season_episodes(series: &TvSeries) -> BTreeMap<u32, Vec<Episode>> {
    series
        .seasons
        .iter()
        .map(|season| (season.season_number, season.episodes.clone()))
        .collect()
}

/// Trait for metadata providers that can fetch TV series information.
///
/// Implementors of this trait retrieve a single series record, including
/// whatever authentication the remote catalog requires.
pub trait MetadataProvider {
    /// Fetches metadata for a TV series.
    ///
    /// # Arguments
    ///
    /// * `tvdb_id` - The catalog ID of the series
    /// * `include_episodes` - Whether to request the episode list as well.
    ///                        Without it, seasons carry no episodes.
    ///
    /// # Returns
    ///
    /// A Result containing the TvSeries, or a MetadataRetrievalError
    fn fetch_series(
        &self,
        tvdb_id: u64,
        include_episodes: bool,
    ) -> Result<TvSeries, MetadataRetrievalError>;
}
