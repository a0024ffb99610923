//! TVDB v4 API request and response types.
//!
//! These structures mirror the JSON format of the TVDB v4 API. Every response
//! wraps its payload in a `data` envelope.
use serde::{Deserialize, Serialize};

/// Request body of the login endpoint.
#[derive(Debug, Serialize)]
pub(super) struct TvdbLoginRequest<'a> {
    pub apikey: &'a str,
    /// Subscriber PIN, only needed for user-supported keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<&'a str>,
}

/// The `{ "status": ..., "data": ... }` envelope around every payload.
#[derive(Debug, Deserialize)]
pub(super) struct TvdbResponse<T> {
    pub data: Option<T>,
}

/// Payload of a successful login.
#[derive(Debug, Deserialize)]
pub(super) struct TvdbToken {
    pub token: Option<String>,
}

/// Payload of the extended series endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvdbSeriesExtended {
    pub id: u64,
    pub name: String,
    pub overview: Option<String>,
    /// Seasons in every ordering the catalog knows (official, dvd, absolute, ...)
    #[serde(default)]
    pub seasons: Option<Vec<TvdbSeason>>,
    /// Only present when requested with `meta=episodes`
    #[serde(default)]
    pub episodes: Option<Vec<TvdbEpisode>>,
}

/// A season entry of an extended series record.
#[derive(Debug, Deserialize)]
pub(super) struct TvdbSeason {
    pub number: u32,
    #[serde(rename = "type")]
    pub season_type: Option<TvdbSeasonType>,
}

/// The ordering a season belongs to.
#[derive(Debug, Deserialize)]
pub(super) struct TvdbSeasonType {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A single episode of an extended series record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TvdbEpisode {
    /// Season number (0 for specials)
    pub season_number: u32,
    /// Episode number within the season
    pub number: u32,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
}
