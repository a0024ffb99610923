//! TVDB v4 metadata provider implementation.
use super::tvdb_types::{
    TvdbEpisode, TvdbLoginRequest, TvdbResponse, TvdbSeriesExtended, TvdbToken,
};
use super::{Episode, MetadataProvider, MetadataRetrievalError, Season, TvSeries};
use crate::config::Config;
use reqwest::blocking::Response;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Metadata provider for the TVDB v4 API.
///
/// Every fetch performs a fresh login followed by a single request to the
/// extended series endpoint. Tokens are never reused across fetches.
pub struct TvdbProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    pin: Option<String>,
}

impl TvdbProvider {
    /// Creates a new TVDB provider from the resolved configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::blocking::Client::new(), config)
    }

    /// Creates a provider that sends its requests through the given client.
    pub fn with_client(client: reqwest::blocking::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            pin: config.pin.clone(),
        }
    }

    /// Logs in with the configured API key and returns the bearer token.
    pub fn authenticate(&self) -> Result<String, MetadataRetrievalError> {
        let url = format!("{}/login", self.base_url);
        debug!(%url, "Authenticating with TVDB");

        let response = self
            .client
            .post(&url)
            .json(&TvdbLoginRequest {
                apikey: &self.api_key,
                pin: self.pin.as_deref(),
            })
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MetadataRetrievalError::AuthenticationFailed(
                status_line(&response),
            ));
        }

        let body: TvdbResponse<TvdbToken> = response.json().map_err(|e| {
            MetadataRetrievalError::AuthenticationFailed(format!("Malformed login response: {e}"))
        })?;

        body.data
            .and_then(|data| data.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                MetadataRetrievalError::AuthenticationFailed(
                    "Login response did not contain a token".to_string(),
                )
            })
    }

    /// Fetches the extended record of a series using an existing token.
    pub fn fetch_series_with_token(
        &self,
        tvdb_id: u64,
        token: &str,
        include_episodes: bool,
    ) -> Result<TvSeries, MetadataRetrievalError> {
        let url = format!("{}/series/{}/extended", self.base_url, tvdb_id);
        debug!(%url, include_episodes, "Fetching series");

        let mut request = self.client.get(&url).bearer_auth(token);
        if include_episodes {
            request = request.query(&[("meta", "episodes"), ("short", "true")]);
        }

        let response = request
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        if response.status() == 404 {
            return Err(MetadataRetrievalError::SeriesNotFound(tvdb_id));
        }

        if !response.status().is_success() {
            return Err(MetadataRetrievalError::RequestError(status_line(&response)));
        }

        let body: TvdbResponse<TvdbSeriesExtended> = response
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))?;

        let series = body.data.ok_or_else(|| {
            MetadataRetrievalError::ParseError("Response did not contain series data".to_string())
        })?;

        Ok(Self::convert_to_series(series))
    }

    /// Converts a TVDB episode to our internal Episode structure.
    fn convert_episode(tvdb_episode: TvdbEpisode) -> Episode {
        Episode {
            season_number: tvdb_episode.season_number,
            episode_number: tvdb_episode.number,
            name: tvdb_episode.name.unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Converts an extended TVDB record to our internal TvSeries structure.
    ///
    /// Only seasons of the official ordering are kept. Seasons referenced by
    /// episodes are added even when the season list does not mention them.
    fn convert_to_series(tvdb_series: TvdbSeriesExtended) -> TvSeries {
        let mut seasons_map: BTreeMap<u32, Vec<Episode>> = BTreeMap::new();

        for season in tvdb_series.seasons.unwrap_or_default() {
            let official = season
                .season_type
                .as_ref()
                .and_then(|t| t.kind.as_deref())
                .is_none_or(|kind| kind == "official");

            if official {
                seasons_map.entry(season.number).or_default();
            }
        }

        for tvdb_episode in tvdb_series.episodes.unwrap_or_default() {
            seasons_map
                .entry(tvdb_episode.season_number)
                .or_default()
                .push(Self::convert_episode(tvdb_episode));
        }

        let seasons = seasons_map
            .into_iter()
            .map(|(season_number, mut episodes)| {
                episodes.sort_by_key(|e| e.episode_number);
                Season {
                    season_number,
                    episodes,
                }
            })
            .collect();

        TvSeries {
            id: tvdb_series.id,
            name: tvdb_series.name,
            overview: tvdb_series.overview,
            seasons,
        }
    }
}

impl MetadataProvider for TvdbProvider {
    fn fetch_series(
        &self,
        tvdb_id: u64,
        include_episodes: bool,
    ) -> Result<TvSeries, MetadataRetrievalError> {
        let token = self.authenticate()?;
        info!(tvdb_id, "Authenticated with TVDB");
        self.fetch_series_with_token(tvdb_id, &token, include_episodes)
    }
}

fn status_line(response: &Response) -> String {
    format!(
        "HTTP {} {}",
        response.status().as_u16(),
        response.status().canonical_reason().unwrap_or("Unknown")
    )
}
