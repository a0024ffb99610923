//! Metadata sidecar writer
//!
//! Persists the fetched series details as `show_details.json` inside the show
//! folder, pretty-printed with four-space indentation.

use crate::folder_reconciler::season_folder_name;
use crate::metadata_retrieval::{Episode, TvSeries};
use crate::temp::create_temp_file_in;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the metadata sidecar
pub const METADATA_FILE_NAME: &str = "show_details.json";

/// Overview written when the catalog has none
pub const NO_OVERVIEW: &str = "No overview available";

/// Errors that can occur while writing the metadata sidecar
#[derive(Debug, Error)]
pub enum MetadataWriteError {
    /// The show folder does not exist
    #[error("Show folder does not exist: {0}")]
    FolderMissing(PathBuf),

    /// Writing the file failed
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serializing the document failed
    #[error("Failed to serialize show details: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The document stored in `show_details.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    /// Display name of the series
    pub show: String,
    pub tvdb: TvdbDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvdbDetails {
    pub id: u64,
    pub overview: String,
    /// Keyed by season label, e.g. `Season 01`
    pub seasons: BTreeMap<String, SeasonDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetails {
    pub episode_count: usize,
    pub episodes: Vec<EpisodeDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDetails {
    pub episode_name: String,
    pub aired_episode_number: u32,
}

impl ShowDetails {
    /// Builds the sidecar document for a series and its season mapping
    pub fn new(series: &TvSeries, season_episodes: &BTreeMap<u32, Vec<Episode>>) -> Self {
        let seasons = season_episodes
            .iter()
            .map(|(season, episodes)| {
                let details = SeasonDetails {
                    episode_count: episodes.len(),
                    episodes: episodes
                        .iter()
                        .map(|episode| EpisodeDetails {
                            episode_name: episode.name.clone(),
                            aired_episode_number: episode.episode_number,
                        })
                        .collect(),
                };
                (season_folder_name(*season), details)
            })
            .collect();

        Self {
            show: series.name.clone(),
            tvdb: TvdbDetails {
                id: series.id,
                overview: series
                    .overview
                    .clone()
                    .unwrap_or_else(|| NO_OVERVIEW.to_string()),
                seasons,
            },
        }
    }

    /// Serializes the document as JSON indented with four spaces
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        Ok(buffer)
    }
}

/// Writes `show_details.json` into `show_path`, replacing any existing file
///
/// The document is staged in a temporary file in the same folder and renamed
/// over the destination, so readers never observe a partially written file.
///
/// # Returns
///
/// The path of the written file
pub fn write_show_details(
    show_path: &Path,
    series: &TvSeries,
    season_episodes: &BTreeMap<u32, Vec<Episode>>,
) -> Result<PathBuf, MetadataWriteError> {
    if !show_path.is_dir() {
        return Err(MetadataWriteError::FolderMissing(show_path.to_path_buf()));
    }

    let destination = show_path.join(METADATA_FILE_NAME);
    let contents = ShowDetails::new(series, season_episodes).to_pretty_json()?;

    let write_failed = |source| MetadataWriteError::WriteFailed {
        path: destination.clone(),
        source,
    };

    let temp = create_temp_file_in(show_path, "show_details", "json").map_err(write_failed)?;
    fs::write(temp.path(), &contents).map_err(write_failed)?;
    temp.persist(&destination).map_err(write_failed)?;

    debug!(path = %destination.display(), bytes = contents.len(), "Wrote show details");

    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata_retrieval::{Season, season_episodes};
    use crate::temp::create_temp_dir;
    use serde_json::Value;

    fn series(overview: Option<&str>) -> TvSeries {
        TvSeries {
            id: 12345,
            name: "Foo: Bar".to_string(),
            overview: overview.map(str::to_string),
            seasons: vec![],
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_writes_required_keys_with_empty_seasons() {
        let dir = create_temp_dir("writer_test").unwrap();

        let path = write_show_details(&dir, &series(None), &BTreeMap::new()).unwrap();

        assert_eq!(path, dir.join("show_details.json"));
        let json = read_json(&path);
        assert_eq!(json["show"], "Foo: Bar");
        assert_eq!(json["tvdb"]["id"], 12345);
        assert_eq!(json["tvdb"]["overview"], NO_OVERVIEW);
        assert_eq!(json["tvdb"]["seasons"], serde_json::json!({}));
    }

    #[test]
    fn test_keeps_upstream_overview() {
        let details = ShowDetails::new(&series(Some("A show.")), &BTreeMap::new());
        assert_eq!(details.tvdb.overview, "A show.");
    }

    #[test]
    fn test_uses_four_space_indentation() {
        let details = ShowDetails::new(&series(Some("A show.")), &BTreeMap::new());
        let text = String::from_utf8(details.to_pretty_json().unwrap()).unwrap();

        assert_eq!(
            text,
            "{\n    \"show\": \"Foo: Bar\",\n    \"tvdb\": {\n        \"id\": 12345,\n        \"overview\": \"A show.\",\n        \"seasons\": {}\n    }\n}"
        );
    }

    #[test]
    fn test_season_labels_match_folder_names() {
        let mapping = BTreeMap::from([(0, vec![]), (12, vec![])]);

        let details = ShowDetails::new(&series(None), &mapping);

        let labels: Vec<&String> = details.tvdb.seasons.keys().collect();
        assert_eq!(labels, vec![&season_folder_name(0), &season_folder_name(12)]);
        assert_eq!(labels, vec!["Season 00", "Season 12"]);
    }

    #[test]
    fn test_season_entries() {
        let mut full = series(None);
        full.seasons = vec![
            Season {
                season_number: 1,
                episodes: vec![
                    Episode {
                        season_number: 1,
                        episode_number: 1,
                        name: "Pilot".to_string(),
                    },
                    Episode {
                        season_number: 1,
                        episode_number: 2,
                        name: "Second".to_string(),
                    },
                ],
            },
            Season {
                season_number: 2,
                episodes: vec![],
            },
        ];

        let details = ShowDetails::new(&full, &season_episodes(&full));
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(json["tvdb"]["seasons"]["Season 01"]["episode_count"], 2);
        assert_eq!(
            json["tvdb"]["seasons"]["Season 01"]["episodes"][1],
            serde_json::json!({"episodeName": "Second", "airedEpisodeNumber": 2})
        );
        assert_eq!(json["tvdb"]["seasons"]["Season 02"]["episode_count"], 0);
        assert_eq!(
            json["tvdb"]["seasons"]["Season 02"]["episodes"],
            serde_json::json!([])
        );
    }

    #[test]
    fn test_overwrites_existing_file_without_leftovers() {
        let dir = create_temp_dir("writer_test").unwrap();
        fs::write(dir.join(METADATA_FILE_NAME), "stale").unwrap();

        write_show_details(&dir, &series(None), &BTreeMap::new()).unwrap();

        let json = read_json(&dir.join(METADATA_FILE_NAME));
        assert_eq!(json["tvdb"]["id"], 12345);

        let entries: Vec<_> = fs::read_dir(&*dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_folder() {
        let dir = create_temp_dir("writer_test").unwrap();
        let missing = dir.join("Foo Bar {tvdb-12345}");

        let result = write_show_details(&missing, &series(None), &BTreeMap::new());

        assert!(matches!(result, Err(MetadataWriteError::FolderMissing(p)) if p == missing));
        assert!(!missing.exists());
    }
}
