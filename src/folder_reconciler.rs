//! Show folder reconciliation
//!
//! Makes sure a base directory contains exactly one folder for a series, named
//! `<Series Name> {tvdb-<ID>}`. An existing untagged folder whose name starts
//! with the series name can be renamed in place after the operator confirms it;
//! otherwise the folder is created.

use crate::ProgressEvent;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Substring that marks a folder as already tagged with a catalog ID
const TVDB_MARKER: &str = "{tvdb-";

/// Errors that can occur while reconciling the show folder
#[derive(Debug, Error)]
pub enum FolderError {
    /// Base path is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to list the base directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to create the show or a season folder
    #[error("Failed to create folder {path}: {source}")]
    CreateFailed { path: PathBuf, source: io::Error },

    /// Failed to rename the existing folder
    #[error("Failed to rename {from} to {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// The confirmation prompt could not be answered
    #[error("Failed to read confirmation: {0}")]
    PromptFailed(io::Error),
}

/// Removes colons from a series name
///
/// No other characters are touched.
pub fn clean_show_name(show_name: &str) -> String {
    show_name.replace(':', "")
}

/// Formats the folder name for a series: `<cleaned name> {tvdb-<id>}`
pub fn show_folder_name(show_name: &str, tvdb_id: u64) -> String {
    format!("{} {{tvdb-{}}}", clean_show_name(show_name), tvdb_id)
}

/// Formats the folder name for a season: `Season <NN>`
pub fn season_folder_name(season: u32) -> String {
    format!("Season {:02}", season)
}

/// Finds an existing untagged folder that may belong to the series
///
/// Returns the first immediate subdirectory of `base_path`, in directory
/// listing order, whose name starts with `cleaned_name` and does not contain
/// the `{tvdb-` marker. Entries that are not directories or whose names are
/// not valid UTF-8 are skipped.
pub fn find_candidate_folder(
    base_path: &Path,
    cleaned_name: &str,
) -> Result<Option<String>, FolderError> {
    if !base_path.is_dir() {
        return Err(FolderError::NotADirectory(base_path.to_path_buf()));
    }

    let entries = fs::read_dir(base_path).map_err(|e| FolderError::ReadDirectoryFailed {
        path: base_path.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| FolderError::ReadDirectoryFailed {
            path: base_path.to_path_buf(),
            source: e,
        })?;

        if !entry.path().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        if name.starts_with(cleaned_name) && !name.contains(TVDB_MARKER) {
            return Ok(Some(name));
        }
    }

    Ok(None)
}

/// Reconciles the show folder for a series inside `base_path`
///
/// When an untagged candidate folder exists, `confirm` is asked whether it is
/// the right folder and then whether to rename it to the tagged name. Without
/// a candidate, the tagged folder is created (a no-op if it already exists).
/// Season folders are then created inside the show folder, but only if the
/// show folder exists at that point, so declining a prompt never touches the
/// filesystem.
///
/// # Arguments
///
/// * `base_path` - Directory that holds the show folders
/// * `show_name` - Display name of the series
/// * `tvdb_id` - Catalog ID of the series
/// * `seasons` - Season numbers to create folders for
/// * `confirm` - Asked yes/no questions; returns the operator's answer
/// * `progress_callback` - Receives folder events
///
/// # Returns
///
/// The path of the tagged show folder. It does not exist on disk when the
/// operator declined to confirm or rename an existing candidate.
pub fn reconcile_show_folder<C, F>(
    base_path: &Path,
    show_name: &str,
    tvdb_id: u64,
    seasons: &BTreeSet<u32>,
    mut confirm: C,
    mut progress_callback: F,
) -> Result<PathBuf, FolderError>
where
    C: FnMut(&str) -> io::Result<bool>,
    F: FnMut(ProgressEvent),
{
    let cleaned_name = clean_show_name(show_name);
    let folder_name = show_folder_name(show_name, tvdb_id);
    let show_path = base_path.join(&folder_name);

    match find_candidate_folder(base_path, &cleaned_name)? {
        Some(candidate) => {
            debug!(%candidate, "Found untagged candidate folder");
            let candidate_path = base_path.join(&candidate);

            let is_correct = confirm(&format!(
                "Folder '{}' exists. Is this the correct folder?",
                candidate
            ))
            .map_err(FolderError::PromptFailed)?;

            if !is_correct {
                progress_callback(ProgressEvent::NoFolderChanges);
            } else if confirm(&format!(
                "Do you want to update the folder to '{}'?",
                folder_name
            ))
            .map_err(FolderError::PromptFailed)?
            {
                progress_callback(ProgressEvent::RenamingFolder {
                    from: candidate_path.clone(),
                    to: show_path.clone(),
                });
                fs::rename(&candidate_path, &show_path).map_err(|e| {
                    FolderError::RenameFailed {
                        from: candidate_path,
                        to: show_path.clone(),
                        source: e,
                    }
                })?;
            } else {
                progress_callback(ProgressEvent::FolderNotUpdated {
                    folder: candidate_path,
                });
            }
        }
        None => {
            progress_callback(ProgressEvent::CreatingFolder {
                path: show_path.clone(),
            });
            fs::create_dir_all(&show_path).map_err(|e| FolderError::CreateFailed {
                path: show_path.clone(),
                source: e,
            })?;
        }
    }

    if !show_path.is_dir() {
        if !seasons.is_empty() {
            warn!(
                path = %show_path.display(),
                "Show folder does not exist, skipping season folders"
            );
        }
        return Ok(show_path);
    }

    for season in seasons {
        let season_path = show_path.join(season_folder_name(*season));
        fs::create_dir_all(&season_path).map_err(|e| FolderError::CreateFailed {
            path: season_path.clone(),
            source: e,
        })?;
        progress_callback(ProgressEvent::SeasonFolderCreated { path: season_path });
    }

    Ok(show_path)
}
