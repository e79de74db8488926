use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A show folder found directly under one of the configured search roots.
///
/// Two titles are the same title only when both the folder name and the root
/// match byte for byte; no path normalization happens anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) struct Title {
    pub(crate) name: String,
    pub(crate) base: String,
}

impl Title {
    pub(crate) fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
        }
    }

    pub(crate) fn folder(&self) -> PathBuf {
        Path::new(&self.base).join(&self.name)
    }
}

/// One playable file. `path` is the identity used to join scans with the
/// stored record, so a renamed or moved file starts over with no progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Episode {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) title: Title,
    pub(crate) progress: f64,
    pub(crate) completed: bool,
}

impl Episode {
    pub(crate) fn discovered(title: &Title, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            title: title.clone(),
            progress: 0.0,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum PlaylistError {
    #[error("playlist has no episodes")]
    Empty,
    #[error("playlist index {index} is out of range for {len} episode(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// An ordered episode list plus the position that was played last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct EpisodeConfig {
    pub(crate) index: usize,
    pub(crate) episodes: Vec<Episode>,
}

impl EpisodeConfig {
    pub(crate) fn new(index: usize, episodes: Vec<Episode>) -> Self {
        Self { index, episodes }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub(crate) fn current_episode(&self) -> Result<&Episode, PlaylistError> {
        if self.episodes.is_empty() {
            return Err(PlaylistError::Empty);
        }
        self.episodes
            .get(self.index)
            .ok_or(PlaylistError::IndexOutOfRange {
                index: self.index,
                len: self.episodes.len(),
            })
    }

    /// Index pulled back inside the list. A merged title can carry an index
    /// raised past the episodes that still exist on disk.
    pub(crate) fn clamped_index(&self) -> usize {
        self.index.min(self.episodes.len().saturating_sub(1))
    }

    pub(crate) fn position_of(&self, path: &str) -> Option<usize> {
        self.episodes.iter().position(|episode| episode.path == path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TitleConfig {
    pub(crate) title: Title,
    pub(crate) episode_config: EpisodeConfig,
}

/// The durable watch record: the last played set plus one entry per title
/// that was ever opened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlaylistConfig {
    pub(crate) previous: EpisodeConfig,
    pub(crate) titles: Vec<TitleConfig>,
}

impl PlaylistConfig {
    pub(crate) fn title_config(&self, title: &Title) -> Option<&TitleConfig> {
        self.titles.iter().find(|config| config.title == *title)
    }

    pub(crate) fn stored_episodes(&self, title: &Title) -> &[Episode] {
        self.title_config(title)
            .map(|config| config.episode_config.episodes.as_slice())
            .unwrap_or_default()
    }
}

pub(crate) const DEFAULT_EXTENSIONS: [&str; 2] = [".mkv", ".mp4"];
pub(crate) const PLAYLIST_FILE_NAME: &str = "playlist.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AppConfig {
    #[serde(rename = "playlistFile", alias = "playlistConfig")]
    pub(crate) playlist_file: PathBuf,
    #[serde(rename = "searchRoots", alias = "folders")]
    pub(crate) search_roots: Vec<String>,
    pub(crate) extensions: BTreeSet<String>,
}

impl AppConfig {
    pub(crate) fn synthesized(config_dir: &Path) -> Self {
        let search_roots = dirs::video_dir()
            .and_then(|dir| dir.to_str().map(str::to_string))
            .into_iter()
            .collect();
        Self {
            playlist_file: config_dir.join(PLAYLIST_FILE_NAME),
            search_roots,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}
