use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::model::{Episode, Title};

/// Accepted file suffixes, stored with their leading dot (`.mkv`).
///
/// Suffixes compare exactly as stored. Whatever case the filesystem reports is
/// what gets matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    pub(crate) fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a comma separated list such as `".mkv, .mp4"`. All whitespace is
    /// dropped and empty items are ignored.
    pub(crate) fn parse_list(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
        Self::new(
            compact
                .split(',')
                .filter(|item| !item.is_empty())
                .map(str::to_string),
        )
    }

    pub(crate) fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub(crate) fn matches(&self, file_name: &str) -> bool {
        file_suffix(file_name).is_some_and(|suffix| self.extensions.contains(&suffix))
    }
}

fn file_suffix(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// Finds every folder directly under a search root that holds at least one
/// matching file. Unreadable roots are logged and skipped. Results come back
/// in directory order, which is not sorted.
pub(crate) fn scan_titles(search_roots: &[String], filter: &ExtensionFilter) -> Vec<Title> {
    let mut titles = Vec::new();

    for root in search_roots {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(root = %root, error = %err, "failed to read search root");
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %path.display(), "skipping folder with non UTF-8 name");
                continue;
            };
            if folder_has_match(&path, filter) {
                titles.push(Title::new(name, root.clone()));
            } else {
                debug!(path = %path.display(), "no matching files, not a title");
            }
        }
    }

    titles
}

fn folder_has_match(dir: &Path, filter: &ExtensionFilter) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "failed to read title folder");
            return false;
        }
    };

    entries.flatten().any(|entry| {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| filter.matches(name))
            && entry.path().is_file()
    })
}

/// Lists the matching files directly inside a title's folder as fresh
/// episodes with no progress. An unreadable folder yields no episodes.
pub(crate) fn scan_episodes(title: &Title, filter: &ExtensionFilter) -> Vec<Episode> {
    let dir = title.folder();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "failed to read title folder");
            return Vec::new();
        }
    };

    let mut episodes = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(name) = entry.file_name().into_string() else {
            debug!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if !filter.matches(&name) || !path.is_file() {
            continue;
        }
        let full_path = path.to_string_lossy().into_owned();
        episodes.push(Episode::discovered(title, name, full_path));
    }
    episodes
}
