use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::library::{AppConfig, PlaylistConfig};

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to read {}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to create directory {}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("malformed record in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode {}", .path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads the settings file, writing a synthesized default first when it does
/// not exist yet. The default places the record file next to the settings.
pub(crate) fn load_app_config(path: &Path) -> Result<AppConfig, StoreError> {
    if let Some(config) = read_json(path)? {
        return Ok(config);
    }

    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = AppConfig::synthesized(config_dir);
    save_app_config(path, &config)?;
    info!(path = %path.display(), "wrote default settings");
    Ok(config)
}

pub(crate) fn save_app_config(path: &Path, config: &AppConfig) -> Result<(), StoreError> {
    write_json(path, config)
}

/// Loads the watch record. A missing file is replaced by an empty record that
/// is written immediately; a file that exists but does not parse is an error.
pub(crate) fn load_playlist_config(path: &Path) -> Result<PlaylistConfig, StoreError> {
    if let Some(record) = read_json(path)? {
        return Ok(record);
    }

    let record = PlaylistConfig::default();
    save_playlist_config(path, &record)?;
    info!(path = %path.display(), "wrote empty playlist record");
    Ok(record)
}

pub(crate) fn save_playlist_config(path: &Path, record: &PlaylistConfig) -> Result<(), StoreError> {
    write_json(path, record)?;
    debug!(
        path = %path.display(),
        titles = record.titles.len(),
        previous = record.previous.episodes.len(),
        "saved playlist record"
    );
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut raw = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    raw.push('\n');

    fs::write(path, raw).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Episode, EpisodeConfig, Title, TitleConfig};

    fn sample_record() -> PlaylistConfig {
        let title = Title::new("Show", "/media");
        let first = Episode {
            name: "ep1.mkv".to_string(),
            path: "/media/Show/ep1.mkv".to_string(),
            title: title.clone(),
            progress: 0.8,
            completed: false,
        };
        let second = Episode {
            name: "ep2.mkv".to_string(),
            path: "/media/Show/ep2.mkv".to_string(),
            title: title.clone(),
            progress: 1.0,
            completed: true,
        };
        PlaylistConfig {
            previous: EpisodeConfig::new(1, vec![first.clone(), second.clone()]),
            titles: vec![TitleConfig {
                title,
                episode_config: EpisodeConfig::new(1, vec![first, second]),
            }],
        }
    }

    #[test]
    fn missing_record_is_healed_with_empty_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("playlist.json");

        let record = load_playlist_config(&path).expect("missing record should heal");

        assert_eq!(record, PlaylistConfig::default());
        assert!(path.is_file());
        let raw = fs::read_to_string(&path).expect("record written");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["previous"]["index"], 0);
        assert_eq!(value["titles"], serde_json::json!([]));
    }

    #[test]
    fn record_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("playlist.json");
        let record = sample_record();

        save_playlist_config(&path, &record).expect("save");
        let loaded = load_playlist_config(&path).expect("load");
        assert_eq!(loaded, record);

        save_playlist_config(&path, &loaded).expect("save again");
        assert_eq!(load_playlist_config(&path).expect("reload"), record);
    }

    #[test]
    fn record_uses_camel_case_schema() {
        let value = serde_json::to_value(sample_record()).expect("encode");
        let episode = &value["titles"][0]["episodeConfig"]["episodes"][0];
        assert_eq!(episode["title"]["base"], "/media");
        assert_eq!(episode["path"], "/media/Show/ep1.mkv");
        assert_eq!(value["previous"]["index"], 1);
    }

    #[test]
    fn record_missing_required_field_is_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("playlist.json");
        let raw = r#"{"previous": {"index": 0, "episodes": [{"name": "ep1.mkv", "path": "/a/ep1.mkv", "progress": 0.5, "completed": false}]}, "titles": []}"#;
        fs::write(&path, raw).expect("write");

        let err = load_playlist_config(&path).expect_err("missing title should fail");
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert!(err.to_string().contains("title"));
        assert_eq!(fs::read_to_string(&path).expect("untouched"), raw);
    }

    #[test]
    fn record_with_negative_index_is_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("playlist.json");
        fs::write(&path, r#"{"previous": {"index": -1, "episodes": []}, "titles": []}"#)
            .expect("write");

        assert!(matches!(
            load_playlist_config(&path),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_settings_are_synthesized_and_persisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        let config = load_app_config(&path).expect("default settings");

        assert_eq!(config.playlist_file, dir.path().join("playlist.json"));
        assert!(config.extensions.contains(".mkv"));
        assert!(config.extensions.contains(".mp4"));
        assert_eq!(load_app_config(&path).expect("reload"), config);
    }

    #[test]
    fn settings_accept_legacy_key_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"playlistConfig": "/tmp/q.json", "folders": ["/media"], "extensions": [".mkv"], "statusFile": "/tmp/s.json"}"#,
        )
        .expect("write");

        let config = load_app_config(&path).expect("legacy settings");
        assert_eq!(config.playlist_file, PathBuf::from("/tmp/q.json"));
        assert_eq!(config.search_roots, vec!["/media".to_string()]);

        let value = serde_json::to_value(&config).expect("encode");
        assert_eq!(value["playlistFile"], "/tmp/q.json");
        assert_eq!(value["searchRoots"][0], "/media");
    }

    #[test]
    fn settings_missing_field_is_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"searchRoots": [], "extensions": []}"#).expect("write");

        assert!(matches!(
            load_app_config(&path),
            Err(StoreError::Malformed { .. })
        ));
    }
}
