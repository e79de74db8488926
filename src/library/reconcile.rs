use super::model::{Episode, EpisodeConfig, PlaylistConfig, Title, TitleConfig};

/// Lays stored progress over a fresh scan.
///
/// The scan decides which episodes exist and in what order; the stored list
/// only contributes progress for paths that are still present. Stored entries
/// for deleted files are dropped, so the result always has `fresh.len()`
/// items.
pub(crate) fn match_episodes(fresh: Vec<Episode>, stored: &[Episode]) -> Vec<Episode> {
    fresh
        .into_iter()
        .map(|episode| {
            stored
                .iter()
                .find(|candidate| candidate.path == episode.path)
                .cloned()
                .unwrap_or(episode)
        })
        .collect()
}

/// Folds incoming episodes into a stored list. Matching paths keep the larger
/// progress and stay completed once either side is; unknown paths are
/// appended.
pub(crate) fn update_episodes(stored: &mut Vec<Episode>, incoming: &[Episode]) {
    for episode in incoming {
        match stored
            .iter_mut()
            .find(|candidate| candidate.path == episode.path)
        {
            Some(existing) => {
                existing.progress = existing.progress.max(episode.progress);
                existing.completed = existing.completed || episode.completed;
            }
            None => stored.push(episode.clone()),
        }
    }
}

impl PlaylistConfig {
    /// Records a visit to `title`.
    ///
    /// A known title has `incoming` merged into its stored episodes and its
    /// index raised to the larger of the two; the merged config is returned.
    /// An unknown title is appended with index 0 and `incoming` is returned
    /// as given.
    ///
    /// The raised index is not checked against the episode count. Use
    /// [`EpisodeConfig::clamped_index`] before handing it to a player.
    pub(crate) fn update_titles(&mut self, title: &Title, incoming: EpisodeConfig) -> EpisodeConfig {
        match self.titles.iter_mut().find(|config| config.title == *title) {
            Some(stored) => {
                let config = &mut stored.episode_config;
                config.index = config.index.max(incoming.index);
                update_episodes(&mut config.episodes, &incoming.episodes);
                config.clone()
            }
            None => {
                self.titles.push(TitleConfig {
                    title: title.clone(),
                    episode_config: EpisodeConfig::new(0, incoming.episodes.clone()),
                });
                incoming
            }
        }
    }

    pub(crate) fn update_previous(&mut self, previous: EpisodeConfig) {
        self.previous = previous;
    }
}
