use thiserror::Error;
use tracing::{debug, info};

use crate::library::{
    AppConfig, Episode, EpisodeConfig, ExtensionFilter, PlaylistConfig, Title,
    match_episodes, scan_episodes, scan_titles,
};
use crate::store::{StoreError, save_playlist_config};

#[derive(Debug, Error)]
pub(crate) enum ControlError {
    #[error("no title is selected")]
    NoTitleSelected,
    #[error("no episodes were selected")]
    EmptySelection,
    #[error("start position {start} is outside the {len} selected episode(s)")]
    StartOutOfRange { start: usize, len: usize },
    #[error("nothing has been played yet")]
    NothingToResume,
    #[error("no playback session is active")]
    NoSession,
    #[error("episode {0} is not part of the current playlist")]
    UnknownEpisode(String),
    #[error("progress must be a finite, non-negative number (got {0})")]
    InvalidProgress(f64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything a front end can ask of the library.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    ScanTitles,
    SelectTitle(Title),
    SelectEpisodes {
        episodes: Vec<Episode>,
        start: usize,
    },
    StartPrevious,
    ReportProgress {
        path: String,
        progress: f64,
        completed: bool,
    },
    StopPlayback,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Titles(Vec<Title>),
    Episodes(Vec<Episode>),
    Playback(EpisodeConfig),
    Progress(Episode),
    Stopped { saved: bool },
}

/// The playlist handed to the player, with the title it was picked from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlaybackSession {
    pub(crate) title: Option<Title>,
    pub(crate) playlist: EpisodeConfig,
}

/// Owns the watch record for the life of the process. Front ends only send
/// actions; every state change flows through [`Controller::dispatch`].
pub(crate) struct Controller {
    settings: AppConfig,
    filter: ExtensionFilter,
    record: PlaylistConfig,
    selected_title: Option<Title>,
    session: Option<PlaybackSession>,
}

impl Controller {
    pub(crate) fn new(settings: AppConfig, record: PlaylistConfig) -> Self {
        let filter = ExtensionFilter::new(settings.extensions.iter().cloned());
        Self {
            settings,
            filter,
            record,
            selected_title: None,
            session: None,
        }
    }

    pub(crate) fn settings(&self) -> &AppConfig {
        &self.settings
    }

    pub(crate) fn record(&self) -> &PlaylistConfig {
        &self.record
    }

    pub(crate) fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub(crate) fn dispatch(&mut self, action: Action) -> Result<Outcome, ControlError> {
        debug!(?action, "dispatch");
        match action {
            Action::ScanTitles => Ok(Outcome::Titles(self.scan_titles())),
            Action::SelectTitle(title) => Ok(Outcome::Episodes(self.select_title(title))),
            Action::SelectEpisodes { episodes, start } => {
                self.select_episodes(episodes, start).map(Outcome::Playback)
            }
            Action::StartPrevious => self.start_previous().map(Outcome::Playback),
            Action::ReportProgress {
                path,
                progress,
                completed,
            } => self
                .report_progress(&path, progress, completed)
                .map(Outcome::Progress),
            Action::StopPlayback => self.stop_playback().map(|saved| Outcome::Stopped { saved }),
        }
    }

    fn scan_titles(&self) -> Vec<Title> {
        scan_titles(&self.settings.search_roots, &self.filter)
    }

    fn select_title(&mut self, title: Title) -> Vec<Episode> {
        let fresh = scan_episodes(&title, &self.filter);
        let episodes = match_episodes(fresh, self.record.stored_episodes(&title));
        self.selected_title = Some(title);
        episodes
    }

    fn select_episodes(
        &mut self,
        episodes: Vec<Episode>,
        start: usize,
    ) -> Result<EpisodeConfig, ControlError> {
        let title = self
            .selected_title
            .clone()
            .ok_or(ControlError::NoTitleSelected)?;
        if episodes.is_empty() {
            return Err(ControlError::EmptySelection);
        }
        if start >= episodes.len() {
            return Err(ControlError::StartOutOfRange {
                start,
                len: episodes.len(),
            });
        }

        let playlist = EpisodeConfig::new(start, episodes);
        self.record.update_titles(&title, playlist.clone());
        self.record.update_previous(playlist.clone());
        self.save_record()?;

        info!(title = %title.name, episodes = playlist.episodes.len(), "starting playback");
        Ok(self.begin_session(Some(title), playlist))
    }

    fn start_previous(&mut self) -> Result<EpisodeConfig, ControlError> {
        let previous = &self.record.previous;
        if previous.is_empty() {
            return Err(ControlError::NothingToResume);
        }
        let title = previous.episodes.first().map(|episode| episode.title.clone());
        let mut playlist = previous.clone();
        playlist.index = playlist.clamped_index();
        Ok(self.begin_session(title, playlist))
    }

    fn begin_session(&mut self, title: Option<Title>, playlist: EpisodeConfig) -> EpisodeConfig {
        self.session = Some(PlaybackSession {
            title,
            playlist: playlist.clone(),
        });
        playlist
    }

    /// Applies one report from the player. Progress is only ever raised so a
    /// late or replayed report cannot undo watched time.
    fn report_progress(
        &mut self,
        path: &str,
        progress: f64,
        completed: bool,
    ) -> Result<Episode, ControlError> {
        if !progress.is_finite() || progress < 0.0 {
            return Err(ControlError::InvalidProgress(progress));
        }
        let session = self.session.as_mut().ok_or(ControlError::NoSession)?;
        let position = session
            .playlist
            .position_of(path)
            .ok_or_else(|| ControlError::UnknownEpisode(path.to_string()))?;

        session.playlist.index = position;
        let episode = &mut session.playlist.episodes[position];
        episode.progress = episode.progress.max(progress);
        episode.completed = episode.completed || completed;
        Ok(episode.clone())
    }

    /// Writes the active session into the record. Returns `false` without
    /// touching the disk when nothing is playing.
    pub(crate) fn save_progress(&mut self) -> Result<bool, ControlError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(false);
        };

        self.record.update_previous(session.playlist.clone());
        if let Some(title) = &session.title {
            self.record.update_titles(title, session.playlist.clone());
        }
        self.save_record()?;
        Ok(true)
    }

    fn stop_playback(&mut self) -> Result<bool, ControlError> {
        let saved = self.save_progress()?;
        self.session = None;
        Ok(saved)
    }

    /// Final save before exit.
    pub(crate) fn shutdown(mut self) -> Result<bool, ControlError> {
        self.save_progress()
    }

    fn save_record(&self) -> Result<(), ControlError> {
        save_playlist_config(&self.settings.playlist_file, &self.record)?;
        Ok(())
    }
}

impl Outcome {
    pub(crate) fn into_titles(self) -> Option<Vec<Title>> {
        match self {
            Self::Titles(titles) => Some(titles),
            _ => None,
        }
    }

    pub(crate) fn into_episodes(self) -> Option<Vec<Episode>> {
        match self {
            Self::Episodes(episodes) => Some(episodes),
            _ => None,
        }
    }

    pub(crate) fn into_playback(self) -> Option<EpisodeConfig> {
        match self {
            Self::Playback(playlist) => Some(playlist),
            _ => None,
        }
    }
}
