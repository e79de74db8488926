mod controller;
mod format;


use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use crate::cli::{Cli, Command, Overrides, TitleArg};
use crate::library::{AppConfig, Episode, EpisodeConfig, ExtensionFilter, Title};
use crate::logging::init_logging;
use crate::paths::settings_file_path;
use crate::store::{load_app_config, load_playlist_config};

use self::controller::{Action, Controller, Outcome};
use self::format::{format_progress, matches_filter, sort_episodes, sort_titles, truncate};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;

    let settings_path = match &cli.overrides.config {
        Some(path) => path.clone(),
        None => settings_file_path()?,
    };
    let mut settings = load_app_config(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    apply_overrides(&mut settings, &cli.overrides);

    let record = load_playlist_config(&settings.playlist_file).with_context(|| {
        format!(
            "failed to load playlist record from {}",
            settings.playlist_file.display()
        )
    })?;
    let mut controller = Controller::new(settings, record);

    match cli.command {
        Some(Command::Titles { filter }) => run_titles(&mut controller, filter.as_deref())?,
        Some(Command::Episodes { title, filter }) => {
            run_episodes(&mut controller, &title, filter.as_deref())?
        }
        Some(Command::Play {
            title,
            episodes,
            all,
            start,
        }) => run_play(&mut controller, &title, &episodes, all, start)?,
        Some(Command::Resume) => run_resume(&mut controller)?,
        Some(Command::Report {
            path,
            progress,
            completed,
        }) => run_report(&mut controller, path, progress, completed)?,
        Some(Command::Config) => run_config(&controller, &settings_path),
        None => run_titles(&mut controller, None)?,
    }

    controller
        .shutdown()
        .context("failed to save playback progress")?;
    Ok(())
}

pub(crate) fn apply_overrides(settings: &mut AppConfig, overrides: &Overrides) {
    if let Some(playlist) = &overrides.playlist {
        settings.playlist_file = playlist.clone();
    }
    if let Some(raw) = &overrides.extensions {
        settings.extensions = ExtensionFilter::parse_list(raw).extensions().clone();
    }
    if !overrides.roots.is_empty() {
        settings.search_roots = overrides.roots.clone();
    }
}

fn run_titles(controller: &mut Controller, filter: Option<&str>) -> Result<()> {
    let mut titles = scan_titles(controller)?;
    titles.retain(|title| matches_filter(&title.name, filter));
    if titles.is_empty() {
        println!("No titles found. Check the search roots with `quickplay config`.");
        return Ok(());
    }

    sort_titles(&mut titles);
    println!("{:<40} {:<40}", "TITLE", "ROOT");
    for title in titles {
        println!(
            "{:<40} {:<40}",
            truncate(&title.name, 40),
            truncate(&title.base, 40)
        );
    }
    Ok(())
}

fn run_episodes(controller: &mut Controller, arg: &TitleArg, filter: Option<&str>) -> Result<()> {
    let title = resolve_title(controller, arg)?;
    let stored_index = controller
        .record()
        .title_config(&title)
        .map(|config| config.episode_config.clamped_index());
    let stored_path = stored_index.and_then(|index| {
        controller
            .record()
            .stored_episodes(&title)
            .get(index)
            .map(|episode| episode.path.clone())
    });

    let mut episodes = select_title(controller, &title)?;
    episodes.retain(|episode| matches_filter(&episode.name, filter));
    if episodes.is_empty() {
        println!("No episodes found in {}.", title.folder().display());
        return Ok(());
    }

    sort_episodes(&mut episodes);
    println!("{:<2} {:<60} {:>10}", "", "EPISODE", "PROGRESS");
    for episode in &episodes {
        let marker = if stored_path.as_deref() == Some(episode.path.as_str()) {
            ">"
        } else {
            ""
        };
        println!(
            "{:<2} {:<60} {:>10}",
            marker,
            truncate(&episode.name, 60),
            format_progress(episode)
        );
    }
    Ok(())
}

fn run_play(
    controller: &mut Controller,
    arg: &TitleArg,
    names: &[String],
    all: bool,
    start: usize,
) -> Result<()> {
    let title = resolve_title(controller, arg)?;
    let mut available = select_title(controller, &title)?;
    sort_episodes(&mut available);

    let selection = if all || names.is_empty() {
        available
    } else {
        pick_episodes(&available, names)?
    };

    let playlist = controller
        .dispatch(Action::SelectEpisodes {
            episodes: selection,
            start,
        })?
        .into_playback()
        .ok_or_else(|| unexpected_outcome("episode selection"))?;

    print_playlist(&title.name, &playlist);
    Ok(())
}

fn run_resume(controller: &mut Controller) -> Result<()> {
    let playlist = start_previous(controller)?;
    let current = playlist.current_episode()?;
    let title_name = session_title_name(controller).unwrap_or_else(|| current.title.name.clone());
    eprintln!("Resuming {title_name} at {}", current.name);
    print_playlist(&title_name, &playlist);
    Ok(())
}

fn run_report(
    controller: &mut Controller,
    path: String,
    progress: f64,
    completed: bool,
) -> Result<()> {
    start_previous(controller)?;
    let title_name = session_title_name(controller);
    let Outcome::Progress(episode) = controller.dispatch(Action::ReportProgress {
        path,
        progress,
        completed,
    })?
    else {
        return Err(unexpected_outcome("progress report"));
    };
    controller.dispatch(Action::StopPlayback)?;

    match title_name {
        Some(title) => println!(
            "Recorded progress: {title} / {} -> {}",
            episode.name,
            format_progress(&episode)
        ),
        None => println!(
            "Recorded progress: {} -> {}",
            episode.name,
            format_progress(&episode)
        ),
    }
    Ok(())
}

fn run_config(controller: &Controller, settings_path: &Path) {
    let settings = controller.settings();
    println!("Settings file:   {}", settings_path.display());
    println!("Playlist record: {}", settings.playlist_file.display());
    let extensions: Vec<&str> = settings.extensions.iter().map(String::as_str).collect();
    println!("Extensions:      {}", extensions.join(", "));
    if settings.search_roots.is_empty() {
        println!("Search roots:    (none)");
    } else {
        println!("Search roots:");
        for root in &settings.search_roots {
            println!("  {root}");
        }
    }
    println!("Tracked titles:  {}", controller.record().titles.len());
}

pub(crate) fn unexpected_outcome(action: &str) -> anyhow::Error {
    anyhow!("unexpected outcome for {action}")
}

fn session_title_name(controller: &Controller) -> Option<String> {
    controller
        .session()
        .and_then(|session| session.title.as_ref())
        .map(|title| title.name.clone())
}

fn scan_titles(controller: &mut Controller) -> Result<Vec<Title>> {
    controller
        .dispatch(Action::ScanTitles)?
        .into_titles()
        .ok_or_else(|| unexpected_outcome("title scan"))
}

fn select_title(controller: &mut Controller, title: &Title) -> Result<Vec<Episode>> {
    controller
        .dispatch(Action::SelectTitle(title.clone()))?
        .into_episodes()
        .ok_or_else(|| unexpected_outcome("title selection"))
}

fn start_previous(controller: &mut Controller) -> Result<EpisodeConfig> {
    controller
        .dispatch(Action::StartPrevious)?
        .into_playback()
        .ok_or_else(|| unexpected_outcome("resume"))
}

pub(crate) fn resolve_title(controller: &mut Controller, arg: &TitleArg) -> Result<Title> {
    let mut matches: Vec<Title> = scan_titles(controller)?
        .into_iter()
        .filter(|title| title.name == arg.title)
        .filter(|title| arg.base.as_ref().is_none_or(|base| &title.base == base))
        .collect();

    match matches.len() {
        0 => bail!("title '{}' was not found under the search roots", arg.title),
        1 => Ok(matches.remove(0)),
        _ => {
            let bases: Vec<&str> = matches.iter().map(|title| title.base.as_str()).collect();
            bail!(
                "title '{}' exists under several roots ({}); pass --base",
                arg.title,
                bases.join(", ")
            )
        }
    }
}

pub(crate) fn pick_episodes(available: &[Episode], names: &[String]) -> Result<Vec<Episode>> {
    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|episode| &episode.name == name)
                .cloned()
                .with_context(|| format!("episode '{name}' was not found"))
        })
        .collect()
}

fn print_playlist(title: &str, playlist: &EpisodeConfig) {
    eprintln!(
        "Playlist for {title}: {} episode(s), starting at #{}",
        playlist.episodes.len(),
        playlist.index + 1
    );
    for episode in &playlist.episodes {
        println!("{}", episode.path);
    }
}
