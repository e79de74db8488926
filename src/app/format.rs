use crate::library::{Episode, Title};

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

/// Case-insensitive substring match used by the `--filter` options.
pub(crate) fn matches_filter(text: &str, filter: Option<&str>) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(needle) => text.to_lowercase().contains(&needle.to_lowercase()),
    }
}

pub(crate) fn sort_titles(titles: &mut [Title]) {
    titles.sort_by(|left, right| {
        left.name
            .to_lowercase()
            .cmp(&right.name.to_lowercase())
            .then_with(|| left.base.cmp(&right.base))
    });
}

pub(crate) fn sort_episodes(episodes: &mut [Episode]) {
    episodes.sort_by(|left, right| left.name.cmp(&right.name));
}

pub(crate) fn format_progress(episode: &Episode) -> String {
    if episode.completed {
        return "done".to_string();
    }
    if episode.progress <= 0.0 {
        return "-".to_string();
    }
    // Values up to 1 are fractions; anything larger came from a player that
    // reports seconds.
    if episode.progress <= 1.0 {
        format!("{:.0}%", episode.progress * 100.0)
    } else {
        format_seconds(episode.progress)
    }
}

fn format_seconds(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
