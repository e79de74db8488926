use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "quickplay",
    version,
    about = "Pick shows from local folders and keep episode watch progress"
)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Log scan and save decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Per-run settings overrides. These are never written back to the settings file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Settings file to use instead of the one in the config directory.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Playlist record file.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub playlist: Option<PathBuf>,

    /// Extensions to include, e.g. ".mkv, .mp4, .mov".
    #[arg(short = 'x', long, global = true, value_name = "LIST")]
    pub extensions: Option<String>,

    /// Search root; repeat to scan several folders.
    #[arg(short, long = "root", global = true, value_name = "DIR")]
    pub roots: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct TitleArg {
    /// Title folder name.
    pub title: String,

    /// Search root holding the title, when the name exists under several roots.
    #[arg(short, long, value_name = "DIR")]
    pub base: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List titles found under the search roots.
    Titles {
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// List a title's episodes with stored progress.
    Episodes {
        #[command(flatten)]
        title: TitleArg,
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Select episodes of a title and print them as a playlist.
    Play {
        #[command(flatten)]
        title: TitleArg,
        /// Episode file names; none selects every episode.
        episodes: Vec<String>,
        #[arg(short, long, conflicts_with = "episodes")]
        all: bool,
        /// Position in the selection to start from.
        #[arg(short, long, default_value_t = 0)]
        start: usize,
    },
    /// Print the last played playlist.
    Resume,
    /// Record player progress for an episode of the last played playlist.
    Report {
        path: String,
        #[arg(long)]
        progress: f64,
        #[arg(long)]
        completed: bool,
    },
    /// Show resolved settings and file locations.
    Config,
}
