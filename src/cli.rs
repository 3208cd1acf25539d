//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "tubesmith",
    version,
    about = "Render and schedule music videos from buffered tracks and artwork."
)]
pub struct Cli {
    /// Path to the TOML config file.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add music or artwork to the buffer.
    Add {
        #[clap(subcommand)]
        target: AddTarget,
    },

    /// Preview or edit video descriptions before they are scheduled.
    Desc(DescArgs),

    /// Render buffered pairs into scheduled videos.
    Schedule {
        #[clap(subcommand)]
        action: Option<ScheduleAction>,
    },

    /// Upload all scheduled videos to YouTube.
    Upload,

    /// Print the number of scheduled and published videos.
    Status,

    /// Dump the stored catalog as JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum AddTarget {
    /// Add a music file, or every file in a directory.
    Music {
        /// Path to the file or directory.
        path: String,

        #[clap(flatten)]
        opts: AddOpts,
    },

    /// Add an artwork file, directory or URL.
    Art {
        /// Path to the file or directory, or an http(s) URL.
        path: String,

        #[clap(flatten)]
        opts: AddOpts,

        /// Override the file extension of a downloaded artwork.
        #[clap(long)]
        ext: Option<String>,
    },

    /// Remove the most recently buffered entry and its file.
    Undo {
        #[clap(value_enum)]
        kind: MediaKind,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MediaKind {
    Music,
    Art,
}

#[derive(Args, Clone, Debug, Default)]
pub struct AddOpts {
    /// Artist names (comma separated); inferred from the file name when
    /// omitted. For artwork this is the single credited artist.
    #[clap(short, long)]
    pub artists: Option<String>,

    /// Override the 'by' part of the track title.
    #[clap(long)]
    pub by: Option<String>,

    /// Override the 'name' part of the track title.
    #[clap(short, long)]
    pub name: Option<String>,

    /// Free-text description appended to the video description.
    #[clap(short, long)]
    pub desc: Option<String>,

    /// Move the file instead of copying it.
    #[clap(long)]
    pub mv: bool,
}

#[derive(Args, Debug)]
pub struct DescArgs {
    /// Lines appended to the selected track's description, or links to
    /// register with --link.
    pub items: Vec<String>,

    /// Describe the N-th upcoming video (1-indexed).
    #[clap(short = 'n', long = "index", default_value_t = 1)]
    pub index: usize,

    /// Number of videos to display.
    #[clap(short, long, default_value_t = 1)]
    pub count: usize,

    /// Describe every upcoming video.
    #[clap(short, long)]
    pub all: bool,

    /// Append the items as links to this artist's credits instead.
    #[clap(short, long)]
    pub link: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ScheduleAction {
    /// Delete the most recently scheduled video.
    Undo,

    /// Show scheduled videos.
    List {
        /// Print the shorter form of the list.
        #[clap(short, long)]
        short: bool,
    },
}
