use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::SortKey;

#[derive(Parser, Debug)]
#[command(name = "sonora-tags")]
#[command(version, about = "Batch editor for MP3 (ID3v2) tags", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: <config dir>/sonora-tags/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Apply edits in memory and report them, but don't write any file
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every tag of each file
    #[command(alias = "ls-tags")]
    Show {
        /// Files or directories (scanned for .mp3)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Make VALUE the only value of TAG (an empty VALUE removes the tag)
    ///
    /// TAG is a tag key (TITLE, TXXX description, ...) or a field name
    /// such as `trackNumber` or `custom`.
    Set {
        tag: String,
        value: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Add another value for TAG
    Add {
        tag: String,
        value: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Change one occurrence of TAG from CURRENT to NEW
    Update {
        tag: String,
        current: String,
        new: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Move one occurrence of TAG=VALUE to NEW_TAG
    #[command(alias = "mv")]
    Rename {
        tag: String,
        value: String,
        new_tag: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Delete one occurrence of TAG=VALUE
    #[command(alias = "rm")]
    Remove {
        tag: String,
        value: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Fill tags from file names, e.g. "[artist] - [title]"
    Guess {
        /// Pattern (default from config)
        #[arg(short, long)]
        pattern: Option<String>,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// One line per file, sorted
    List {
        /// filename, title, artist, album, year, genre, composer, track, disc
        #[arg(short, long, default_value = "filename")]
        sort: SortKey,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the standard genre names
    Genres,

    /// Print the field names usable in patterns and their tag keys
    Fields,
}
