use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tagforged_bmff::OutputProfile;

#[derive(Parser)]
#[command(name = "tagforged")]
#[command(author, version, about = "Edit MP4 metadata, brands and subtitle tracks in place")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write iTunes-style tags into a file
    Tag {
        /// File to tag
        #[arg(required = true)]
        file: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        artist: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        /// Release date, usually a year
        #[arg(long)]
        date: Option<String>,

        /// Cover image (JPEG or PNG)
        #[arg(long)]
        cover: Option<PathBuf>,
    },

    /// Show the tags in a file
    Show {
        /// File to read
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite the file type brands
    Brand {
        /// File to rebrand
        #[arg(required = true)]
        file: PathBuf,

        /// Output profile (defaults to the config, then the file extension)
        #[arg(short, long)]
        profile: Option<OutputProfile>,
    },

    /// Embed an SRT or WebVTT file as a text track
    Subtitle {
        /// File to add the track to
        #[arg(required = true)]
        file: PathBuf,

        /// Subtitles to embed (.srt or .vtt)
        #[arg(required = true)]
        subtitles: PathBuf,

        /// ISO-639-2 language code
        #[arg(short, long)]
        language: Option<String>,

        /// Track id (defaults to the next free id)
        #[arg(long)]
        track_id: Option<u32>,

        /// Time units per second
        #[arg(long)]
        timescale: Option<u32>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
