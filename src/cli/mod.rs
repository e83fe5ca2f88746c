//! CLI module for Recap.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{content_preview, Output};

use clap::{Parser, Subcommand};

/// Recap - Video transcripts and summaries
///
/// Pulls the caption transcript of a video from its watch page and, on
/// request, hands it to a language model for a summary or a Q&A digest.
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the transcript of a video
    Transcript {
        /// Video URL or ID
        input: String,

        /// Write the transcript to a file ("-" for stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Emit JSON with the video id, source and transcript
        #[arg(long)]
        json: bool,
    },

    /// Extract the transcript and summarize it
    Summarize {
        /// Video URL or ID
        input: String,

        /// Also extract a question/answer digest
        #[arg(long)]
        qa: bool,
    },

    /// Extract the transcript and list the questions it answers
    Qa {
        /// Video URL or ID
        input: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
