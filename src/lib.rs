//! Recap - Video transcripts and summaries
//!
//! Pulls the caption transcript of a video out of its watch page and forwards
//! it to a language model for a summary or a question/answer digest.
//!
//! # Overview
//!
//! Transcripts come from three sources, tried in order until one yields more
//! than [`transcript::MIN_TRANSCRIPT_CHARS`] characters of text:
//!
//! 1. caption tracks listed in the page's embedded player data
//! 2. the host's internal transcript endpoint
//! 3. the rendered transcript panel
//!
//! # Architecture
//!
//! - `page` - Host page access, video identity and metadata
//! - `transcript` - Caption payload decoding, track selection, normalization
//! - `extract` - The transcript sources
//! - `orchestrator` - Ordered fallback across sources
//! - `session` - Per-page transcript cache
//! - `summary` - Summary and Q&A generation
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use recap::config::Settings;
//! use recap::extract::http_client;
//! use recap::orchestrator::Orchestrator;
//! use recap::page::SnapshotPage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let client = http_client(&settings.extraction)?;
//!     let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//!     let page = SnapshotPage::fetch(&client, url, &settings.extraction.hl).await?;
//!
//!     let orchestrator = Orchestrator::with_client(&settings.extraction, client);
//!     match orchestrator.extract_transcript(&page).await {
//!         Some(transcript) => println!("{}", transcript),
//!         None => eprintln!("No transcript available"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod openai;
pub mod orchestrator;
pub mod page;
pub mod session;
pub mod summary;
pub mod transcript;

pub use error::{RecapError, Result};
