//! Configuration module for Recap.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts, SummaryPrompts};
pub use settings::{ExtractionSettings, GeneralSettings, PromptSettings, Settings, SummarySettings};
