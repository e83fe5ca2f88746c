//! Configuration settings for Recap.

use crate::extract::SourceKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub extraction: ExtractionSettings,
    pub summary: SummarySettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Transcript extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Order in which transcript sources are tried.
    pub sources: Vec<SourceKind>,
    /// Interval between video ready-state polls, in milliseconds.
    pub ready_poll_interval_ms: u64,
    /// Ready state the video element must reach before the page is scraped.
    pub min_ready_state: u8,
    /// Delay after opening the transcript panel, in milliseconds.
    pub panel_settle_ms: u64,
    /// Accessibility-label fragments of the transcript toggle, in priority order.
    pub transcript_button_labels: Vec<String>,
    /// Selector of the rendered transcript segments container.
    pub segments_selector: String,
    /// Internal transcript endpoint.
    pub api_endpoint: String,
    /// Client name sent in the internal API context.
    pub client_name: String,
    /// Client version sent in the internal API context.
    pub client_version: String,
    /// Interface language (`hl`).
    pub hl: String,
    /// Content region (`gl`).
    pub gl: String,
    /// Timeout for each HTTP request, in seconds.
    pub http_timeout_secs: u64,
    /// User agent used for page and caption fetches.
    pub user_agent: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            sources: vec![SourceKind::Embedded, SourceKind::Api, SourceKind::Dom],
            ready_poll_interval_ms: 100,
            min_ready_state: 1, // HAVE_METADATA
            panel_settle_ms: 1500,
            transcript_button_labels: [
                "show transcript",
                "transcript",
                "transcription",
                "transkript",
                "transcripción",
                "trascrizione",
                "transcrição",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            segments_selector: "#segments-container".to_string(),
            api_endpoint: "https://www.youtube.com/youtubei/v1/get_transcript?prettyPrint=false"
                .to_string(),
            client_name: "WEB".to_string(),
            client_version: "2.20240726.00.00".to_string(),
            hl: "en".to_string(),
            gl: "US".to_string(),
            http_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36".to_string(),
        }
    }
}

impl ExtractionSettings {
    pub fn ready_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ready_poll_interval_ms)
    }

    pub fn panel_settle_delay(&self) -> Duration {
        Duration::from_millis(self.panel_settle_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Settings for the summary and Q&A requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Chat model used for both requests.
    pub model: String,
    /// Completion token limit for the summary.
    pub summary_max_tokens: u32,
    /// Sampling temperature for the summary.
    pub summary_temperature: f32,
    /// Completion token limit for the Q&A digest.
    pub qa_max_tokens: u32,
    /// Sampling temperature for the Q&A digest.
    pub qa_temperature: f32,
    /// Timeout for each request, in seconds. Long videos need minutes.
    pub timeout_secs: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "gpt-5.1".to_string(),
            summary_max_tokens: 8000,
            summary_temperature: 0.7,
            qa_max_tokens: 4000,
            qa_temperature: 0.5,
            timeout_secs: 600,
        }
    }
}

impl SummarySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RecapError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recap")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.extraction.sources,
            vec![SourceKind::Embedded, SourceKind::Api, SourceKind::Dom]
        );
        assert_eq!(settings.extraction.ready_poll_interval(), Duration::from_millis(100));
        assert_eq!(settings.extraction.panel_settle_delay(), Duration::from_millis(1500));
        assert_eq!(settings.summary.summary_max_tokens, 8000);
        assert_eq!(settings.summary.qa_max_tokens, 4000);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.extraction.sources = vec![SourceKind::Dom, SourceKind::Embedded];
        settings.extraction.hl = "fr".to_string();
        settings.summary.model = "gpt-4o-mini".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.extraction.sources, vec![SourceKind::Dom, SourceKind::Embedded]);
        assert_eq!(loaded.extraction.hl, "fr");
        assert_eq!(loaded.summary.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[extraction]\nsources = [\"api\"]\n").unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.extraction.sources, vec![SourceKind::Api]);
        assert_eq!(loaded.extraction.panel_settle_ms, 1500);
        assert_eq!(loaded.summary.timeout_secs, 600);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded.general.log_level, "warn");
    }
}
