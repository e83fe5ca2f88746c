//! Prompt templates for Recap.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    /// Prompts for the question/answer digest.
    pub qa: QaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for the video summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub user: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            user: r#"Write an EXHAUSTIVE summary of this video. Keep technical terms in English. Length proportional to the content.

STYLE: Incisive and direct. Use symbols where they help: →, ≠, ~, +.

Detect the video type:
- TALK/CONFERENCE → thesis + arguments + implications
- REVIEW/ANALYSIS → methodology + evaluation + recommendations

---

## TL;DR
[TALK/REVIEW] → One blunt sentence capturing the essence and the stance

## Key Points (8-12)
Ordered by decreasing importance. For each point:
* **Point** → Factual claim taken from the transcript
  - *Opinion*: the author's position or judgement (if any)
  - *Evidence*: data, study or statistic cited (if any)
  - *Impact*: practical consequence

## Data & Stats
Every figure mentioned: percentages, amounts, volumes, dates, comparisons, metrics

## Key Quotes
* Factual (verifiable)
* Opinion (personal judgement)
* To verify (claims without a source)

## Reliability
* Weak points or claims the transcript does not support
* Overall confidence: HIGH | MEDIUM | LOW

Video Title: {{title}}
Channel: {{channel}}

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

/// Prompt for the question/answer digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub user: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            user: r#"You extract questions and answers from videos: interviews, webinars, conferences or educational monologues.
From the transcript below, extract the questions and answers, whether they are:
- Explicit: asked by a host or interviewer to a guest
- Rhetorical: asked by the speaker themselves ("What is X? Let me explain...")
- Implicit: topics introduced and then explained, even without a formal question

Return the result in exactly this format:

Question: <very short paraphrase of the question>
- <very condensed answer, focused on what is actually explained or claimed>

Rules:
- Ignore small talk and housekeeping (welcome, sponsors, discount codes, "can you hear me?", etc.).
- Detect rhetorical questions ("You might be wondering...", "The question is...", "How do you do X?").
- Extract implicit questions: when a concept is introduced then explained, state the underlying question.
- Merge follow-up questions into the main question when they stay on the same topic.
- Skip repeated questions or answers.
- Plain, direct language. No hype, no filler.
- Even for a solo monologue, build a Q&A structure if the content is teaching or explaining concepts.
- Only if the content is purely narrative with no teaching structure, answer: "This content is purely narrative, with no Q&A structure to extract."

Video Title: {{title}}
Channel: {{channel}}

Transcript:
{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.summary.user.contains("{{transcript}}"));
        assert!(prompts.qa.user.contains("{{transcript}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("title".to_string(), "from config".to_string());
        custom.insert("audience".to_string(), "engineers".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("title".to_string(), "from video".to_string());
        let out = prompts.render_with_custom("{{title}} for {{audience}}", &vars);
        assert_eq!(out, "from video for engineers");
    }

    #[test]
    fn test_custom_dir_overrides_one_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("qa.toml"), "user = \"Q: {{transcript}}\"\n").unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.qa.user, "Q: {{transcript}}");
        assert_eq!(prompts.summary.user, SummaryPrompts::default().user);
    }
}
