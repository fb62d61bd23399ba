//! Producers of study material for a set of notes.
//!
//! The HTTP layer only sees [`StudyGenerator`]. Which implementation runs is
//! decided once at startup from [`Config`].

use std::sync::Arc;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::api::models::{GenerateResponse, QuizQuestion};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::llm::{call_openrouter, extract_json};
use crate::notes::build_prompt;

#[async_trait]
pub trait StudyGenerator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Turns normalized, non-empty notes into a summary and quiz.
    async fn generate(&self, notes: &str) -> Result<GenerateResponse>;
}

pub fn from_config(config: &Config) -> Arc<dyn StudyGenerator> {
    match &config.openrouter_api_key {
        Some(api_key) => {
            info!(model = %config.openrouter_model, "Using OpenRouter generator");
            Arc::new(LlmGenerator::new(
                config.openrouter_base_url.clone(),
                api_key.clone(),
                config.openrouter_model.clone(),
            ))
        }
        None => {
            warn!("OPENROUTER_API_KEY not set, serving placeholder study material");
            Arc::new(PlaceholderGenerator)
        }
    }
}

/// Fixed content for exercising the contract without an LLM.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderGenerator;

#[async_trait]
impl StudyGenerator for PlaceholderGenerator {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn generate(&self, _notes: &str) -> Result<GenerateResponse> {
        Ok(GenerateResponse::new(
            vec![
                "Placeholder summary point 1".to_string(),
                "Placeholder summary point 2".to_string(),
            ],
            vec![QuizQuestion::new(
                "Placeholder question?",
                ["Option A", "Option B", "Option C", "Option D"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                "Option A",
            )],
        ))
    }
}

pub struct LlmGenerator {
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmGenerator {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self { base_url, api_key, model }
    }
}

#[async_trait]
impl StudyGenerator for LlmGenerator {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn generate(&self, notes: &str) -> Result<GenerateResponse> {
        let prompt = build_prompt(notes);
        let reply = call_openrouter(&self.base_url, &self.api_key, &self.model, &prompt).await?;
        parse_generated(&reply)
    }
}

/// Parses an LLM reply into a response, dropping unusable quiz entries.
///
/// Summary lines are trimmed and blank ones removed. A reply that leaves no
/// summary at all is an error since the notes were known to be non-empty.
pub fn parse_generated(reply: &str) -> Result<GenerateResponse> {
    let parsed: GenerateResponse = serde_json::from_str(extract_json(reply))?;

    let summary: Vec<String> = parsed
        .summary
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    if summary.is_empty() {
        return Err(AppError::Parse("LLM returned an empty summary".to_string()));
    }

    let quiz = parsed
        .quiz
        .into_iter()
        .filter(|q| {
            let keep = !q.question.trim().is_empty() && q.is_well_formed();
            if !keep {
                warn!(question = %q.question, answer = %q.answer, "Dropping malformed quiz question");
            }
            keep
        })
        .collect();

    let response = GenerateResponse::new(summary, quiz);
    response.validate_quiz()?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_answer_is_among_options() {
        let resp = PlaceholderGenerator.generate("anything").await.unwrap();
        assert_eq!(resp.summary.len(), 2);
        assert_eq!(resp.quiz.len(), 1);
        assert_eq!(resp.quiz[0].options.len(), 4);
        assert!(resp.validate_quiz().is_ok());
    }

    #[test]
    fn config_without_key_selects_placeholder() {
        let generator = from_config(&Config::default());
        assert_eq!(generator.name(), "placeholder");
    }

    #[test]
    fn config_with_key_selects_openrouter() {
        let config = Config {
            openrouter_api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        assert_eq!(from_config(&config).name(), "openrouter");
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = r#"```json
{"summary": ["Mitochondria produce ATP", "  "],
 "quiz": [{"question": "What do mitochondria produce?", "options": ["ATP", "DNA", "RNA", "Lipids"], "answer": "ATP"}]}
```"#;
        let resp = parse_generated(reply).unwrap();
        assert_eq!(resp.summary, vec!["Mitochondria produce ATP".to_string()]);
        assert_eq!(resp.quiz.len(), 1);
        assert_eq!(resp.quiz[0].answer, "ATP");
    }

    #[test]
    fn parses_single_line_fence_and_leading_prose() {
        let single = "```{\"summary\":[\"a\"],\"quiz\":[]}```";
        assert_eq!(parse_generated(single).unwrap().summary, vec!["a"]);

        let chatty = "Here is the JSON:\n```json\n{\"summary\": [\"b\"], \"quiz\": []}\n```\nLet me know!";
        assert_eq!(parse_generated(chatty).unwrap().summary, vec!["b"]);
    }

    #[test]
    fn drops_questions_whose_answer_is_not_an_option() {
        let reply = r#"{"summary": ["2+2 is 4"],
            "quiz": [
                {"question": "2+2?", "options": ["3", "4", "5"], "answer": "4"},
                {"question": "2+2?", "options": ["3", "5"], "answer": "4"},
                {"question": " ", "options": ["a"], "answer": "a"}
            ]}"#;
        let resp = parse_generated(reply).unwrap();
        assert_eq!(resp.quiz.len(), 1);
        assert_eq!(resp.quiz[0].options, vec!["3", "4", "5"]);
    }

    #[test]
    fn empty_summary_is_a_parse_error() {
        let err = parse_generated(r#"{"summary": [], "quiz": []}"#).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn prose_reply_is_a_parse_error() {
        let err = parse_generated("Sure! Here is your summary.").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
