//! Request and response bodies for `POST /api/v1/generate`.
//!
//! Field names here are the wire contract shared with the frontend.

use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

/// Study notes submitted for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
}

impl GenerateRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Rejects notes with no visible content.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(AppError::Validation("text must not be empty".to_string()));
        }
        Ok(())
    }
}

/// A single multiple choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    /// Candidate answers in display order.
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            answer: answer.into(),
        }
    }

    /// True when the answer is one of the options.
    pub fn is_well_formed(&self) -> bool {
        self.options.iter().any(|option| option == &self.answer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Bullet point summary lines.
    pub summary: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
}

impl GenerateResponse {
    pub fn new(summary: Vec<String>, quiz: Vec<QuizQuestion>) -> Self {
        Self { summary, quiz }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.quiz.is_empty()
    }

    /// Fails on the first question whose answer is missing from its options.
    pub fn validate_quiz(&self) -> Result<()> {
        match self.quiz.iter().position(|q| !q.is_well_formed()) {
            Some(index) => Err(AppError::Parse(format!(
                "quiz question {} has answer {:?} not among its options",
                index, self.quiz[index].answer
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
