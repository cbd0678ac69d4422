//! Analysis digest: a plain-text transcript plus an instruction, ready to hand to a language model.

use std::fmt::Write as _;
use std::str::FromStr;

use rc_core::{Message, Result, RocketChatError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Summary,
    Sentiment,
    Topics,
    /// Caller-supplied instruction.
    Custom,
}

impl FromStr for AnalysisKind {
    type Err = RocketChatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Self::Summary),
            "sentiment" => Ok(Self::Sentiment),
            "topics" => Ok(Self::Topics),
            "custom" => Ok(Self::Custom),
            other => Err(RocketChatError::validation(format!(
                "unknown analysis type {other:?} (expected summary, sentiment, topics or custom)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    pub prompt: Option<String>,
}

impl AnalysisRequest {
    pub fn new(kind: AnalysisKind) -> Self {
        Self { kind, prompt: None }
    }

    pub fn custom(prompt: impl Into<String>) -> Self {
        Self {
            kind: AnalysisKind::Custom,
            prompt: Some(prompt.into()),
        }
    }

    /// `custom` needs a non-empty prompt.
    pub fn validate(&self) -> Result<()> {
        if self.kind == AnalysisKind::Custom
            && self.prompt.as_deref().map_or(true, |p| p.trim().is_empty())
        {
            return Err(RocketChatError::validation(
                "custom analysis requires a non-empty prompt",
            ));
        }
        Ok(())
    }

    fn instruction(&self) -> &str {
        match self.kind {
            AnalysisKind::Summary => {
                "Summarize the conversation above: main points, decisions made and open action items."
            }
            AnalysisKind::Sentiment => {
                "Describe the overall sentiment of the conversation above and how it shifts between participants."
            }
            AnalysisKind::Topics => {
                "List the main topics discussed in the conversation above, with the participants involved in each."
            }
            AnalysisKind::Custom => self.prompt.as_deref().unwrap_or_default().trim(),
        }
    }
}

/// One transcript line per message, oldest first: `[YYYY-MM-DD HH:MM] user: text`.
pub fn transcript(messages: &[Message]) -> String {
    let mut ordered: Vec<&Message> = messages.iter().collect();
    ordered.sort_by_key(|m| m.timestamp);

    let mut out = String::new();
    for message in ordered {
        let body = match (&message.file, message.has_text()) {
            (Some(file), true) => format!("{} [file: {}]", message.text, file.name),
            (Some(file), false) => format!("[file: {}]", file.name),
            (None, _) => message.text.clone(),
        };
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            message.timestamp.format("%Y-%m-%d %H:%M"),
            message.author.username,
            body
        );
    }
    out
}

pub fn build_analysis_prompt(messages: &[Message], request: &AnalysisRequest) -> Result<String> {
    request.validate()?;
    Ok(format!(
        "Conversation ({} messages):\n\n{}\n{}",
        messages.len(),
        transcript(messages),
        request.instruction()
    ))
}
