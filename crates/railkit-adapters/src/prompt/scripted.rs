//! Prompter fed from a fixed list of answers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;

use railkit_core::{
    application::{ApplicationError, ports::Prompter},
    error::RailkitResult,
};

/// Answers questions from a queue, in order.
///
/// `confirm` accepts `y`/`yes`; anything else is "no". An exhausted queue
/// answers "no" to `confirm` and picks the last token for `choose`, which is
/// the "none" option of every choice group.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<String>>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().map(Into::into).collect())),
            asked: Arc::default(),
        }
    }

    /// Answers "no" to everything.
    pub fn declining() -> Self {
        Self::default()
    }

    /// Every prompt shown so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn next(&self, prompt: &str) -> Option<String> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(prompt.to_string());
        }
        let answer = self.answers.lock().ok()?.pop_front();
        debug!(prompt, answer = ?answer, "scripted answer");
        answer
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str) -> RailkitResult<bool> {
        Ok(self
            .next(prompt)
            .is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
    }

    fn choose(&self, prompt: &str, tokens: &[&str]) -> RailkitResult<String> {
        let answer = match self.next(prompt) {
            Some(answer) => answer.trim().to_ascii_lowercase(),
            None => tokens.last().copied().unwrap_or_default().to_string(),
        };
        if tokens.contains(&answer.as_str()) {
            Ok(answer)
        } else {
            Err(ApplicationError::PromptFailed {
                reason: format!("`{answer}` is not one of {}", tokens.join("/")),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_in_order_then_declines() {
        let prompter = ScriptedPrompter::new(["y", "d"]);
        assert!(prompter.confirm("Install authentication? (y/n)").unwrap());
        assert_eq!(prompter.choose("Which?", &["d", "r", "n"]).unwrap(), "d");
        assert!(!prompter.confirm("Install pagination? (y/n)").unwrap());
        assert_eq!(prompter.choose("Which?", &["b", "t", "v", "n"]).unwrap(), "n");
        assert_eq!(prompter.asked().len(), 4);
    }

    #[test]
    fn unknown_token_is_rejected() {
        let prompter = ScriptedPrompter::new(["x"]);
        assert!(prompter.choose("Which?", &["d", "r", "n"]).is_err());
    }
}
