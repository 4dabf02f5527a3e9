//! Terminal implementation of the core `Prompter` port.
//!
//! Prompts run inside [`ProgressBar::suspend`] so the spinner does not
//! redraw over the question.

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::debug;

use railkit_adapters::ScriptedPrompter;
use railkit_core::application::Prompter;

use crate::error::CliResult;

/// Pick the prompter for this invocation.
///
/// `--non-interactive` answers every question with its default; otherwise a
/// terminal prompter is required.
pub fn prompter_for(non_interactive: bool, bar: &ProgressBar) -> CliResult<Arc<dyn Prompter>> {
    if non_interactive {
        debug!("non-interactive: every prompt takes its default");
        return Ok(Arc::new(ScriptedPrompter::declining()));
    }
    terminal::prompter(bar)
}

#[cfg(feature = "interactive")]
mod terminal {
    use std::sync::Arc;

    use indicatif::ProgressBar;

    use railkit_core::application::{ApplicationError, Prompter};
    use railkit_core::error::{RailkitError, RailkitResult};

    use crate::error::CliResult;

    pub fn prompter(bar: &ProgressBar) -> CliResult<Arc<dyn Prompter>> {
        Ok(Arc::new(TerminalPrompter { bar: bar.clone() }))
    }

    pub struct TerminalPrompter {
        bar: ProgressBar,
    }

    impl Prompter for TerminalPrompter {
        fn confirm(&self, prompt: &str) -> RailkitResult<bool> {
            let question = strip_hint(prompt);
            self.bar.suspend(|| {
                dialoguer::Confirm::new()
                    .with_prompt(question)
                    .default(false)
                    .interact()
                    .map_err(prompt_failed)
            })
        }

        fn choose(&self, prompt: &str, tokens: &[&str]) -> RailkitResult<String> {
            let fallback = tokens.last().copied().unwrap_or_default().to_string();
            let allowed: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
            self.bar.suspend(|| {
                dialoguer::Input::<String>::new()
                    .with_prompt(prompt)
                    .default(fallback)
                    .validate_with(|answer: &String| -> Result<(), String> {
                        if allowed.iter().any(|t| t == answer.trim()) {
                            Ok(())
                        } else {
                            Err(format!("answer with one of: {}", allowed.join(", ")))
                        }
                    })
                    .interact_text()
                    .map(|answer| answer.trim().to_string())
                    .map_err(prompt_failed)
            })
        }
    }

    fn prompt_failed(err: dialoguer::Error) -> RailkitError {
        ApplicationError::PromptFailed {
            reason: err.to_string(),
        }
        .into()
    }

    /// dialoguer renders its own `[y/N]`.
    pub(super) fn strip_hint(prompt: &str) -> &str {
        prompt.trim_end_matches("(y/n)").trim_end()
    }
}

#[cfg(not(feature = "interactive"))]
mod terminal {
    use std::sync::Arc;

    use indicatif::ProgressBar;

    use railkit_core::application::Prompter;

    use crate::error::{CliError, CliResult};

    pub fn prompter(_bar: &ProgressBar) -> CliResult<Arc<dyn Prompter>> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}
