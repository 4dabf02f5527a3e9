//! Prompt adapters that need no terminal.

mod scripted;

pub use scripted::ScriptedPrompter;
