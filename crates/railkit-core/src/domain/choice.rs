//! Mutually exclusive choice groups answered with a single letter.

use serde::Serialize;
use std::fmt;

/// A closed set of single-letter answers.
///
/// The last token is always the neutral answer; non-interactive prompters
/// fall back to it.
pub trait Choice: Sized + Copy + fmt::Display {
    const PROMPT: &'static str;
    const TOKENS: &'static [&'static str];

    fn from_token(token: &str) -> Option<Self>;
}

/// Which CSS framework the starter app uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CssFramework {
    Bootstrap,
    Tailwind,
    Vanilla,
}

impl Choice for CssFramework {
    const PROMPT: &'static str =
        "Choose CSS framework? (b = bootstrap, t = tailwind, v = vanilla/none)";
    const TOKENS: &'static [&'static str] = &["b", "t", "v", "n"];

    fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "b" => Some(Self::Bootstrap),
            "t" => Some(Self::Tailwind),
            "v" | "n" => Some(Self::Vanilla),
            _ => None,
        }
    }
}

impl fmt::Display for CssFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bootstrap => "bootstrap",
            Self::Tailwind => "tailwind",
            Self::Vanilla => "vanilla",
        })
    }
}

/// Which authentication flavour to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
    Devise,
    Native,
    None,
}

impl Choice for AuthStrategy {
    const PROMPT: &'static str = "Choose authentication? (d = devise, r = rails 8 native, n = none)";
    const TOKENS: &'static [&'static str] = &["d", "r", "n"];

    fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "d" => Some(Self::Devise),
            "r" => Some(Self::Native),
            "n" => Some(Self::None),
            _ => None,
        }
    }
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Devise => "devise",
            Self::Native => "native",
            Self::None => "none",
        })
    }
}

/// Devise release line. ActiveAdmin only works with the 4.9 series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviseVersion {
    Pinned,
    Latest,
}

impl DeviseVersion {
    pub const PINNED_CONSTRAINT: &'static str = "~> 4.9";

    pub const fn constraint(self) -> Option<&'static str> {
        match self {
            Self::Pinned => Some(Self::PINNED_CONSTRAINT),
            Self::Latest => None,
        }
    }
}

impl Choice for DeviseVersion {
    const PROMPT: &'static str = "Use Devise v4.9 for Active Admin? (y = yes, n = latest version)";
    const TOKENS: &'static [&'static str] = &["y", "n"];

    fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "y" => Some(Self::Pinned),
            "n" => Some(Self::Latest),
            _ => None,
        }
    }
}

impl fmt::Display for DeviseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pinned => "v4.9",
            Self::Latest => "latest version",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_token_parses<C: Choice>() {
        for token in C::TOKENS {
            assert!(C::from_token(token).is_some(), "token {token} should parse");
        }
    }

    #[test]
    fn all_tokens_are_valid() {
        every_token_parses::<CssFramework>();
        every_token_parses::<AuthStrategy>();
        every_token_parses::<DeviseVersion>();
    }

    #[test]
    fn last_token_is_neutral() {
        assert_eq!(
            CssFramework::from_token(CssFramework::TOKENS.last().unwrap()),
            Some(CssFramework::Vanilla)
        );
        assert_eq!(
            AuthStrategy::from_token(AuthStrategy::TOKENS.last().unwrap()),
            Some(AuthStrategy::None)
        );
        assert_eq!(
            DeviseVersion::from_token(DeviseVersion::TOKENS.last().unwrap()),
            Some(DeviseVersion::Latest)
        );
    }

    #[test]
    fn tokens_are_case_insensitive_and_strict() {
        assert_eq!(CssFramework::from_token("B"), Some(CssFramework::Bootstrap));
        assert_eq!(CssFramework::from_token("x"), None);
        assert_eq!(AuthStrategy::from_token("devise"), None);
    }
}
