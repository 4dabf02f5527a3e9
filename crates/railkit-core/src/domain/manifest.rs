//! Structured view of a Gemfile.
//!
//! The manifest is parsed into classified lines that keep their original
//! text, so serializing an unmodified manifest reproduces the input byte for
//! byte. Edits insert or drop whole lines; nothing else is rewritten.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::domain::dependency::{Anchor, DependencySpec};

static GEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*gem\s*\(?\s*["']([^"']+)["'](?:\s*,\s*["']([^"']+)["'])?"#)
        .expect("gem line pattern is valid")
});

static GROUP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*group\s+(.+?)\s+do\s*$").expect("group line pattern is valid")
});

static END_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*end\s*$").expect("end line pattern is valid"));

/// A declared dependency as found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemLine {
    pub raw: String,
    pub name: String,
    /// First positional string argument, when it is a version requirement.
    pub constraint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    Gem(GemLine),
    GroupOpen { raw: String, groups: Vec<String> },
    End(String),
    Other(String),
}

impl ManifestLine {
    fn parse(raw: &str) -> Self {
        if let Some(caps) = GEM_LINE.captures(raw) {
            return Self::Gem(GemLine {
                raw: raw.to_string(),
                name: caps[1].to_string(),
                constraint: caps.get(2).map(|m| m.as_str().to_string()),
            });
        }
        if let Some(caps) = GROUP_LINE.captures(raw) {
            let groups = caps[1]
                .split(',')
                .map(|g| g.trim().trim_start_matches(':').to_string())
                .filter(|g| !g.is_empty())
                .collect();
            return Self::GroupOpen {
                raw: raw.to_string(),
                groups,
            };
        }
        if END_LINE.is_match(raw) {
            return Self::End(raw.to_string());
        }
        Self::Other(raw.to_string())
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Gem(gem) => &gem.raw,
            Self::GroupOpen { raw, .. } | Self::End(raw) | Self::Other(raw) => raw,
        }
    }
}

/// Parsed Gemfile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    lines: Vec<ManifestLine>,
    trailing_newline: bool,
}

impl Manifest {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(ManifestLine::parse).collect(),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    pub fn lines(&self) -> &[ManifestLine] {
        &self.lines
    }

    pub fn gems(&self) -> impl Iterator<Item = &GemLine> {
        self.lines.iter().filter_map(|line| match line {
            ManifestLine::Gem(gem) => Some(gem),
            _ => None,
        })
    }

    /// Look up a declaration by name, whatever its qualifiers or indentation.
    pub fn gem(&self, name: &str) -> Option<&GemLine> {
        self.gems().find(|gem| gem.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.gem(name).is_some()
    }

    /// Insert a declaration at its anchor. Returns `false` when a line for
    /// the same name already exists (nothing is changed in that case).
    ///
    /// Missing anchors fall back to appending: a top-level line for
    /// `Before`, a fresh group block for `After`.
    pub fn insert(&mut self, spec: &DependencySpec) -> bool {
        if self.declares(spec.name) {
            return false;
        }

        match spec.anchor {
            Anchor::Before(marker) => {
                let line = ManifestLine::parse(&spec.to_string());
                match self.position_of(marker.text()) {
                    Some(idx) => self.lines.insert(idx, line),
                    None => self.lines.push(line),
                }
            }
            Anchor::After(marker) => {
                let line = ManifestLine::parse(&format!("  {spec}"));
                match self.position_of(marker.text()) {
                    Some(idx) => self.lines.insert(idx + 1, line),
                    None => {
                        self.lines.push(ManifestLine::Other(String::new()));
                        self.lines.push(ManifestLine::parse(marker.text()));
                        self.lines.push(line);
                        self.lines.push(ManifestLine::End("end".into()));
                    }
                }
            }
        }
        true
    }

    /// Drop every declaration of `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|line| !matches!(line, ManifestLine::Gem(gem) if gem.name == name));
        self.lines.len() != before
    }

    fn position_of(&self, marker: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.raw().contains(marker))
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line.raw())?;
        }
        if self.trailing_newline && !self.lines.is_empty() {
            f.write_str("\n")?;
        }
        Ok(())
    }
}
