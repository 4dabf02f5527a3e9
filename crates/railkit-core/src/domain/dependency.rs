//! Dependency declarations and where they go in the manifest.

use std::fmt;

/// A named section header in the manifest, matched by literal substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMarker {
    DevelopmentTest,
    Development,
}

impl SectionMarker {
    pub const fn text(self) -> &'static str {
        match self {
            Self::DevelopmentTest => "group :development, :test do",
            Self::Development => "group :development do",
        }
    }
}

/// Insertion point relative to a section marker.
///
/// `Before` lands the line in the default (runtime) section just above the
/// group; `After` lands it as the first line inside the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Before(SectionMarker),
    After(SectionMarker),
}

/// One dependency an installer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: &'static str,
    pub constraint: Option<&'static str>,
    pub github: Option<&'static str>,
    pub require: bool,
    pub anchor: Anchor,
}

impl DependencySpec {
    /// Runtime dependency placed before the development/test group.
    pub const fn runtime(name: &'static str) -> Self {
        Self {
            name,
            constraint: None,
            github: None,
            require: true,
            anchor: Anchor::Before(SectionMarker::DevelopmentTest),
        }
    }

    pub const fn development(name: &'static str) -> Self {
        Self {
            anchor: Anchor::After(SectionMarker::Development),
            ..Self::runtime(name)
        }
    }

    pub const fn development_test(name: &'static str) -> Self {
        Self {
            anchor: Anchor::After(SectionMarker::DevelopmentTest),
            ..Self::runtime(name)
        }
    }

    pub const fn version(self, constraint: &'static str) -> Self {
        Self {
            constraint: Some(constraint),
            ..self
        }
    }

    pub const fn github(self, repo: &'static str) -> Self {
        Self {
            github: Some(repo),
            ..self
        }
    }

    pub const fn no_require(self) -> Self {
        Self {
            require: false,
            ..self
        }
    }

    pub const fn anchored(self, anchor: Anchor) -> Self {
        Self { anchor, ..self }
    }

    /// Same declaration with a different version constraint (or none).
    pub const fn with_constraint(self, constraint: Option<&'static str>) -> Self {
        Self { constraint, ..self }
    }
}

/// Renders the declaration line without indentation.
impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gem \"{}\"", self.name)?;
        if let Some(constraint) = self.constraint {
            write!(f, ", \"{constraint}\"")?;
        }
        if let Some(repo) = self.github {
            write!(f, ", github: \"{repo}\"")?;
        }
        if !self.require {
            f.write_str(", require: false")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_qualifiers_in_gemfile_order() {
        let spec = DependencySpec::runtime("simple_form").github("heartcombo/simple_form");
        assert_eq!(
            spec.to_string(),
            r#"gem "simple_form", github: "heartcombo/simple_form""#
        );

        let spec = DependencySpec::runtime("bootstrap").version("~> 5.3");
        assert_eq!(spec.to_string(), r#"gem "bootstrap", "~> 5.3""#);

        let spec = DependencySpec::development_test("rubocop").no_require();
        assert_eq!(spec.to_string(), r#"gem "rubocop", require: false"#);
    }

    #[test]
    fn group_helpers_pick_anchor() {
        assert_eq!(
            DependencySpec::development("annotate").anchor,
            Anchor::After(SectionMarker::Development)
        );
        assert_eq!(
            DependencySpec::runtime("pagy").anchor,
            Anchor::Before(SectionMarker::DevelopmentTest)
        );
    }
}
