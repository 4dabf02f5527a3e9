//! Feature selection: overrides first, prompts otherwise.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::application::ports::Prompter;
use crate::domain::{
    AuthStrategy, Choice, CssFramework, DeviseVersion, DomainError, Feature, Gate, Manifest,
    Overrides, Preset, Selection, SetupOptions,
};
use crate::error::RailkitResult;

/// Result of the selection phase. Nothing has been written yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionPlan {
    /// `None` when the CSS question was declined or never asked.
    pub css: Option<CssFramework>,
    pub auth: Option<AuthStrategy>,
    pub devise_version: Option<DeviseVersion>,
    /// Requested features in installation order.
    pub features: Vec<Feature>,
    pub selections: Vec<Selection>,
}

impl SelectionPlan {
    pub fn includes(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

/// Resolves yes/no and single-letter questions for one run.
pub struct FeatureSelector {
    prompter: Arc<dyn Prompter>,
    overrides: Overrides,
    selections: Vec<Selection>,
}

impl FeatureSelector {
    pub fn new(prompter: Arc<dyn Prompter>, overrides: Overrides) -> Self {
        Self {
            prompter,
            overrides,
            selections: Vec::new(),
        }
    }

    /// An override for `key` answers without prompting; otherwise ask.
    pub fn resolve(&mut self, key: &str, prompt: &str) -> RailkitResult<bool> {
        if let Some(value) = self.overrides.get(key) {
            debug!(key, value, "Answered by override");
            self.record(key, value.to_string(), true);
            return Ok(value);
        }
        let value = self.prompter.confirm(prompt)?;
        self.record(key, value.to_string(), false);
        Ok(value)
    }

    pub fn resolve_feature(&mut self, feature: Feature) -> RailkitResult<bool> {
        self.resolve(feature.key(), feature.prompt())
    }

    /// Ask a single-letter question restricted to `C::TOKENS`.
    pub fn choose<C: Choice>(&mut self, key: &str) -> RailkitResult<C> {
        let token = self.prompter.choose(C::PROMPT, C::TOKENS)?;
        let choice = C::from_token(&token).ok_or_else(|| DomainError::InvalidChoice {
            token: token.clone(),
            allowed: C::TOKENS.join(", "),
        })?;
        self.record(key, choice.to_string(), false);
        Ok(choice)
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    fn record(&mut self, key: &str, answer: String, overridden: bool) {
        self.selections.push(Selection {
            key: key.to_string(),
            answer,
            overridden,
        });
    }

    fn pinned(&mut self, key: &str, answer: impl ToString) {
        self.record(key, answer.to_string(), true);
    }

    /// Walk every question in declaration order.
    ///
    /// `manifest` is the state before the run; it lets questions that depend
    /// on earlier declarations (navbar, admin) see what was already there.
    #[instrument(skip_all, fields(rails = %options.rails_version, preset = %options.preset))]
    pub fn plan(mut self, options: &SetupOptions, manifest: &Manifest) -> RailkitResult<SelectionPlan> {
        let css = self.select_css(options)?;
        let (auth, devise_version) = self.select_auth(options)?;

        let mut features = Vec::new();
        match css {
            Some(CssFramework::Bootstrap) => features.push(Feature::Bootstrap),
            Some(CssFramework::Tailwind) => features.push(Feature::Tailwind),
            Some(CssFramework::Vanilla) | None => {}
        }
        match auth {
            Some(AuthStrategy::Devise) => features.push(Feature::Devise),
            Some(AuthStrategy::Native) => features.push(Feature::Authentication),
            Some(AuthStrategy::None) | None => {}
        }

        if self.admin_offered(options, devise_version, manifest)
            && self.resolve_feature(Feature::Admin)?
        {
            features.push(Feature::Admin);
        }

        for feature in [Feature::DevTools, Feature::FriendlyUrls, Feature::ImageUpload] {
            if self.resolve_feature(feature)? {
                features.push(feature);
            }
        }

        let bootstrap = css == Some(CssFramework::Bootstrap) || manifest.declares("bootstrap");
        if bootstrap && options.preset != Preset::Tailwind && self.resolve_feature(Feature::Navbar)? {
            features.push(Feature::Navbar);
        }

        for feature in [
            Feature::Pagination,
            Feature::RubyLlm,
            Feature::Security,
            Feature::Testing,
        ] {
            if self.resolve_feature(feature)? {
                features.push(feature);
            }
        }

        features.sort();
        info!(features = ?features, "Selection complete");
        Ok(SelectionPlan {
            css,
            auth,
            devise_version,
            features,
            selections: self.selections,
        })
    }

    fn select_css(&mut self, options: &SetupOptions) -> RailkitResult<Option<CssFramework>> {
        if let Some(fixed) = options.preset.fixed_css() {
            self.pinned("css_framework", fixed);
            return Ok(Some(fixed));
        }
        if self.overrides.get(Gate::Css.key()) == Some(false) {
            self.pinned(Gate::Css.key(), false);
            return Ok(None);
        }
        for (feature, css) in [
            (Feature::Bootstrap, CssFramework::Bootstrap),
            (Feature::Tailwind, CssFramework::Tailwind),
        ] {
            if self.overrides.get(feature.key()) == Some(true) {
                self.pinned("css_framework", css);
                return Ok(Some(css));
            }
        }
        // Rails 7 goes straight to the framework question.
        if options.rails_version.has_native_authentication()
            && !self.resolve(Gate::Css.key(), Gate::Css.prompt())?
        {
            return Ok(None);
        }
        let choice = self.choose::<CssFramework>("css_framework")?;
        Ok(Some(self.veto(choice)))
    }

    /// A `false` override on a framework turns its choice into vanilla.
    fn veto(&self, choice: CssFramework) -> CssFramework {
        let feature = match choice {
            CssFramework::Bootstrap => Feature::Bootstrap,
            CssFramework::Tailwind => Feature::Tailwind,
            CssFramework::Vanilla => return choice,
        };
        if self.overrides.get(feature.key()) == Some(false) {
            CssFramework::Vanilla
        } else {
            choice
        }
    }

    fn select_auth(
        &mut self,
        options: &SetupOptions,
    ) -> RailkitResult<(Option<AuthStrategy>, Option<DeviseVersion>)> {
        if !options.rails_version.has_native_authentication() {
            // Rails 7 only offers Devise, at its latest version.
            return Ok(if self.resolve_feature(Feature::Devise)? {
                (Some(AuthStrategy::Devise), Some(DeviseVersion::Latest))
            } else {
                (None, None)
            });
        }

        if self.overrides.get(Gate::Auth.key()) == Some(false) {
            self.pinned(Gate::Auth.key(), false);
            return Ok((None, None));
        }
        if self.overrides.get(Feature::Devise.key()) == Some(true) {
            // Pinned for Active Admin compatibility, without asking.
            self.pinned(Feature::Devise.key(), true);
            self.pinned("devise_version", DeviseVersion::Pinned);
            return Ok((Some(AuthStrategy::Devise), Some(DeviseVersion::Pinned)));
        }
        if self.overrides.get(Feature::Authentication.key()) == Some(true) {
            self.pinned(Feature::Authentication.key(), true);
            return Ok((Some(AuthStrategy::Native), None));
        }
        if !self.resolve(Gate::Auth.key(), Gate::Auth.prompt())? {
            return Ok((None, None));
        }

        match self.choose::<AuthStrategy>("auth_strategy")? {
            AuthStrategy::Devise => {
                if self.overrides.get(Feature::Devise.key()) == Some(false) {
                    return Ok((Some(AuthStrategy::None), None));
                }
                let version = self.choose::<DeviseVersion>("devise_version")?;
                Ok((Some(AuthStrategy::Devise), Some(version)))
            }
            AuthStrategy::Native => {
                if self.overrides.get(Feature::Authentication.key()) == Some(false) {
                    return Ok((Some(AuthStrategy::None), None));
                }
                Ok((Some(AuthStrategy::Native), None))
            }
            AuthStrategy::None => Ok((Some(AuthStrategy::None), None)),
        }
    }

    /// Rails 8 only offers Active Admin on top of Devise 4.9.
    fn admin_offered(
        &self,
        options: &SetupOptions,
        devise_version: Option<DeviseVersion>,
        manifest: &Manifest,
    ) -> bool {
        if !options.rails_version.has_native_authentication() {
            return true;
        }
        devise_version == Some(DeviseVersion::Pinned)
            || manifest
                .gem("devise")
                .and_then(|g| g.constraint.as_deref())
                .is_some_and(|c| c == DeviseVersion::PINNED_CONSTRAINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RailsVersion;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers from a queue; counts how often it was asked.
    #[derive(Default)]
    struct QueuedPrompter {
        confirms: Mutex<VecDeque<bool>>,
        choices: Mutex<VecDeque<&'static str>>,
        asked: Mutex<Vec<String>>,
    }

    impl QueuedPrompter {
        fn new(confirms: &[bool], choices: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                confirms: Mutex::new(confirms.iter().copied().collect()),
                choices: Mutex::new(choices.iter().copied().collect()),
                asked: Mutex::default(),
            })
        }

        fn asked(&self) -> Vec<String> {
            self.asked.lock().unwrap().clone()
        }
    }

    impl Prompter for QueuedPrompter {
        fn confirm(&self, prompt: &str) -> RailkitResult<bool> {
            self.asked.lock().unwrap().push(prompt.to_string());
            Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(false))
        }

        fn choose(&self, prompt: &str, tokens: &[&str]) -> RailkitResult<String> {
            self.asked.lock().unwrap().push(prompt.to_string());
            let token = self
                .choices
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(tokens[tokens.len() - 1]);
            Ok(token.to_string())
        }
    }

    fn overrides(pairs: &[(&str, bool)]) -> Overrides {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn override_answers_without_prompting() {
        let prompter = QueuedPrompter::new(&[false], &[]);
        let mut selector =
            FeatureSelector::new(prompter.clone(), overrides(&[("pagination", true)]));
        assert!(selector.resolve_feature(Feature::Pagination).unwrap());
        assert!(prompter.asked().is_empty());
        assert!(selector.selections()[0].overridden);
    }

    #[test]
    fn false_override_skips_even_if_prompt_would_say_yes() {
        let prompter = QueuedPrompter::new(&[true], &[]);
        let mut selector = FeatureSelector::new(prompter.clone(), overrides(&[("testing", false)]));
        assert!(!selector.resolve_feature(Feature::Testing).unwrap());
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn devise_override_pins_version_and_offers_admin() {
        let all_no: Vec<(&str, bool)> = Feature::ALL
            .iter()
            .filter(|f| !matches!(f, Feature::Devise | Feature::Admin))
            .map(|f| (f.key(), false))
            .chain([("css", false), ("devise", true)])
            .collect();
        let prompter = QueuedPrompter::new(&[true], &[]);
        let plan = FeatureSelector::new(prompter.clone(), overrides(&all_no))
            .plan(&SetupOptions::default(), &Manifest::default())
            .unwrap();

        assert_eq!(plan.auth, Some(AuthStrategy::Devise));
        assert_eq!(plan.devise_version, Some(DeviseVersion::Pinned));
        assert_eq!(plan.features, vec![Feature::Devise, Feature::Admin]);
        assert_eq!(prompter.asked(), vec![Feature::Admin.prompt().to_string()]);
    }

    #[test]
    fn latest_devise_hides_admin_on_rails_8() {
        // css gate no, auth gate yes, then every toggle no.
        let prompter = QueuedPrompter::new(&[false, true], &["d", "n"]);
        let plan = FeatureSelector::new(prompter.clone(), Overrides::new())
            .plan(&SetupOptions::default(), &Manifest::default())
            .unwrap();
        assert_eq!(plan.devise_version, Some(DeviseVersion::Latest));
        assert!(!plan.includes(Feature::Admin));
        assert!(!prompter.asked().iter().any(|p| p == Feature::Admin.prompt()));
    }

    #[test]
    fn rails_7_asks_css_directly_and_admin_always() {
        let prompter = QueuedPrompter::new(&[], &["b"]);
        let options = SetupOptions {
            rails_version: RailsVersion::Seven,
            ..SetupOptions::default()
        };
        let plan = FeatureSelector::new(prompter.clone(), Overrides::new())
            .plan(&options, &Manifest::default())
            .unwrap();
        let asked = prompter.asked();
        assert_eq!(asked[0], CssFramework::PROMPT);
        assert!(!asked.iter().any(|p| p == Gate::Css.prompt()));
        assert!(asked.iter().any(|p| p == Feature::Admin.prompt()));
        assert!(asked.iter().any(|p| p == Feature::Navbar.prompt()));
        assert_eq!(plan.features, vec![Feature::Bootstrap]);
    }

    #[test]
    fn tailwind_preset_never_offers_navbar() {
        let prompter = QueuedPrompter::new(&[], &[]);
        let options = SetupOptions {
            preset: Preset::Tailwind,
            ..SetupOptions::default()
        };
        let manifest = Manifest::parse("gem \"bootstrap\"\n");
        let plan = FeatureSelector::new(prompter.clone(), Overrides::new())
            .plan(&options, &manifest)
            .unwrap();
        assert_eq!(plan.css, Some(CssFramework::Tailwind));
        assert!(!prompter.asked().iter().any(|p| p == Feature::Navbar.prompt()));
        assert!(!prompter.asked().iter().any(|p| p == CssFramework::PROMPT));
    }

    #[test]
    fn navbar_offered_only_with_bootstrap() {
        let prompter = QueuedPrompter::new(&[true], &["t"]);
        FeatureSelector::new(prompter.clone(), Overrides::new())
            .plan(&SetupOptions::default(), &Manifest::default())
            .unwrap();
        assert!(!prompter.asked().iter().any(|p| p == Feature::Navbar.prompt()));
    }

    #[test]
    fn vetoed_framework_falls_back_to_vanilla() {
        let prompter = QueuedPrompter::new(&[true], &["b"]);
        let plan = FeatureSelector::new(prompter, overrides(&[("bootstrap", false)]))
            .plan(&SetupOptions::default(), &Manifest::default())
            .unwrap();
        assert_eq!(plan.css, Some(CssFramework::Vanilla));
        assert!(!plan.includes(Feature::Bootstrap));
    }

    #[test]
    fn invalid_token_is_rejected() {
        struct Bad;
        impl Prompter for Bad {
            fn confirm(&self, _: &str) -> RailkitResult<bool> {
                Ok(true)
            }
            fn choose(&self, _: &str, _: &[&str]) -> RailkitResult<String> {
                Ok("x".into())
            }
        }
        let mut selector = FeatureSelector::new(Arc::new(Bad), Overrides::new());
        let err = selector.choose::<CssFramework>("css_framework").unwrap_err();
        assert!(err.to_string().contains("'x' is not one of"));
    }
}
