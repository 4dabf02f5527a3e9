//! Domain layer for Railkit.
//!
//! Pure types and rules: which features exist, how they are selected, what
//! they declare in the manifest and how their results are reported. No
//! filesystem or process access happens here; that is driven through the
//! ports in `crate::application::ports`.

pub mod choice;
pub mod dependency;
pub mod error;
pub mod feature;
pub mod manifest;
pub mod outcome;
pub mod profile;

pub use choice::{AuthStrategy, Choice, CssFramework, DeviseVersion};
pub use dependency::{Anchor, DependencySpec, SectionMarker};
pub use error::{DomainError, ErrorCategory};
pub use feature::{Detection, Feature, Gate, NATIVE_AUTH_MARKER, NAVBAR_PARTIAL, override_var};
pub use manifest::{GemLine, Manifest, ManifestLine};
pub use outcome::{
    AbortReason, BatchInstall, InstallOutcome, InstallReport, Notice, NoticeLevel, RunReport,
    Selection,
};
pub use profile::{
    DEFAULT_TARGET_MODEL, ExecutionMode, Overrides, Preset, RailsVersion, SetupOptions,
};
