//! Shell adapters.

mod process;
mod recording;

pub use process::ProcessShell;
pub use recording::{RecordingShell, ShellEffect};
