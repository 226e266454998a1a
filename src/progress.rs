//! Upload progress reporting.
//!
//! Renders the pipeline's lifecycle records during `shelf upload` so users
//! see the transfer advance and know when indexing is still running.
//! Progress is emitted on **stderr** so stdout remains parseable for
//! scripts.

use std::io::Write;

use crate::models::{UploadStage, UploadState};

/// Reports upload progress. Implementations write to stderr (human or JSON).
pub trait UploadReporter: Send + Sync {
    /// Emit one lifecycle record. Called for every state the pipeline yields.
    fn report(&self, state: &UploadState);
}

/// Human-friendly progress on stderr: "upload  42% complete".
pub struct StderrProgress;

impl UploadReporter for StderrProgress {
    fn report(&self, state: &UploadState) {
        let line = match state.state {
            UploadStage::Pending => "upload  preparing...\n".to_string(),
            UploadStage::InProgress if state.progress < 100 => {
                format!("upload  {}% complete\n", state.progress)
            }
            UploadStage::InProgress => "upload  waiting for indexing...\n".to_string(),
            UploadStage::Done => "upload  indexed\n".to_string(),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl UploadReporter for JsonProgress {
    fn report(&self, state: &UploadState) {
        if let Ok(line) = serde_json::to_string(state) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl UploadReporter for NoProgress {
    fn report(&self, _state: &UploadState) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(ProgressMode::Off),
            "human" => Some(ProgressMode::Human),
            "json" => Some(ProgressMode::Json),
            _ => None,
        }
    }

    /// Build a reporter for this mode. Caller passes it the pipeline states.
    pub fn reporter(&self) -> Box<dyn UploadReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!(ProgressMode::parse("off"), Some(ProgressMode::Off));
        assert_eq!(ProgressMode::parse("human"), Some(ProgressMode::Human));
        assert_eq!(ProgressMode::parse("json"), Some(ProgressMode::Json));
        assert_eq!(ProgressMode::parse("verbose"), None);
    }
}
