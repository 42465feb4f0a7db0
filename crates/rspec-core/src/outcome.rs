use serde::{Deserialize, Serialize};

/// Terminal result of a single leaf test. Failed and errored aggregate
/// identically at the block level but keep their distinct verdict string in
/// reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestOutcome {
    Passed,
    Failed { reason: String },
    Errored { reason: String },
}

impl TestOutcome {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed { .. } => "failed",
            Self::Errored { .. } => "errored",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// A single runnable test case. The runner only needs to run it and record
/// its outcome; bodies are opaque (here, compiled Rhai snippets).
pub trait TestItem {
    fn name(&self) -> &str;
    fn run(&self) -> TestOutcome;
}
