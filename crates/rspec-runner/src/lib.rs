mod assembly;
mod block;
mod report;
mod rng;

pub use assembly::{assemble_suite, ActionCompiler};
pub use block::{BlockChild, BlockNode, BlockRunner, BlockState};
pub use report::{BlockReport, ItemReport, RunSummary};

use rspec_core::RhaiSpecError;
use thiserror::Error;

/// A failure collected while running one block. Failures are never swallowed:
/// every hook failure and child failure lands here, and two or more within
/// the same block combine into `Aggregate` in collection order.
#[derive(Debug, Error, Clone)]
pub enum BlockFailure {
    #[error("environment resolution failed: {source}")]
    Resolution { source: RhaiSpecError },
    #[error("hook \"{hook}\" failed: {source}")]
    Hook { hook: String, source: RhaiSpecError },
    #[error("child \"{name}\" {verdict}: {reason}")]
    Child {
        name: String,
        verdict: String,
        reason: String,
    },
    #[error("{} failures collected within block", .failures.len())]
    Aggregate { failures: Vec<BlockFailure> },
}

impl BlockFailure {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Resolution { .. } => "resolution",
            Self::Hook { .. } => "hook",
            Self::Child { .. } => "child",
            Self::Aggregate { .. } => "aggregate",
        }
    }
}
