mod context;
mod environment;
mod registry;

pub use context::{HookAction, ScopeContext};
pub use environment::Environment;
