use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SUITE_SCHEMA_V1: &str = "rhaispec-suite.v1";

/// How a suite's environment is derived from its ancestors. Fixed at
/// construction and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionMode {
    /// Borrow the parent's environment object directly (same identity).
    UseParent,
    /// An independent copy of the root context's environment.
    IsolateGlobals,
    /// Writes land one ancestor level up; reads fall back to the parent.
    UnwrapOneLevel,
    /// A fresh scope whose reads fall back to the parent; writes stay local.
    WrapOverParent,
    /// Writes land two ancestor levels up; reads fall back to the parent.
    ExposeTwoLevels,
}

/// Top-level suite document as loaded from a `*.suite.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteDoc {
    pub schema_version: String,
    pub suite: SuiteSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSpec {
    pub name: String,
    #[serde(default = "default_mode")]
    pub mode: ResolutionMode,
    #[serde(default)]
    pub randomize: bool,
    /// Hook name to Rhai source. Recognized names are strict_setup,
    /// lazy_setup, strict_teardown and lazy_teardown; other names register
    /// as custom hooks for outside collaborators.
    #[serde(default)]
    pub hooks: BTreeMap<String, String>,
    /// Hook names this suite refuses to define; registering one fails
    /// assembly.
    #[serde(default)]
    pub reject_hooks: Vec<String>,
    #[serde(default)]
    pub children: Vec<ChildSpec>,
}

fn default_mode() -> ResolutionMode {
    ResolutionMode::WrapOverParent
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChildSpec {
    Suite {
        #[serde(flatten)]
        suite: SuiteSpec,
    },
    Test {
        name: String,
        body: String,
    },
}
