use regex::Regex;
use rspec_core::{ChildSpec, RhaiSpecError, SuiteSpec};

pub(crate) fn compile_filter(pattern: &str) -> Result<Regex, RhaiSpecError> {
    Regex::new(pattern).map_err(|error| {
        RhaiSpecError::new(
            "CLI_FILTER_INVALID",
            format!("Invalid --filter regex: {}", error),
        )
    })
}

/// Prune leaf tests whose names do not match. Nested suites are kept only
/// while they still hold at least one matching test; hooks stay untouched so
/// surviving tests keep their fixtures.
pub(crate) fn apply_filter(spec: &mut SuiteSpec, filter: &Regex) -> bool {
    spec.children.retain_mut(|child| match child {
        ChildSpec::Test { name, .. } => filter.is_match(name),
        ChildSpec::Suite { suite } => apply_filter(suite, filter),
    });
    !spec.children.is_empty()
}
