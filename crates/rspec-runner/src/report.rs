use std::collections::BTreeMap;

use rspec_core::TestOutcome;

use crate::BlockFailure;

/// Result of running one block: terminal outcome, per-child results and the
/// per-hook success flags touched during the run.
#[derive(Debug)]
pub struct BlockReport {
    pub name: String,
    pub children: Vec<ItemReport>,
    /// None on success, the single failure, or an aggregate of several.
    pub failure: Option<BlockFailure>,
    pub hook_outcomes: BTreeMap<String, bool>,
    /// True when a before-hook failure prevented the children from being
    /// attempted at all.
    pub children_skipped: bool,
}

#[derive(Debug)]
pub enum ItemReport {
    Suite(BlockReport),
    Test { name: String, outcome: TestOutcome },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored
    }
}

impl BlockReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Leaf-test counts across the whole subtree.
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        self.accumulate(&mut summary);
        summary
    }

    fn accumulate(&self, summary: &mut RunSummary) {
        for child in &self.children {
            match child {
                ItemReport::Suite(report) => report.accumulate(summary),
                ItemReport::Test { outcome, .. } => match outcome {
                    TestOutcome::Passed => summary.passed += 1,
                    TestOutcome::Failed { .. } => summary.failed += 1,
                    TestOutcome::Errored { .. } => summary.errored += 1,
                },
            }
        }
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;

    fn test_report(name: &str, outcome: TestOutcome) -> ItemReport {
        ItemReport::Test {
            name: name.to_string(),
            outcome,
        }
    }

    #[test]
    fn summary_counts_leaf_tests_across_nesting() {
        let inner = BlockReport {
            name: "inner".to_string(),
            children: vec![
                test_report("a", TestOutcome::Passed),
                test_report(
                    "b",
                    TestOutcome::Failed {
                        reason: "x".to_string(),
                    },
                ),
            ],
            failure: None,
            hook_outcomes: BTreeMap::new(),
            children_skipped: false,
        };
        let outer = BlockReport {
            name: "outer".to_string(),
            children: vec![
                ItemReport::Suite(inner),
                test_report(
                    "c",
                    TestOutcome::Errored {
                        reason: "y".to_string(),
                    },
                ),
            ],
            failure: None,
            hook_outcomes: BTreeMap::new(),
            children_skipped: false,
        };

        let summary = outer.summary();
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn passed_tracks_the_absence_of_a_terminal_failure() {
        let clean = BlockReport {
            name: "clean".to_string(),
            children: Vec::new(),
            failure: None,
            hook_outcomes: BTreeMap::new(),
            children_skipped: false,
        };
        assert!(clean.passed());

        let broken = BlockReport {
            failure: Some(BlockFailure::Child {
                name: "t".to_string(),
                verdict: "failed".to_string(),
                reason: "boom".to_string(),
            }),
            ..clean
        };
        assert!(!broken.passed());
    }
}
