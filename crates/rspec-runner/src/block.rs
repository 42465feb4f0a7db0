use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use rspec_context::ScopeContext;
use rspec_core::{HookKind, TestItem, TestOutcome};

use crate::report::{BlockReport, ItemReport};
use crate::rng::shuffle_in_place;
use crate::BlockFailure;

/// Execution phases of one block run. `Done` is reached exactly once per
/// run, whatever failed along the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    NotStarted,
    RunningBeforeHooks,
    RunningChildren,
    RunningAfterHooks,
    Done,
}

/// One node of the assembled suite tree: the scope context plus its ordered
/// children, declaration order preserved.
pub struct BlockNode {
    pub context: Rc<ScopeContext>,
    pub children: Vec<BlockChild>,
}

impl std::fmt::Debug for BlockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockNode")
            .field("name", &self.context.name())
            .field("children", &self.children.len())
            .finish()
    }
}

pub enum BlockChild {
    Suite(BlockNode),
    Test(Box<dyn TestItem>),
}

/// Drives a suite tree depth-first: before-hooks, children (optionally
/// shuffled once per block), after-hooks, with every failure collected and
/// the after-hooks guaranteed to run.
pub struct BlockRunner {
    rng_state: Rc<RefCell<u32>>,
}

impl BlockRunner {
    pub fn new(random_seed: Option<u32>) -> Self {
        let seed = random_seed.unwrap_or_else(seed_from_clock);
        Self {
            rng_state: Rc::new(RefCell::new(seed)),
        }
    }

    pub fn run(&self, node: &BlockNode) -> BlockReport {
        self.run_block(node)
    }

    fn run_block(&self, node: &BlockNode) -> BlockReport {
        let context = &node.context;
        let mut failures: Vec<BlockFailure> = Vec::new();
        let mut child_reports: Vec<ItemReport> = Vec::new();
        let mut children_skipped = false;

        let mut state = BlockState::NotStarted;
        while state != BlockState::Done {
            state = match state {
                BlockState::NotStarted => BlockState::RunningBeforeHooks,
                BlockState::RunningBeforeHooks => {
                    if let Err(source) = context.resolve_env() {
                        failures.push(BlockFailure::Resolution { source });
                        children_skipped = !node.children.is_empty();
                        BlockState::RunningAfterHooks
                    } else {
                        match context.execute(&HookKind::StrictSetup, false) {
                            Ok(()) => BlockState::RunningChildren,
                            Err(source) => {
                                failures.push(BlockFailure::Hook {
                                    hook: HookKind::StrictSetup.name().to_string(),
                                    source,
                                });
                                children_skipped = !node.children.is_empty();
                                BlockState::RunningAfterHooks
                            }
                        }
                    }
                }
                BlockState::RunningChildren => {
                    for index in self.child_order(node) {
                        match &node.children[index] {
                            BlockChild::Test(item) => {
                                let outcome = item.run();
                                match &outcome {
                                    TestOutcome::Passed => {}
                                    TestOutcome::Failed { reason } => {
                                        failures.push(BlockFailure::Child {
                                            name: item.name().to_string(),
                                            verdict: "failed".to_string(),
                                            reason: reason.clone(),
                                        });
                                    }
                                    TestOutcome::Errored { reason } => {
                                        failures.push(BlockFailure::Child {
                                            name: item.name().to_string(),
                                            verdict: "errored".to_string(),
                                            reason: reason.clone(),
                                        });
                                    }
                                }
                                child_reports.push(ItemReport::Test {
                                    name: item.name().to_string(),
                                    outcome,
                                });
                            }
                            BlockChild::Suite(child) => {
                                let report = self.run_block(child);
                                if let Some(failure) = &report.failure {
                                    failures.push(BlockFailure::Child {
                                        name: report.name.clone(),
                                        verdict: "failed".to_string(),
                                        reason: failure.to_string(),
                                    });
                                }
                                child_reports.push(ItemReport::Suite(report));
                            }
                        }
                    }
                    BlockState::RunningAfterHooks
                }
                BlockState::RunningAfterHooks => {
                    // Both teardown hooks always run, failures or not.
                    for kind in [HookKind::StrictTeardown, HookKind::LazyTeardown] {
                        if let Err(source) = context.execute_reverse(&kind, false) {
                            failures.push(BlockFailure::Hook {
                                hook: kind.name().to_string(),
                                source,
                            });
                        }
                    }
                    BlockState::Done
                }
                BlockState::Done => BlockState::Done,
            };
        }

        let failure = match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(BlockFailure::Aggregate { failures }),
        };

        BlockReport {
            name: context.name().to_string(),
            children: child_reports,
            failure,
            hook_outcomes: context.hook_outcomes(),
            children_skipped,
        }
    }

    /// Declaration order, shuffled exactly once when the block asks for it.
    fn child_order(&self, node: &BlockNode) -> Vec<usize> {
        let mut order: Vec<usize> = (0..node.children.len()).collect();
        if node.context.randomize() {
            let mut state = self.rng_state.borrow_mut();
            shuffle_in_place(&mut order, &mut state);
        }
        order
    }
}

fn seed_from_clock() -> u32 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.subsec_nanos() ^ (elapsed.as_secs() as u32),
        Err(_) => 0x9e37_79b9,
    }
}
