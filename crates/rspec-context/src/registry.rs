use std::collections::BTreeMap;

use rspec_core::{HookKind, RhaiSpecError, RECOGNIZED_HOOKS};

use crate::context::{HookAction, ScopeContext};

/// Lifecycle executor registry. Hooks are registered during tree assembly and
/// read-only afterwards; outcome bookkeeping records, per hook name, whether
/// the last run succeeded. Outcomes are observability only and never gate a
/// later hook.
impl ScopeContext {
    pub fn register_hook(&self, kind: HookKind, action: HookAction) -> Result<(), RhaiSpecError> {
        if self.rejected.borrow().contains(&kind) {
            return Err(RhaiSpecError::new(
                "CONTEXT_HOOK_REJECTED",
                format!(
                    "Hook \"{}\" is not supported inside context \"{}\".",
                    kind.name(),
                    self.name()
                ),
            ));
        }
        self.executors.borrow_mut().insert(kind, action);
        Ok(())
    }

    /// Refuse future registrations of `kind` on this context.
    pub fn reject_hook(&self, kind: HookKind) {
        self.rejected.borrow_mut().insert(kind);
    }

    /// Refuse all recognized lifecycle hooks on this context.
    pub fn reject_all_hooks(&self) {
        for kind in RECOGNIZED_HOOKS {
            self.reject_hook(kind);
        }
    }

    pub fn has_hook(&self, kind: &HookKind) -> bool {
        self.executors.borrow().contains_key(kind)
    }

    /// Run the ancestors' hooks named `kind` first (root outward), then this
    /// context's own. With `propagate_up` false only the own hook runs.
    pub fn execute(&self, kind: &HookKind, propagate_up: bool) -> Result<(), RhaiSpecError> {
        if propagate_up {
            if let Some(parent) = self.parent() {
                parent.execute(kind, true)?;
            }
        }
        self.run_own(kind)
    }

    /// Run this context's own hook named `kind` first, then the ancestors'
    /// (leaf outward). Teardown uses this so inner resources release before
    /// outer ones.
    pub fn execute_reverse(&self, kind: &HookKind, propagate_up: bool) -> Result<(), RhaiSpecError> {
        self.run_own(kind)?;
        if propagate_up {
            if let Some(parent) = self.parent() {
                parent.execute_reverse(kind, true)?;
            }
        }
        Ok(())
    }

    /// Success flag for `kind`, defined only once the hook name has been
    /// looked up at least once.
    pub fn hook_outcome(&self, kind: &HookKind) -> Option<bool> {
        self.outcomes.borrow().get(kind).copied()
    }

    /// Snapshot of every touched hook name and its success flag.
    pub fn hook_outcomes(&self) -> BTreeMap<String, bool> {
        self.outcomes
            .borrow()
            .iter()
            .map(|(kind, succeeded)| (kind.name().to_string(), *succeeded))
            .collect()
    }

    fn run_own(&self, kind: &HookKind) -> Result<(), RhaiSpecError> {
        // Looking a hook up defines its outcome flag, present or not.
        self.outcomes
            .borrow_mut()
            .entry(kind.clone())
            .or_insert(true);

        let action = self.executors.borrow().get(kind).cloned();
        let Some(action) = action else {
            return Ok(());
        };

        if let Err(error) = action(self) {
            self.outcomes.borrow_mut().insert(kind.clone(), false);
            return Err(error);
        }
        Ok(())
    }
}
