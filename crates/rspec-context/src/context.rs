use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use rspec_core::{HookKind, ResolutionMode, RhaiSpecError};

use crate::Environment;

/// A zero-argument lifecycle action registered against a context. Actions
/// receive the context so they can resolve the environment visible to them.
pub type HookAction = Rc<dyn Fn(&ScopeContext) -> Result<(), RhaiSpecError>>;

/// The scope-and-lifecycle node attached to one suite in the test tree.
///
/// Holds the fixed resolution mode, the lazily memoized environment, the
/// executor registry and its per-hook outcome bookkeeping. The tree shape
/// mirrors suite nesting: every non-root context keeps one parent link for
/// its whole lifetime, and resolution only ever walks upward.
pub struct ScopeContext {
    name: String,
    parent: Option<Rc<ScopeContext>>,
    mode: ResolutionMode,
    env: RefCell<Option<Environment>>,
    randomize: Cell<bool>,
    pub(crate) executors: RefCell<BTreeMap<HookKind, HookAction>>,
    pub(crate) outcomes: RefCell<BTreeMap<HookKind, bool>>,
    pub(crate) rejected: RefCell<BTreeSet<HookKind>>,
}

impl ScopeContext {
    pub fn root(name: impl Into<String>, mode: ResolutionMode) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            parent: None,
            mode,
            env: RefCell::new(None),
            randomize: Cell::new(false),
            executors: RefCell::new(BTreeMap::new()),
            outcomes: RefCell::new(BTreeMap::new()),
            rejected: RefCell::new(BTreeSet::new()),
        })
    }

    pub fn child(parent: &Rc<ScopeContext>, name: impl Into<String>, mode: ResolutionMode) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            parent: Some(Rc::clone(parent)),
            mode,
            env: RefCell::new(None),
            randomize: Cell::new(false),
            executors: RefCell::new(BTreeMap::new()),
            outcomes: RefCell::new(BTreeMap::new()),
            rejected: RefCell::new(BTreeSet::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub fn parent(&self) -> Option<&Rc<ScopeContext>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn randomize(&self) -> bool {
        self.randomize.get()
    }

    pub fn set_randomize(&self, randomize: bool) {
        self.randomize.set(randomize);
    }

    /// Resolve the environment visible to this context. Computed at most once
    /// per context; every later call returns the same table.
    pub fn resolve_env(&self) -> Result<Environment, RhaiSpecError> {
        if let Some(env) = self.env.borrow().as_ref() {
            return Ok(env.clone());
        }

        let resolved = match self.mode {
            ResolutionMode::UseParent => match &self.parent {
                Some(parent) => parent.resolve_env()?,
                None => {
                    return Err(RhaiSpecError::new(
                        "CONTEXT_PARENT_MISSING",
                        format!(
                            "Context \"{}\" has no parent environment to borrow.",
                            self.name
                        ),
                    ))
                }
            },
            ResolutionMode::WrapOverParent => match &self.parent {
                Some(parent) => Environment::wrapping(&parent.resolve_env()?),
                None => Environment::new(),
            },
            ResolutionMode::UnwrapOneLevel => self.redirected_env(1)?,
            ResolutionMode::ExposeTwoLevels => self.redirected_env(2)?,
            ResolutionMode::IsolateGlobals => match &self.parent {
                Some(parent) => Self::topmost(parent).resolve_env()?.deep_copy(),
                None => Environment::new(),
            },
        };

        *self.env.borrow_mut() = Some(resolved.clone());
        Ok(resolved)
    }

    /// Writes go to the environment `levels` ancestors up; missed reads fall
    /// through to the immediate parent's chain. Walking past the root
    /// saturates at the root.
    fn redirected_env(&self, levels: usize) -> Result<Environment, RhaiSpecError> {
        let Some(parent) = &self.parent else {
            return Err(RhaiSpecError::new(
                "CONTEXT_PARENT_MISSING",
                format!(
                    "Context \"{}\" has no ancestor to redirect writes into.",
                    self.name
                ),
            ));
        };

        let mut target = Rc::clone(parent);
        for _ in 1..levels {
            let next = match target.parent() {
                Some(ancestor) => Rc::clone(ancestor),
                None => break,
            };
            target = next;
        }

        let write_target = target.resolve_env()?;
        let read_fallback = parent.resolve_env()?;
        Ok(Environment::redirecting(&write_target, &read_fallback))
    }

    fn topmost(context: &Rc<ScopeContext>) -> Rc<ScopeContext> {
        let mut current = Rc::clone(context);
        loop {
            let next = match current.parent() {
                Some(parent) => Rc::clone(parent),
                None => break,
            };
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod context_tests {
    use super::*;
    use rspec_core::SpecValue;

    fn number(value: f64) -> SpecValue {
        SpecValue::Number(value)
    }

    #[test]
    fn resolve_env_is_memoized_and_reference_stable() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        let first = root.resolve_env().expect("root env should resolve");
        let second = root.resolve_env().expect("root env should resolve again");
        assert!(first.same_table(&second));
    }

    #[test]
    fn use_parent_on_root_fails_with_resolution_error() {
        let root = ScopeContext::root("root", ResolutionMode::UseParent);
        let error = root.resolve_env().expect_err("root borrow should fail");
        assert_eq!(error.code, "CONTEXT_PARENT_MISSING");
    }

    #[test]
    fn use_parent_shares_the_parent_environment_identity() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        let child = ScopeContext::child(&root, "child", ResolutionMode::UseParent);

        let child_env = child.resolve_env().expect("child env should resolve");
        let root_env = root.resolve_env().expect("root env should resolve");
        assert!(child_env.same_table(&root_env));

        child_env.set("seen", number(1.0));
        assert_eq!(root_env.get("seen"), Some(number(1.0)));
    }

    #[test]
    fn wrap_over_parent_shadows_without_leaking_writes_up() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        let child = ScopeContext::child(&root, "child", ResolutionMode::WrapOverParent);

        let root_env = root.resolve_env().expect("root env should resolve");
        root_env.set("count", number(1.0));

        let child_env = child.resolve_env().expect("child env should resolve");
        assert_eq!(child_env.get("count"), Some(number(1.0)));

        child_env.set("count", number(2.0));
        child_env.set("only_here", number(3.0));
        assert_eq!(root_env.get("count"), Some(number(1.0)));
        assert_eq!(root_env.get("only_here"), None);
    }

    #[test]
    fn unwrap_one_level_writes_become_visible_in_the_parent_immediately() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        let suite = ScopeContext::child(&root, "suite", ResolutionMode::WrapOverParent);
        let injector = ScopeContext::child(&suite, "injector", ResolutionMode::UnwrapOneLevel);

        let injector_env = injector.resolve_env().expect("injector env should resolve");
        injector_env.set("fixture", number(42.0));

        let suite_env = suite.resolve_env().expect("suite env should resolve");
        assert_eq!(suite_env.get("fixture"), Some(number(42.0)));
        assert!(suite_env.has_local("fixture"));
        assert_eq!(injector_env.get("fixture"), Some(number(42.0)));
        assert!(!root
            .resolve_env()
            .expect("root env should resolve")
            .has_local("fixture"));
    }

    #[test]
    fn expose_two_levels_skips_the_immediate_parent_locals() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        let outer = ScopeContext::child(&root, "outer", ResolutionMode::WrapOverParent);
        let inner = ScopeContext::child(&outer, "inner", ResolutionMode::WrapOverParent);
        let injector = ScopeContext::child(&inner, "injector", ResolutionMode::ExposeTwoLevels);

        let injector_env = injector.resolve_env().expect("injector env should resolve");
        injector_env.set("fixture", number(7.0));

        let outer_env = outer.resolve_env().expect("outer env should resolve");
        let inner_env = inner.resolve_env().expect("inner env should resolve");
        assert!(outer_env.has_local("fixture"));
        assert!(!inner_env.has_local("fixture"));
        // Still reachable from the inner suite through its own fallback chain.
        assert_eq!(inner_env.get("fixture"), Some(number(7.0)));
    }

    #[test]
    fn redirect_walk_saturates_at_the_root() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        let child = ScopeContext::child(&root, "child", ResolutionMode::ExposeTwoLevels);

        let env = child.resolve_env().expect("child env should resolve");
        env.set("hoisted", number(1.0));
        assert!(root
            .resolve_env()
            .expect("root env should resolve")
            .has_local("hoisted"));
    }

    #[test]
    fn redirect_on_root_fails_with_resolution_error() {
        let root = ScopeContext::root("root", ResolutionMode::UnwrapOneLevel);
        let error = root.resolve_env().expect_err("root redirect should fail");
        assert_eq!(error.code, "CONTEXT_PARENT_MISSING");
    }

    #[test]
    fn isolate_globals_copies_root_environment() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        let mid = ScopeContext::child(&root, "mid", ResolutionMode::WrapOverParent);
        let isolated = ScopeContext::child(&mid, "isolated", ResolutionMode::IsolateGlobals);

        root.resolve_env()
            .expect("root env should resolve")
            .set("global", number(1.0));

        let isolated_env = isolated.resolve_env().expect("isolated env should resolve");
        assert_eq!(isolated_env.get("global"), Some(number(1.0)));

        isolated_env.set("global", number(99.0));
        assert_eq!(
            root.resolve_env()
                .expect("root env should resolve")
                .get("global"),
            Some(number(1.0))
        );
    }

    #[test]
    fn isolate_globals_on_root_yields_a_fresh_environment() {
        let root = ScopeContext::root("root", ResolutionMode::IsolateGlobals);
        let env = root.resolve_env().expect("root env should resolve");
        assert_eq!(env.get("anything"), None);
    }

    #[test]
    fn randomize_flag_defaults_off_and_toggles() {
        let root = ScopeContext::root("root", ResolutionMode::WrapOverParent);
        assert!(!root.randomize());
        root.set_randomize(true);
        assert!(root.randomize());
    }
}
