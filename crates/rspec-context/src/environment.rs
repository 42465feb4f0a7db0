use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use rspec_core::SpecValue;

/// A variable scope with an optional read-fallback delegate and an optional
/// write-redirect target. Each resolution mode is expressed through this one
/// composition object instead of host-language capture, so the chain stays
/// inspectable and write redirection is explicit.
///
/// Cloning shares the underlying table; `ptr_eq` identity is what the
/// memoization contract of `ScopeContext::resolve_env` is stated in terms of.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    inner: Rc<RefCell<EnvTable>>,
}

#[derive(Debug, Default)]
struct EnvTable {
    locals: BTreeMap<String, SpecValue>,
    read_fallback: Option<Environment>,
    write_target: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh scope whose missed reads fall through to `parent`; writes stay
    /// local, so the child can shadow without touching the ancestor chain.
    pub fn wrapping(parent: &Environment) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvTable {
                locals: BTreeMap::new(),
                read_fallback: Some(parent.clone()),
                write_target: None,
            })),
        }
    }

    /// A scope whose writes are redirected into `write_target` and whose
    /// missed reads fall through to `read_fallback`. The local table stays
    /// empty for the lifetime of the scope.
    pub fn redirecting(write_target: &Environment, read_fallback: &Environment) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvTable {
                locals: BTreeMap::new(),
                read_fallback: Some(read_fallback.clone()),
                write_target: Some(write_target.clone()),
            })),
        }
    }

    pub fn get(&self, name: &str) -> Option<SpecValue> {
        let table = self.inner.borrow();
        if let Some(value) = table.locals.get(name) {
            return Some(value.clone());
        }
        table.read_fallback.as_ref().and_then(|delegate| delegate.get(name))
    }

    pub fn set(&self, name: &str, value: SpecValue) {
        let target = self.inner.borrow().write_target.clone();
        match target {
            Some(target) => target.set(name, value),
            None => {
                self.inner
                    .borrow_mut()
                    .locals
                    .insert(name.to_string(), value);
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True only when `name` is bound in this scope's own table, ignoring the
    /// fallback chain.
    pub fn has_local(&self, name: &str) -> bool {
        self.inner.borrow().locals.contains_key(name)
    }

    /// An independent environment holding a copy of this scope's local
    /// bindings, with no delegates. Mutations on the copy never reach the
    /// original.
    pub fn deep_copy(&self) -> Environment {
        Self {
            inner: Rc::new(RefCell::new(EnvTable {
                locals: self.inner.borrow().locals.clone(),
                read_fallback: None,
                write_target: None,
            })),
        }
    }

    pub fn same_table(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
