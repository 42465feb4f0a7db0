use std::fmt;

/// A recognized lifecycle hook, with an escape hatch for suite-defined
/// custom names. The fixed set gets compile-time coverage in the runner;
/// custom hooks stay addressable through the same registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum HookKind {
    StrictSetup,
    LazySetup,
    StrictTeardown,
    LazyTeardown,
    Custom(String),
}

pub const RECOGNIZED_HOOKS: [HookKind; 4] = [
    HookKind::StrictSetup,
    HookKind::LazySetup,
    HookKind::StrictTeardown,
    HookKind::LazyTeardown,
];

impl HookKind {
    pub fn name(&self) -> &str {
        match self {
            Self::StrictSetup => "strict_setup",
            Self::LazySetup => "lazy_setup",
            Self::StrictTeardown => "strict_teardown",
            Self::LazyTeardown => "lazy_teardown",
            Self::Custom(name) => name.as_str(),
        }
    }

    pub fn parse(name: &str) -> Self {
        match name {
            "strict_setup" => Self::StrictSetup,
            "lazy_setup" => Self::LazySetup,
            "strict_teardown" => Self::StrictTeardown,
            "lazy_teardown" => Self::LazyTeardown,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
