use std::rc::Rc;

use rhai::{Dynamic, Engine, EvalAltResult, Position};
use rspec_context::{Environment, HookAction, ScopeContext};
use rspec_core::{HookKind, RhaiSpecError, TestItem, TestOutcome};
use rspec_runner::ActionCompiler;

use crate::bridge::{dynamic_to_spec, spec_to_dynamic};

/// Prefix on runtime errors raised by `fail`/`expect`, so deliberate
/// assertion failures can be told apart from genuine script errors.
const FAILURE_MARKER: &str = "__rhaispec_failure__: ";

/// Compiles hook and test bodies into Rhai actions. Each invocation builds a
/// fresh engine whose `get`/`set`/`has` bindings close over the environment
/// the owning context resolves to.
#[derive(Debug, Default)]
pub struct RhaiHost;

impl RhaiHost {
    pub fn new() -> Self {
        Self
    }
}

impl ActionCompiler for RhaiHost {
    fn compile_hook(
        &self,
        _context: &Rc<ScopeContext>,
        hook: &HookKind,
        source: &str,
    ) -> Result<HookAction, RhaiSpecError> {
        check_compiles(source, &format!("hook \"{}\"", hook.name()))?;
        let source = source.to_string();
        Ok(Rc::new(move |context: &ScopeContext| {
            let env = context.resolve_env()?;
            run_source(&env, &source)
        }))
    }

    fn compile_test(
        &self,
        context: &Rc<ScopeContext>,
        name: &str,
        body: &str,
    ) -> Result<Box<dyn TestItem>, RhaiSpecError> {
        check_compiles(body, &format!("test \"{}\"", name))?;
        Ok(Box::new(RhaiTest {
            name: name.to_string(),
            source: body.to_string(),
            context: Rc::clone(context),
        }))
    }
}

struct RhaiTest {
    name: String,
    source: String,
    context: Rc<ScopeContext>,
}

impl TestItem for RhaiTest {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> TestOutcome {
        let env = match self.context.resolve_env() {
            Ok(env) => env,
            Err(error) => {
                return TestOutcome::Errored {
                    reason: error.to_string(),
                }
            }
        };
        match run_source(&env, &self.source) {
            Ok(()) => TestOutcome::Passed,
            Err(error) if error.code == "SCRIPT_ASSERT" => TestOutcome::Failed {
                reason: error.message,
            },
            Err(error) => TestOutcome::Errored {
                reason: error.to_string(),
            },
        }
    }
}

/// Syntax check at assembly time, so a broken body fails the whole load
/// instead of surfacing mid-run.
fn check_compiles(source: &str, what: &str) -> Result<(), RhaiSpecError> {
    Engine::new().compile(source).map(|_| ()).map_err(|error| {
        RhaiSpecError::new(
            "SCRIPT_COMPILE",
            format!("Compile failed for {}: {}", what, error),
        )
    })
}

fn run_source(env: &Environment, source: &str) -> Result<(), RhaiSpecError> {
    let engine = build_engine(env);
    engine.run(source).map_err(|error| {
        let message = error.to_string();
        match split_failure(&message) {
            Some(reason) => RhaiSpecError::new("SCRIPT_ASSERT", reason),
            None => RhaiSpecError::new("SCRIPT_EVAL", format!("Script eval failed: {}", message)),
        }
    })
}

fn build_engine(env: &Environment) -> Engine {
    let mut engine = Engine::new();
    engine.set_strict_variables(true);

    let get_env = env.clone();
    engine.register_fn(
        "get",
        move |name: &str| -> Result<Dynamic, Box<EvalAltResult>> {
            match get_env.get(name) {
                Some(value) => spec_to_dynamic(&value).map_err(runtime_error),
                None => Err(runtime_error(RhaiSpecError::new(
                    "SCRIPT_NAME_UNDEFINED",
                    format!("Name \"{}\" is not defined in scope.", name),
                ))),
            }
        },
    );

    let set_env = env.clone();
    engine.register_fn(
        "set",
        move |name: &str, value: Dynamic| -> Result<(), Box<EvalAltResult>> {
            let value = dynamic_to_spec(value).map_err(runtime_error)?;
            set_env.set(name, value);
            Ok(())
        },
    );

    let has_env = env.clone();
    engine.register_fn("has", move |name: &str| -> bool { has_env.has(name) });

    engine.register_fn("fail", |message: &str| -> Result<(), Box<EvalAltResult>> {
        Err(failure_error(message))
    });

    engine.register_fn(
        "expect",
        |passed: bool, message: &str| -> Result<(), Box<EvalAltResult>> {
            if passed {
                Ok(())
            } else {
                Err(failure_error(message))
            }
        },
    );

    engine
}

fn runtime_error(error: RhaiSpecError) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(
        Dynamic::from(error.to_string()),
        Position::NONE,
    ))
}

fn failure_error(message: &str) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(
        Dynamic::from(format!("{}{}", FAILURE_MARKER, message)),
        Position::NONE,
    ))
}

/// Rhai wraps runtime errors with call positions; keep only the message the
/// suite author wrote.
fn split_failure(message: &str) -> Option<String> {
    let at = message.find(FAILURE_MARKER)?;
    let tail = &message[at + FAILURE_MARKER.len()..];
    let end = tail.find(" (line ").unwrap_or(tail.len());
    Some(tail[..end].to_string())
}
