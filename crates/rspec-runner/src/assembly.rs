use std::rc::Rc;

use rspec_context::{HookAction, ScopeContext};
use rspec_core::{ChildSpec, HookKind, RhaiSpecError, SuiteSpec, TestItem};

use crate::block::{BlockChild, BlockNode};

/// Turns hook and test sources into executable actions during assembly.
/// The scripting crate provides the real implementation; tests use stubs.
pub trait ActionCompiler {
    fn compile_hook(
        &self,
        context: &Rc<ScopeContext>,
        hook: &HookKind,
        source: &str,
    ) -> Result<HookAction, RhaiSpecError>;

    fn compile_test(
        &self,
        context: &Rc<ScopeContext>,
        name: &str,
        body: &str,
    ) -> Result<Box<dyn TestItem>, RhaiSpecError>;
}

/// Build the runnable block tree for a parsed suite document. Rejections are
/// applied before hook registration, so a suite that both rejects and defines
/// the same hook fails assembly.
pub fn assemble_suite(
    spec: &SuiteSpec,
    compiler: &dyn ActionCompiler,
) -> Result<BlockNode, RhaiSpecError> {
    let root = ScopeContext::root(&spec.name, spec.mode);
    build_node(spec, root, compiler)
}

fn build_node(
    spec: &SuiteSpec,
    context: Rc<ScopeContext>,
    compiler: &dyn ActionCompiler,
) -> Result<BlockNode, RhaiSpecError> {
    context.set_randomize(spec.randomize);
    for name in &spec.reject_hooks {
        context.reject_hook(HookKind::parse(name));
    }
    for (name, source) in &spec.hooks {
        let kind = HookKind::parse(name);
        let action = compiler.compile_hook(&context, &kind, source)?;
        context.register_hook(kind, action)?;
    }

    let mut children = Vec::with_capacity(spec.children.len());
    for child in &spec.children {
        match child {
            ChildSpec::Suite { suite } => {
                let child_context = ScopeContext::child(&context, &suite.name, suite.mode);
                children.push(BlockChild::Suite(build_node(suite, child_context, compiler)?));
            }
            ChildSpec::Test { name, body } => {
                children.push(BlockChild::Test(compiler.compile_test(
                    &context, name, body,
                )?));
            }
        }
    }

    Ok(BlockNode { context, children })
}
