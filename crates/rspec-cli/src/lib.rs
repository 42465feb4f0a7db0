use std::ffi::OsString;

use clap::Parser;
use rspec_api::run_suite;
use rspec_core::{ChildSpec, RhaiSpecError, SuiteSpec};
use rspec_runner::RunSummary;

mod cli_args;
mod emit;
mod filter;
mod source_loader;

pub(crate) use cli_args::{Cli, ListArgs, Mode, RunArgs};
pub(crate) use emit::{emit_block, emit_error, emit_suite_header};
pub(crate) use filter::{apply_filter, compile_filter};
pub(crate) use source_loader::load_suites_from_dir;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return error.exit_code(),
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, RhaiSpecError> {
    match cli.command {
        Mode::Run(args) => run_suites(args),
        Mode::List(args) => list_suites(args),
    }
}

fn run_suites(args: RunArgs) -> Result<i32, RhaiSpecError> {
    let mut suites = load_suites_from_dir(&args.suites_dir)?;
    let filter = args.filter.as_deref().map(compile_filter).transpose()?;

    let mut summary = RunSummary::default();
    let mut clean = true;
    for loaded in &mut suites {
        if let Some(filter) = &filter {
            if !apply_filter(&mut loaded.spec, filter) {
                continue;
            }
        }

        emit_suite_header(&loaded.source, &loaded.spec.name);
        let report = run_suite(&loaded.spec, args.seed)?;
        emit_block(&report);

        let block_summary = report.summary();
        summary.passed += block_summary.passed;
        summary.failed += block_summary.failed;
        summary.errored += block_summary.errored;
        clean &= report.passed();
    }

    println!("RESULT:OK");
    println!(
        "SUMMARY:passed={}|failed={}|errored={}",
        summary.passed, summary.failed, summary.errored
    );
    Ok(if clean { 0 } else { 1 })
}

fn list_suites(args: ListArgs) -> Result<i32, RhaiSpecError> {
    let suites = load_suites_from_dir(&args.suites_dir)?;
    for loaded in &suites {
        emit_suite_header(&loaded.source, &loaded.spec.name);
        list_children(&loaded.spec);
    }
    println!("RESULT:OK");
    Ok(0)
}

fn list_children(spec: &SuiteSpec) {
    for child in &spec.children {
        match child {
            ChildSpec::Test { name, .. } => {
                println!(
                    "TEST:listed|{}",
                    serde_json::to_string(name).unwrap_or_else(|_| "\"\"".to_string())
                );
            }
            ChildSpec::Suite { suite } => {
                println!(
                    "BLOCK:{}",
                    serde_json::to_string(&suite.name).unwrap_or_else(|_| "\"\"".to_string())
                );
                list_children(suite);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod cli_test_support {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) fn temp_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("rhaispec-{}-{}", label, nanos))
    }

    pub(crate) fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dirs should be created");
        }
        fs::write(path, content).expect("file should be written");
    }
}
