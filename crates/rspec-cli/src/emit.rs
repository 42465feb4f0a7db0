use rspec_core::{RhaiSpecError, TestOutcome};
use rspec_runner::{BlockReport, ItemReport};

fn json_text(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

pub(crate) fn emit_suite_header(source: &str, name: &str) {
    println!("SUITE:{}|{}", source, json_text(name));
}

/// One line per item, depth-first, in execution order.
pub(crate) fn emit_block(report: &BlockReport) {
    for child in &report.children {
        match child {
            ItemReport::Test { name, outcome } => {
                println!("TEST:{}|{}", outcome.kind_name(), json_text(name));
                match outcome {
                    TestOutcome::Passed => {}
                    TestOutcome::Failed { reason } | TestOutcome::Errored { reason } => {
                        println!("REASON_JSON:{}", json_text(reason));
                    }
                }
            }
            ItemReport::Suite(inner) => {
                println!("BLOCK:{}", json_text(&inner.name));
                emit_block(inner);
            }
        }
    }

    if report.children_skipped {
        println!("CHILDREN_SKIPPED:{}", json_text(&report.name));
    }
    if let Some(failure) = &report.failure {
        println!("BLOCK_FAIL_JSON:{}", json_text(&failure.to_string()));
    }
}

pub(crate) fn emit_error(error: RhaiSpecError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!("ERROR_MSG_JSON:{}", json_text(&error.message));
    1
}
