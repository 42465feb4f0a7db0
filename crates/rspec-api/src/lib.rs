use rspec_core::{RhaiSpecError, SuiteDoc, SuiteSpec, SUITE_SCHEMA_V1};
use rspec_runner::{assemble_suite, BlockNode, BlockReport, BlockRunner};
use rspec_script::RhaiHost;

#[derive(Debug, Clone)]
pub struct RunSuiteOptions {
    pub suite_json: String,
    pub random_seed: Option<u32>,
}

/// Parse one `*.suite.json` document and validate its schema marker.
pub fn parse_suite_doc(raw: &str) -> Result<SuiteSpec, RhaiSpecError> {
    let doc: SuiteDoc = serde_json::from_str(raw).map_err(|error| {
        RhaiSpecError::new(
            "API_SUITE_PARSE",
            format!("Suite document is not valid JSON: {}", error),
        )
    })?;

    if doc.schema_version != SUITE_SCHEMA_V1 {
        return Err(RhaiSpecError::new(
            "API_SUITE_SCHEMA",
            format!(
                "Unsupported suite schema \"{}\", expected \"{}\".",
                doc.schema_version, SUITE_SCHEMA_V1
            ),
        ));
    }

    Ok(doc.suite)
}

/// Assemble the runnable block tree without running it. Compile errors in
/// hook or test bodies surface here.
pub fn assemble_suite_from_json(raw: &str) -> Result<BlockNode, RhaiSpecError> {
    let spec = parse_suite_doc(raw)?;
    assemble_suite(&spec, &RhaiHost::new())
}

pub fn run_suite(
    spec: &SuiteSpec,
    random_seed: Option<u32>,
) -> Result<BlockReport, RhaiSpecError> {
    let node = assemble_suite(spec, &RhaiHost::new())?;
    Ok(BlockRunner::new(random_seed).run(&node))
}

pub fn run_suite_from_json(options: RunSuiteOptions) -> Result<BlockReport, RhaiSpecError> {
    let spec = parse_suite_doc(&options.suite_json)?;
    run_suite(&spec, options.random_seed)
}
