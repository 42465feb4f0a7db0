use std::fs;
use std::path::{Path, PathBuf};

use rspec_api::parse_suite_doc;
use rspec_core::{RhaiSpecError, SuiteSpec};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub(crate) struct LoadedSuite {
    /// Path relative to the suites directory, forward slashes.
    pub(crate) source: String,
    pub(crate) spec: SuiteSpec,
}

pub(crate) fn load_suites_from_dir(suites_dir: &str) -> Result<Vec<LoadedSuite>, RhaiSpecError> {
    let root = resolve_suites_dir(suites_dir)?;
    let documents = read_suite_documents(&root)?;

    let mut suites = Vec::with_capacity(documents.len());
    for (source, raw) in documents {
        let spec = parse_suite_doc(&raw).map_err(|error| {
            RhaiSpecError::new(error.code, format!("{}: {}", source, error.message))
        })?;
        suites.push(LoadedSuite { source, spec });
    }
    Ok(suites)
}

pub(crate) fn resolve_suites_dir(suites_dir: &str) -> Result<PathBuf, RhaiSpecError> {
    let path = PathBuf::from(suites_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(|error| RhaiSpecError::new("CLI_SOURCE_PATH", error.to_string()))?
            .join(path)
    };

    if !absolute.exists() {
        return Err(RhaiSpecError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("suites-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(RhaiSpecError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("suites-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn read_suite_documents(
    suites_dir: &Path,
) -> Result<Vec<(String, String)>, RhaiSpecError> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(suites_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(path_str) = path.to_str() else {
            continue;
        };
        if !path_str.ends_with(".suite.json") {
            continue;
        }

        let relative = path
            .strip_prefix(suites_dir)
            .map_err(|error| RhaiSpecError::new("CLI_SOURCE_SCAN", error.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path)
            .map_err(|error| RhaiSpecError::new("CLI_SOURCE_READ", error.to_string()))?;
        documents.push((relative, content));
    }

    if documents.is_empty() {
        return Err(RhaiSpecError::new(
            "CLI_SOURCE_EMPTY",
            format!("No .suite.json files under {}", suites_dir.display()),
        ));
    }

    Ok(documents)
}
