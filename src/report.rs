use crate::resolver::ResolvedPaths;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// What a build would do, without doing it.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub paths: ResolvedPaths,
    pub command: String,
    pub search_path_var: String,
    pub search_path: String,
    pub atomic_write: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub output_path: PathBuf,
    pub index_html: PathBuf,
    pub bytes_written: u64,
    pub idl_bytes: usize,
    pub idl_lines: usize,
    pub extractor_duration: Duration,
    pub generated_at: DateTime<Utc>,
}

impl BuildReport {
    pub fn new(
        paths: &ResolvedPaths,
        idl: &str,
        bytes_written: u64,
        extractor_duration: Duration,
    ) -> Self {
        Self {
            output_path: paths.output.clone(),
            index_html: paths.index_html.clone(),
            bytes_written,
            idl_bytes: idl.len(),
            idl_lines: idl.lines().count(),
            extractor_duration,
            generated_at: Utc::now(),
        }
    }
}
