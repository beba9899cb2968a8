use crate::config::LayoutConfig;
use crate::error::{IdlBuildError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Locations a single build works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub output: PathBuf,
    pub index_html: PathBuf,
    pub project_root: PathBuf,
}

pub struct PathResolver {
    project_root: PathBuf,
    project_marker: String,
    index_file: String,
}

impl PathResolver {
    pub fn new(layout: &LayoutConfig, project_root: PathBuf) -> Self {
        Self {
            project_root,
            project_marker: layout.project_marker.clone(),
            index_file: layout.index_file.clone(),
        }
    }

    /// Checks the sibling index file first, then the project marker.
    pub fn resolve(&self, output: &Path) -> Result<ResolvedPaths> {
        let index_html = self.index_path_for(output);
        if !index_html.is_file() {
            return Err(IdlBuildError::missing_input(&index_html));
        }

        let marker = self.project_root.join(&self.project_marker);
        if !marker.exists() {
            return Err(IdlBuildError::MissingProjectRoot { path: marker });
        }

        tracing::debug!(
            index = %index_html.display(),
            root = %self.project_root.display(),
            "resolved build paths"
        );

        Ok(ResolvedPaths {
            output: output.to_path_buf(),
            index_html,
            project_root: self.project_root.clone(),
        })
    }

    pub fn index_path_for(&self, output: &Path) -> PathBuf {
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        dir.join(&self.index_file)
    }
}
