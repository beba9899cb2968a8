use crate::config::ExtractorConfig;
use crate::error::{IdlBuildError, Result};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A fully prepared extractor invocation. The environment overlay applies to
/// the child only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCommand {
    pub program: String,
    pub args: Vec<OsString>,
    pub env: Vec<(String, OsString)>,
}

impl ExtractionCommand {
    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_os_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        command
    }

    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }
}

impl fmt::Display for ExtractionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}", self.program)?;
        for arg in &self.args {
            write!(f, ", {:?}", arg.to_string_lossy())?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    pub text: String,
    pub duration: Duration,
}

pub struct ExtractionInvoker {
    config: ExtractorConfig,
    project_root: PathBuf,
    inherited_search_path: Option<OsString>,
}

impl ExtractionInvoker {
    pub fn new(config: &ExtractorConfig, project_root: PathBuf) -> Self {
        let inherited_search_path = std::env::var_os(&config.search_path_var);
        Self {
            config: config.clone(),
            project_root,
            inherited_search_path,
        }
    }

    /// Replaces the value read from this process's environment.
    pub fn with_inherited_search_path(mut self, value: Option<OsString>) -> Self {
        self.inherited_search_path = value;
        self
    }

    pub fn library_paths(&self) -> Vec<PathBuf> {
        self.config
            .libraries
            .iter()
            .map(|lib| self.project_root.join(lib))
            .collect()
    }

    pub fn script_path(&self) -> PathBuf {
        self.project_root.join(&self.config.script)
    }

    /// Fails on the first vendored library that is not on disk.
    pub fn check_libraries(&self) -> Result<Vec<PathBuf>> {
        let libraries = self.library_paths();
        for lib in &libraries {
            if !lib.exists() {
                return Err(IdlBuildError::missing_dependency(lib));
            }
        }
        Ok(libraries)
    }

    /// Library parents first, then whatever the caller already had.
    pub fn search_path(&self, libraries: &[PathBuf]) -> Result<OsString> {
        let mut entries: Vec<PathBuf> = libraries
            .iter()
            .map(|lib| lib.parent().map(Path::to_path_buf).unwrap_or_else(|| lib.clone()))
            .collect();

        if let Some(ref inherited) = self.inherited_search_path {
            entries.extend(std::env::split_paths(inherited).filter(|p| !p.as_os_str().is_empty()));
        }

        std::env::join_paths(entries).map_err(|e| IdlBuildError::Config {
            message: format!("Cannot build {}: {}", self.config.search_path_var, e),
        })
    }

    pub fn command_for(&self, index_html: &Path) -> Result<ExtractionCommand> {
        let libraries = self.check_libraries()?;
        let search_path = self.search_path(&libraries)?;

        Ok(ExtractionCommand {
            program: self.config.interpreter.clone(),
            args: vec![
                self.script_path().into_os_string(),
                index_html.as_os_str().to_os_string(),
            ],
            env: vec![(self.config.search_path_var.clone(), search_path)],
        })
    }

    /// Blocks until the extractor exits. Stderr goes straight to the terminal.
    pub fn run(&self, command: &ExtractionCommand) -> Result<ExtractionOutput> {
        let start = Instant::now();
        let output = command
            .to_command()
            .output()
            .map_err(|source| IdlBuildError::ExtractorSpawn {
                program: command.program.clone(),
                source,
            })?;
        let duration = start.elapsed();

        tracing::debug!(
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            elapsed_ms = duration.as_millis() as u64,
            "extractor finished"
        );

        if !output.status.success() {
            return Err(IdlBuildError::ExtractorFailed {
                command: command.to_string(),
                status: output.status,
            });
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|source| IdlBuildError::NonUtf8Output { source })?;

        Ok(ExtractionOutput { text, duration })
    }
}
