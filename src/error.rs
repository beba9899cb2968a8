use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdlBuildError {
    #[error("Input HTML not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Project root marker not found: {}", path.display())]
    MissingProjectRoot { path: PathBuf },

    #[error("Vendored library not found: {}", path.display())]
    MissingDependency { path: PathBuf },

    #[error("Failed to launch extractor `{program}`")]
    ExtractorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Extractor exited unsuccessfully ({status})")]
    ExtractorFailed { command: String, status: ExitStatus },

    #[error("Extracted IDL contains a carriage return at line {line} (byte {offset})")]
    CarriageReturn { line: usize, offset: usize },

    #[error("Extracted IDL is not valid UTF-8")]
    NonUtf8Output {
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl IdlBuildError {
    pub fn missing_input(path: &Path) -> Self {
        IdlBuildError::MissingInput {
            path: path.to_path_buf(),
        }
    }

    pub fn missing_dependency(path: &Path) -> Self {
        IdlBuildError::MissingDependency {
            path: path.to_path_buf(),
        }
    }

    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            IdlBuildError::MissingInput { .. } => 2,
            IdlBuildError::MissingProjectRoot { .. } => 3,
            IdlBuildError::MissingDependency { .. } => 4,
            IdlBuildError::ExtractorSpawn { .. } | IdlBuildError::ExtractorFailed { .. } => 5,
            IdlBuildError::CarriageReturn { .. } | IdlBuildError::NonUtf8Output { .. } => 6,
            IdlBuildError::Config { .. } => 7,
            IdlBuildError::Io(_) => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for IdlBuildError {
    fn user_message(&self) -> String {
        match self {
            IdlBuildError::MissingInput { path } => {
                format!("Expected the specification HTML at {}", path.display())
            }
            IdlBuildError::MissingProjectRoot { path } => {
                format!("Not inside the expected project layout: {} is missing", path.display())
            }
            IdlBuildError::MissingDependency { path } => {
                format!("Vendored support library is missing: {}", path.display())
            }
            IdlBuildError::ExtractorSpawn { program, source } => {
                format!("Could not run extractor `{}`: {}", program, source)
            }
            IdlBuildError::ExtractorFailed { command, status } => {
                match status.code() {
                    Some(code) => format!("Extractor {} exited with status {}", command, code),
                    None => format!("Extractor {} was terminated by a signal", command),
                }
            }
            IdlBuildError::NonUtf8Output { source } => {
                format!("Extracted IDL is not valid UTF-8: {}", source.utf8_error())
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            IdlBuildError::MissingInput { .. } => Some(
                "The output path must sit next to the index.html it is generated from (e.g. latest/2.0/webgl2.idl).".to_string()
            ),
            IdlBuildError::MissingProjectRoot { .. } => Some(
                "Run the tool from the specs/ directory of a WebGL checkout, or pass --project-root.".to_string()
            ),
            IdlBuildError::MissingDependency { .. } => Some(
                "Make sure the vendored libraries under resources/ are checked out, or adjust [extractor].libraries in the config.".to_string()
            ),
            IdlBuildError::ExtractorSpawn { .. } => Some(
                "Check that the interpreter is installed and on PATH, or pass --interpreter.".to_string()
            ),
            IdlBuildError::CarriageReturn { .. } => Some(
                "Generated IDL must use LF line endings; check the extractor and the line endings of index.html.".to_string()
            ),
            IdlBuildError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for IdlBuildError {
    fn from(error: toml::de::Error) -> Self {
        IdlBuildError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdlBuildError>;
