use crate::error::{IdlBuildError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub extractor: ExtractorConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Defaults to the parent of the current directory, which is the checkout
    /// root when the tool runs from `specs/`. Run from anywhere else, pass
    /// `--project-root` (or set this key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
    pub project_marker: String,
    pub index_file: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub interpreter: String,
    /// Relative to the project root.
    pub script: PathBuf,
    pub search_path_var: String,
    /// Relative to the project root. Their parents go on the search path.
    pub libraries: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub atomic_write: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            project_marker: ".git".to_string(),
            index_file: "index.html".to_string(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            script: PathBuf::from("specs/extract-idl.py"),
            search_path_var: "PYTHONPATH".to_string(),
            libraries: vec![
                PathBuf::from("resources/html5lib-1.1/src/html5lib"),
                PathBuf::from("resources/webencodings-0.5.1/src/webencodings"),
            ],
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(IdlBuildError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| IdlBuildError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| IdlBuildError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["webgl-idl-build.toml", ".webgl-idl-build.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref project_root) = cli_args.project_root {
            self.layout.project_root = Some(project_root.clone());
        }

        if let Some(ref interpreter) = cli_args.interpreter {
            self.extractor.interpreter = interpreter.clone();
        }

        if let Some(atomic_write) = cli_args.atomic_write {
            self.output.atomic_write = atomic_write;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.layout.project_marker.trim().is_empty() {
            return Err(IdlBuildError::Config {
                message: "Project root marker must not be empty".to_string(),
            });
        }

        if self.layout.index_file.trim().is_empty() {
            return Err(IdlBuildError::Config {
                message: "Index file name must not be empty".to_string(),
            });
        }

        if self.extractor.interpreter.trim().is_empty() {
            return Err(IdlBuildError::Config {
                message: "Extractor interpreter must not be empty".to_string(),
            });
        }

        if self.extractor.script.as_os_str().is_empty() {
            return Err(IdlBuildError::Config {
                message: "Extractor script path must not be empty".to_string(),
            });
        }

        let var = &self.extractor.search_path_var;
        if var.is_empty() || var.contains('=') || var.contains('\0') {
            return Err(IdlBuildError::Config {
                message: format!("Invalid search path variable name: {:?}", var),
            });
        }

        if self.extractor.libraries.is_empty() {
            return Err(IdlBuildError::Config {
                message: "At least one vendored library must be listed".to_string(),
            });
        }

        Ok(())
    }

    /// Project root from config, or the parent of the current directory.
    pub fn project_root(&self) -> Result<PathBuf> {
        if let Some(ref root) = self.layout.project_root {
            return Ok(root.clone());
        }

        let cwd = std::env::current_dir()?;
        cwd.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| IdlBuildError::MissingProjectRoot {
                path: cwd.join("..").join(&self.layout.project_marker),
            })
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub project_root: Option<PathBuf>,
    pub interpreter: Option<String>,
    pub atomic_write: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_root(mut self, project_root: Option<PathBuf>) -> Self {
        self.project_root = project_root;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Option<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_atomic_write(mut self, atomic_write: Option<bool>) -> Self {
        self.atomic_write = atomic_write;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout.index_file, "index.html");
        assert_eq!(config.layout.project_marker, ".git");
        assert_eq!(config.extractor.search_path_var, "PYTHONPATH");
        assert_eq!(config.extractor.libraries.len(), 2);
        assert!(!config.output.atomic_write);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.extractor.libraries.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.extractor.search_path_var = "BAD=VAR".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.extractor.interpreter = "python3.12".to_string();
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.extractor.interpreter, "python3.12");
        assert_eq!(loaded_config.extractor.libraries, config.extractor.libraries);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[output]\natomic_write = true").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert!(config.output.atomic_write);
        assert_eq!(config.extractor.interpreter, "python3");
        assert_eq!(config.layout.index_file, "index.html");
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(IdlBuildError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_project_root(Some(PathBuf::from("/work/WebGL")))
            .with_interpreter(Some("pypy3".to_string()))
            .with_atomic_write(Some(true));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.project_root().unwrap(), PathBuf::from("/work/WebGL"));
        assert_eq!(config.extractor.interpreter, "pypy3");
        assert!(config.output.atomic_write);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[layout]"));
        assert!(sample.contains("[extractor]"));
        assert!(sample.contains("[output]"));
        assert!(sample.contains("PYTHONPATH"));
    }
}
