pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;
pub mod resolver;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractorConfig, LayoutConfig, OutputConfig};
pub use error::{IdlBuildError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    validate_extracted_text, ExtractionCommand, ExtractionInvoker, ExtractionOutput, IdlWriter,
    BANNER,
};
pub use report::{BuildPlan, BuildReport};
pub use resolver::{PathResolver, ResolvedPaths};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Resolve, extract, validate, write.
pub struct IdlBuilder {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl IdlBuilder {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = OutputMode::from(&cli_args.output_format);

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    fn invoker(&self, project_root: &Path) -> ExtractionInvoker {
        ExtractionInvoker::new(&self.config.extractor, project_root.to_path_buf())
    }

    fn resolve(&self, output: &Path) -> Result<ResolvedPaths> {
        let project_root = self.config.project_root()?;
        PathResolver::new(&self.config.layout, project_root).resolve(output)
    }

    /// Everything short of running the extractor: paths, libraries, command line.
    pub fn plan(&self, output: &Path) -> Result<BuildPlan> {
        let paths = self.resolve(output)?;
        let command = self.invoker(&paths.project_root).command_for(&paths.index_html)?;
        let search_path = command
            .env_value(&self.config.extractor.search_path_var)
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(BuildPlan {
            command: command.to_string(),
            search_path_var: self.config.extractor.search_path_var.clone(),
            search_path,
            atomic_write: self.config.output.atomic_write,
            paths,
        })
    }

    /// Nothing is written unless extraction and validation both succeed.
    pub fn build(&self, output: &Path) -> Result<BuildReport> {
        let paths = self.resolve(output)?;
        let invoker = self.invoker(&paths.project_root);
        let command = invoker.command_for(&paths.index_html)?;

        self.output_formatter
            .start_operation(&format!("Running {}...", command));
        if let Some(search_path) = command.env_value(&self.config.extractor.search_path_var) {
            self.output_formatter.debug(&format!(
                "{}={}",
                self.config.extractor.search_path_var,
                search_path.to_string_lossy()
            ));
        }
        tracing::info!(command = %command, "invoking extractor");

        let spinner = self.progress_manager.create_spinner("Extracting IDL");
        let extracted = match invoker.run(&command) {
            Ok(extracted) => {
                ui::progress::finish_progress_with_summary(
                    &spinner,
                    "IDL extracted",
                    extracted.duration,
                );
                extracted
            }
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e);
            }
        };

        validate_extracted_text(&extracted.text)?;

        self.output_formatter
            .start_operation(&format!("Writing \"{}\"...", paths.output.display()));
        let bytes_written = IdlWriter::new()
            .with_atomic_write(self.config.output.atomic_write)
            .write(&paths.output, &extracted.text)?;

        Ok(BuildReport::new(
            &paths,
            &extracted.text,
            bytes_written,
            extracted.duration,
        ))
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &IdlBuildError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project_tree() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join(".git")).unwrap();
        for lib in &ExtractorConfig::default().libraries {
            fs::create_dir_all(root.path().join(lib)).unwrap();
        }
        fs::create_dir_all(root.path().join("specs/webgl2")).unwrap();
        fs::write(
            root.path().join("specs/webgl2/index.html"),
            "<pre class=\"idl\">interface WebGL2RenderingContext { };</pre>",
        )
        .unwrap();
        root
    }

    fn builder_for(root: &Path, extractor_body: &str) -> IdlBuilder {
        fs::write(root.join("specs/extract-idl.sh"), extractor_body).unwrap();

        let mut config = Config::default();
        config.layout.project_root = Some(root.to_path_buf());
        config.extractor.interpreter = "sh".to_string();
        config.extractor.script = PathBuf::from("specs/extract-idl.sh");
        IdlBuilder::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_plan_does_not_touch_output() {
        let root = project_tree();
        let builder = builder_for(root.path(), "exit 1\n");
        let output = root.path().join("specs/webgl2/webgl2.idl");

        let plan = builder.plan(&output).unwrap();
        assert_eq!(plan.paths.index_html, root.path().join("specs/webgl2/index.html"));
        assert!(plan.command.contains("extract-idl.sh"));
        assert!(plan.search_path.contains("html5lib-1.1"));
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_writes_banner_and_idl() {
        let root = project_tree();
        let builder = builder_for(
            root.path(),
            "printf 'interface WebGL2RenderingContext { };\\n'\n",
        );
        let output = root.path().join("specs/webgl2/webgl2.idl");

        let report = builder.build(&output).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert_eq!(
            contents,
            format!("{}interface WebGL2RenderingContext {{ }};\n", BANNER)
        );
        assert_eq!(report.bytes_written, contents.len() as u64);
        assert_eq!(report.idl_lines, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_carriage_return_leaves_existing_output_alone() {
        let root = project_tree();
        let builder = builder_for(root.path(), "printf 'interface A { };\\r\\n'\n");
        let output = root.path().join("specs/webgl2/webgl2.idl");
        fs::write(&output, "previous").unwrap();

        let err = builder.build(&output).unwrap_err();
        assert!(matches!(err, IdlBuildError::CarriageReturn { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[cfg(unix)]
    #[test]
    fn test_extractor_sees_vendored_search_path() {
        let root = project_tree();
        let builder = builder_for(root.path(), "printf '%s\\n' \"$PYTHONPATH\"\n");
        let output = root.path().join("specs/webgl2/webgl2.idl");

        builder.build(&output).unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        let idl = contents.strip_prefix(BANNER).unwrap();
        let first = std::env::split_paths(idl.trim_end()).next().unwrap();
        assert_eq!(first, root.path().join("resources/html5lib-1.1/src"));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        IdlBuilder::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[extractor]"));
        assert!(Config::load_from_file(&config_path).is_ok());
    }
}
