use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webgl-idl-build")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scrape WebGL IDL definitions out of the HTML specification")]
#[command(
    long_about = "Runs the IDL extractor against the index.html that sits next to OUTPUT_IDL \
                  and writes the result, prefixed with an autogenerated-file banner."
)]
#[command(after_help = "EXAMPLES:\n  \
    webgl-idl-build latest/1.0/webgl.idl\n  \
    webgl-idl-build latest/2.0/webgl2.idl --verbose\n  \
    webgl-idl-build latest/2.0/webgl2.idl --project-root ~/src/WebGL --atomic")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Destination .idl file; its directory must contain index.html
    #[arg(value_name = "OUTPUT_IDL", required_unless_present = "generate_config")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to the parent of the current directory)
    #[arg(long, env = "WEBGL_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Interpreter used to run the extractor script
    #[arg(long)]
    pub interpreter: Option<String>,

    /// Write to a temporary file and rename it into place
    #[arg(long)]
    pub atomic: bool,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Resolve paths and print the extractor command without running it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<&OutputFormat> for OutputMode {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_project_root(self.project_root.clone())
            .with_interpreter(self.interpreter.clone())
            .with_atomic_write(self.atomic.then_some(true))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
