use clap::Parser;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;
use webgl_idl_build::{
    Cli, IdlBuildError, IdlBuilder, OutputFormatter, OutputMode, UserFriendlyError,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let builder = match IdlBuilder::from_cli(&cli) {
        Ok(builder) => builder,
        Err(e) => {
            print_startup_error(&cli, &e);
            return e.exit_code();
        }
    };

    // clap enforces the positional unless --generate-config was given.
    let Some(output) = cli.output.as_deref() else {
        return 2;
    };

    if cli.dry_run {
        return handle_dry_run(&builder, output);
    }

    match builder.build(output) {
        Ok(report) => {
            builder.output_formatter().print_build_report(&report);
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "build failed");
            builder.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "webgl-idl-build.toml".to_string());

    match IdlBuilder::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  webgl-idl-build <OUTPUT_IDL> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(builder: &IdlBuilder, output: &Path) -> i32 {
    let formatter = builder.output_formatter();

    formatter.info("DRY RUN MODE - the extractor will not be run");
    formatter.print_separator();

    match builder.plan(output) {
        Ok(plan) => {
            formatter.print_build_plan(&plan);
            formatter.print_separator();
            formatter.success("Dry run completed successfully");
            0
        }
        Err(e) => {
            builder.handle_error(&e);
            e.exit_code()
        }
    }
}

fn print_startup_error(cli: &Cli, error: &IdlBuildError) {
    let formatter = OutputFormatter::new(OutputMode::from(&cli.output_format), 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "webgl_idl_build=info",
        _ => "webgl_idl_build=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use webgl_idl_build::Config;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "webgl-idl-build",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[layout]"));
    }

    #[test]
    fn test_dry_run_reports_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.layout.project_root = Some(temp_dir.path().to_path_buf());
        let builder = IdlBuilder::new(config, OutputMode::Plain, 0, true);

        let exit_code = handle_dry_run(&builder, &temp_dir.path().join("webgl2/webgl2.idl"));
        assert_eq!(exit_code, 2);
    }
}
