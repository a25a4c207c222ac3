//! Restgen Code Generator
//!
//! Compiles serialized API models into a typed Rust client crate.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use restgen_define::ApiModel;
use restgen_gen::cargo_gen::write_cargo_toml;
use restgen_gen::errors::GeneratorError;
use restgen_gen::options::{GeneratorOptions, OutputVersion};
use restgen_gen::output::generate_and_write_all;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Restgen code generator - compiles declared API actions into typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "restgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API model as JSON; repeat to compile several APIs into one crate
    #[arg(short, long, required = true)]
    api: Vec<PathBuf>,

    /// Output directory for generated sources (the crate's `src/`)
    #[arg(short, long, default_value = "generated/src")]
    output: PathBuf,

    /// Shape of the generated methods
    #[arg(long, value_enum, default_value_t = OutputVersion::V1)]
    output_version: OutputVersion,

    /// Module to emit every API into, instead of one module per API title
    #[arg(short, long)]
    module: Option<String>,

    /// Package name of the generated crate
    #[arg(long, default_value = "generated-client")]
    package: String,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing based on verbosity; `RUST_LOG` takes precedence.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,restgen_gen=info,restgen=info".to_string(),
            2 => "info,restgen_gen=debug,restgen=debug".to_string(),
            _ => "debug,restgen_gen=trace,restgen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn read_api(path: &Path) -> Result<ApiModel, GeneratorError> {
    let json = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let api: ApiModel = serde_json::from_str(&json)
        .map_err(|e| GeneratorError::ParseError(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), title = %api.title, resources = api.resources.len(), "loaded API model");
    Ok(api)
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let apis = cli
        .api
        .iter()
        .map(|path| read_api(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut options = GeneratorOptions::new(cli.output_version);
    options.module_path = cli.module.clone();
    options.dry_run = cli.dry_run;

    info!(
        apis = apis.len(),
        output = %cli.output.display(),
        version = %cli.output_version,
        dry_run = cli.dry_run,
        "generating clients"
    );

    let generated = generate_and_write_all(&apis, &options, &cli.output)?;

    // The output directory points to src/; the manifest goes to its parent.
    let crate_dir = cli.output.parent().unwrap_or(Path::new("."));
    write_cargo_toml(crate_dir, &cli.package, cli.dry_run)?;

    if !cli.dry_run {
        for api in &generated.apis {
            eprintln!(
                "{} {} -> {}/{}.rs ({} methods)",
                "generated".green().bold(),
                api.title,
                cli.output.display(),
                api.module,
                api.method_count
            );
        }
        let warnings = generated.warnings().count();
        if warnings > 0 {
            eprintln!("{}", format!("{warnings} warning(s) raised during compilation").yellow());
        }
    }

    Ok(())
}
