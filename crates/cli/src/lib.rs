//! Command line front end for `typed-openapi-core`.
//!
//! Reads one OpenAPI document, generates the TypeScript client for the
//! selected runtime and writes it next to the input unless told otherwise.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::{debug, info, warn};
use typed_openapi_core::{GenerateConfig, OpenApiSpec, generate_file, map_openapi_endpoints};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "typed-openapi",
    version,
    about = "Generate a typed TypeScript API client from an OpenAPI document"
)]
pub struct GenerateArgs {
    /// OpenAPI document (JSON or YAML)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file, defaults to `<INPUT>.<runtime>.ts`
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Validator runtime: none, zod, valibot, io-ts, typebox, yup, arktype
    #[arg(short, long, value_name = "NAME", default_value = "none")]
    pub runtime: String,
}

/// Run one generation and return the path written.
pub fn run(args: &GenerateArgs) -> Result<PathBuf, String> {
    let start = Instant::now();
    let config = GenerateConfig::new(&args.input, args.output.as_deref(), &args.runtime)
        .map_err(|err| err.to_string())?;

    debug!(
        input = %config.input.display(),
        runtime = %config.runtime,
        "Reading OpenAPI document."
    );
    let text = fs::read_to_string(&config.input).map_err(|err| {
        format!("Failed to read {}: {err}", config.input.display())
    })?;

    let spec = OpenApiSpec::parse(&text).map_err(|err| err.to_string())?;
    let ctx = map_openapi_endpoints(&spec);
    info!("Found {} endpoints", ctx.endpoints.len());
    if !ctx.diagnostics.is_empty() {
        warn!(
            count = ctx.diagnostics.len(),
            "Some schemas could not be classified and were typed as unknown."
        );
    }

    let code = generate_file(&ctx, config.runtime).map_err(|err| err.to_string())?;

    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create output directory: {err}"))?;
    }
    fs::write(&config.output, &code).map_err(|err| {
        format!("Failed to write {}: {err}", config.output.display())
    })?;

    info!(output = %config.output.display(), "Wrote TypeScript client");
    info!("Done in {}ms", start.elapsed().as_millis());
    Ok(config.output)
}

/// Map the outcome of [`run`] to a process exit code.
pub fn run_cli(args: &GenerateArgs) -> i32 {
    match run(args) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
