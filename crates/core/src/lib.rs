//! OpenAPI 3.x to TypeScript API client generator.
//!
//! The pipeline is:
//! 1. Parse: document text -> [`OpenApiSpec`]
//! 2. Map: [`OpenApiSpec`] -> [`GenerationContext`] (all OpenAPI logic resolved)
//! 3. Emit: [`GenerationContext`] + [`RuntimeChoice`] -> TypeScript source
//!
//! Each run owns all of its state, so independent runs may proceed in
//! parallel without coordination.

pub mod config;
pub mod emitter;
pub mod error;
pub mod ir;
pub mod spec;

pub use config::{GenerateConfig, RuntimeChoice, default_output_path};
pub use emitter::generate_file;
pub use error::{Error, Result};
pub use ir::{
    Diagnostic, EndpointDescriptor, GenerationContext, TypeDescriptor, TypeTable,
    map_openapi_endpoints,
};
pub use spec::OpenApiSpec;

/// Generate TypeScript code from OpenAPI document text (JSON or YAML).
pub fn generate(document: &str, runtime: RuntimeChoice) -> Result<String> {
    // Parse OpenAPI document
    let spec = OpenApiSpec::parse(document)?;

    // Map to IR (all OpenAPI logic resolved here)
    let ctx = map_openapi_endpoints(&spec);

    generate_file(&ctx, runtime)
}
