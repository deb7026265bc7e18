//! TypeScript emission for a [`crate::ir::GenerationContext`].
//!
//! ## Module Structure
//!
//! - `ts`: TypeScript AST, lowering from descriptors, the `Emit` trait
//! - `runtime`: runtime backends and the shared validator walker
//! - `endpoints`: `Endpoints` namespace, endpoint validators, `EndpointByMethod`
//! - `client`: shorthand types, client types, `ApiClient`
//! - `codegen`: reference checks and file assembly

mod client;
mod codegen;
mod endpoints;
pub mod runtime;
pub mod ts;

pub use codegen::{codegen_module, generate_file};
pub use endpoints::parameters_descriptor;
pub use ts::Emit;
