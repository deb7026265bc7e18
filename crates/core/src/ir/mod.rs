//! Intermediate Representation for OpenAPI to TypeScript client generation.
//!
//! Two layers live here:
//! 1. Type IR: normalized [`TypeDescriptor`] trees and the [`TypeTable`]
//! 2. API IR: endpoints, parameters and responses ([`GenerationContext`])
//!
//! All OpenAPI corner cases are resolved during mapping, so the emitter only
//! ever sees normalized descriptors.
//!
//! ## Module Structure
//!
//! - `types`: TypeDescriptor, TypeTable
//! - `api`: EndpointDescriptor, GenerationContext
//! - `schema`: schema node -> TypeDescriptor (MapContext)
//! - `resolver`: schema key -> unique identifier (NameRegistry)
//! - `normalize`: OpenAPI document -> GenerationContext
//! - `utils`: Common utilities shared with the emitter

mod api;
mod normalize;
mod resolver;
mod schema;
mod types;
pub mod utils;

pub use api::{
    Diagnostic, EndpointDescriptor, GenerationContext, HttpMethod, ParamDescriptor, ParamLocation,
    PathSegment, PathTemplate, RequestFormat, is_success_status,
};
pub use normalize::map_openapi_endpoints;
pub use resolver::{GENERATED_NAMES, NameRegistry};
pub use schema::{MapContext, component_key};
pub use types::{
    Additional, Literal, PrimitiveKind, Property, TypeDescriptor, TypeEntry, TypeTable, UnionKind,
};
