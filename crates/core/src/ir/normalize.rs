//! Normalization from an OpenAPI document to the generation IR.
//!
//! This module handles all the OpenAPI-specific endpoint logic:
//! - Parameter merging and `$ref` resolution
//! - Request body and response media selection
//! - Hoisting of complex inline schemas into the type table
//! - Alias assignment

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::spec::{
    MediaType, OpenApiSpec, Operation, Parameter, RefOr, RequestBody, Response, Schema,
    component_name, decode_pointer_segment, encode_pointer_segment,
};

use super::api::{
    EndpointDescriptor, GenerationContext, HttpMethod, ParamDescriptor, ParamLocation, PathTemplate,
    RequestFormat,
};
use super::resolver::NameRegistry;
use super::schema::MapContext;
use super::types::TypeDescriptor;
use super::utils::{sanitize_alias, to_pascal_case};

/// Map a whole document: component schemas first, then every operation in
/// document order.
pub fn map_openapi_endpoints(doc: &OpenApiSpec) -> GenerationContext {
    debug!(
        paths = doc.paths.len(),
        schemas = doc.components.as_ref().map_or(0, |c| c.schemas.len()),
        "Mapping OpenAPI document."
    );

    let mut ctx = MapContext::new(doc);
    ctx.map_components();

    let mut aliases = NameRegistry::new();
    let mut endpoints = Vec::new();

    for (path, item) in &doc.paths {
        let template = PathTemplate::parse(path);
        let path_pointer = format!("#/paths/{}", encode_pointer_segment(path));

        for (method_key, op) in &item.operations {
            let Some(method) = HttpMethod::from_key(method_key) else {
                continue;
            };
            let op_pointer = format!("{path_pointer}/{method_key}");
            let endpoint = normalize_operation(
                &mut ctx,
                &mut aliases,
                OperationSite {
                    template: &template,
                    method,
                    pointer: &op_pointer,
                    path_pointer: &path_pointer,
                    path_params: &item.parameters,
                },
                op,
            );
            endpoints.push(endpoint);
        }
    }

    let (types, diagnostics) = ctx.finish();
    debug!(
        endpoints = endpoints.len(),
        types = types.len(),
        diagnostics = diagnostics.len(),
        "Mapped OpenAPI document."
    );

    GenerationContext {
        endpoints,
        types,
        diagnostics,
    }
}

/// Where an operation lives in the document.
struct OperationSite<'a> {
    template: &'a PathTemplate,
    method: HttpMethod,
    pointer: &'a str,
    path_pointer: &'a str,
    path_params: &'a [RefOr<Parameter>],
}

fn normalize_operation(
    ctx: &mut MapContext<'_>,
    aliases: &mut NameRegistry,
    site: OperationSite<'_>,
    op: &Operation,
) -> EndpointDescriptor {
    let alias_source = op.operation_id.as_deref().unwrap_or(&site.template.raw);
    let alias = aliases.resolve_as(
        site.pointer,
        &sanitize_alias(site.method.as_key(), alias_source),
    );
    let base_name = match &op.operation_id {
        Some(id) if !to_pascal_case(id).is_empty() => to_pascal_case(id),
        _ => to_pascal_case(&alias),
    };

    let mut parameters = normalize_params(ctx, &site, op);

    let mut request_format = RequestFormat::Json;
    if let Some(body) = &op.request_body {
        let body_pointer = format!("{}/requestBody", site.pointer);
        match normalize_body(ctx, body, &body_pointer, &base_name) {
            Some((format, param)) => {
                request_format = format;
                parameters.push(param);
            }
            None => ctx.report(&body_pointer, "unresolved request body reference"),
        }
    }

    let mut responses = IndexMap::new();
    for (status, response) in &op.responses {
        let pointer = format!("{}/responses/{}", site.pointer, encode_pointer_segment(status));
        let ty = normalize_response(ctx, response, &pointer, &base_name, status);
        responses.insert(status.clone(), ty);
    }

    EndpointDescriptor {
        method: site.method,
        path: site.template.clone(),
        alias,
        operation_id: op.operation_id.clone(),
        request_format,
        parameters,
        responses,
    }
}

/// Merge path-level and operation-level parameters. An operation-level
/// parameter replaces a path-level one with the same name and location.
fn normalize_params(
    ctx: &mut MapContext<'_>,
    site: &OperationSite<'_>,
    op: &Operation,
) -> Vec<ParamDescriptor> {
    let doc = ctx.document();
    let shared = doc.components.as_ref().map(|c| &c.parameters);

    let path_level = site
        .path_params
        .iter()
        .enumerate()
        .map(|(i, p)| (p, format!("{}/parameters/{i}", site.path_pointer)));
    let op_level = op
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| (p, format!("{}/parameters/{i}", site.pointer)));

    let mut merged: Vec<(Cow<'_, Parameter>, String)> = Vec::new();
    for (param, pointer) in path_level.chain(op_level) {
        let Some(param) = resolve(doc, param, "parameters", shared) else {
            ctx.report(&pointer, "unresolved parameter reference");
            continue;
        };
        merged.retain(|(existing, _)| {
            existing.name != param.name || existing.location != param.location
        });
        merged.push((param, pointer));
    }

    let mut params = Vec::new();
    for (param, pointer) in merged {
        let Some(location) = ParamLocation::from_key(&param.location) else {
            ctx.report(
                &pointer,
                format!("unsupported parameter location '{}'", param.location),
            );
            continue;
        };
        let ty = if let Some(schema) = &param.schema {
            ctx.map(schema, &format!("{pointer}/schema"))
        } else if let Some((media, schema)) = param
            .content
            .as_ref()
            .and_then(|content| {
                content
                    .iter()
                    .find_map(|(media, mt)| Some((media, mt.schema.as_ref()?)))
            })
        {
            let media_pointer =
                format!("{pointer}/content/{}/schema", encode_pointer_segment(media));
            ctx.map(schema, &media_pointer)
        } else {
            TypeDescriptor::string()
        };
        params.push(ParamDescriptor {
            name: param.name.clone(),
            location,
            ty,
            required: param.required || location == ParamLocation::Path,
        });
    }

    for name in site.template.param_names() {
        let declared = params
            .iter()
            .any(|p| p.location == ParamLocation::Path && p.name == name);
        if !declared {
            ctx.report(
                site.pointer,
                format!("path parameter '{name}' is not declared"),
            );
            params.push(ParamDescriptor {
                name: name.to_string(),
                location: ParamLocation::Path,
                ty: TypeDescriptor::string(),
                required: true,
            });
        }
    }

    params
}

fn normalize_body(
    ctx: &mut MapContext<'_>,
    body: &RefOr<RequestBody>,
    pointer: &str,
    base_name: &str,
) -> Option<(RequestFormat, ParamDescriptor)> {
    let doc = ctx.document();
    let shared = doc.components.as_ref().map(|c| &c.request_bodies);
    let resolved = resolve(doc, body, "requestBodies", shared)?;
    let (pointer, base_name) = hoist_site(body, "requestBodies", pointer, base_name, "Body");

    let (format, ty) = match pick_media(&resolved.content) {
        Some((media, media_type)) => {
            let format = RequestFormat::from_media_type(media_essence(media));
            let ty = match &media_type.schema {
                Some(schema) => {
                    let key = format!(
                        "{pointer}/content/{}/schema",
                        encode_pointer_segment(media)
                    );
                    map_hoisted(ctx, schema, &key, &base_name)
                }
                None => TypeDescriptor::Unknown,
            };
            (format, ty)
        }
        None => (RequestFormat::Json, TypeDescriptor::Unknown),
    };

    Some((
        format,
        ParamDescriptor {
            name: "body".to_string(),
            location: ParamLocation::Body,
            ty,
            required: resolved.required,
        },
    ))
}

fn normalize_response(
    ctx: &mut MapContext<'_>,
    response: &RefOr<Response>,
    pointer: &str,
    base_name: &str,
    status: &str,
) -> Option<TypeDescriptor> {
    let doc = ctx.document();
    let shared = doc.components.as_ref().map(|c| &c.responses);
    let Some(resolved) = resolve(doc, response, "responses", shared) else {
        ctx.report(pointer, "unresolved response reference");
        return None;
    };
    let suffix = format!("Response{}", to_pascal_case(status));
    let (pointer, base_name) = hoist_site(response, "responses", pointer, base_name, &suffix);

    let (media, media_type) = pick_media(&resolved.content)?;
    let schema = media_type.schema.as_ref()?;
    let key = format!("{pointer}/content/{}/schema", encode_pointer_segment(media));
    Some(map_hoisted(ctx, schema, &key, &base_name))
}

/// Map a body or response schema, promoting complex inline shapes to a
/// named table entry.
fn map_hoisted(
    ctx: &mut MapContext<'_>,
    schema: &Schema,
    key: &str,
    base_name: &str,
) -> TypeDescriptor {
    if let Some(existing) = ctx.hoisted(key) {
        return existing;
    }
    let ty = ctx.map(schema, key);
    if ty.is_complex() {
        ctx.hoist(key, base_name, ty)
    } else {
        ty
    }
}

/// Pointer and base name under which a body or response gets hoisted. A
/// shared component is hoisted once under its own location and name. Any
/// other `$ref` is hoisted under its target, so it shares the entry of the
/// operation that declares it inline.
fn hoist_site<T>(
    item: &RefOr<T>,
    section: &str,
    pointer: &str,
    base_name: &str,
    suffix: &str,
) -> (String, String) {
    match item {
        RefOr::Ref { ref_path } => match component_name(ref_path, section) {
            Some(name) => (
                ref_path.clone(),
                to_pascal_case(&decode_pointer_segment(name)),
            ),
            None => (ref_path.clone(), format!("{base_name}{suffix}")),
        },
        RefOr::Item(_) => (pointer.to_string(), format!("{base_name}{suffix}")),
    }
}

/// Resolve an inline object, a `#/components/<section>/<Name>` reference,
/// or any other local JSON pointer into the document.
fn resolve<'a, T: Clone + DeserializeOwned>(
    doc: &OpenApiSpec,
    item: &'a RefOr<T>,
    section: &str,
    shared: Option<&'a IndexMap<String, T>>,
) -> Option<Cow<'a, T>> {
    match item {
        RefOr::Item(value) => Some(Cow::Borrowed(value)),
        RefOr::Ref { ref_path } => match component_name(ref_path, section) {
            Some(name) => shared?.get(&decode_pointer_segment(name)).map(Cow::Borrowed),
            None => doc.lookup(ref_path).map(Cow::Owned),
        },
    }
}

/// Media type without parameters (`application/json; charset=utf-8`).
fn media_essence(media: &str) -> &str {
    media.split(';').next().unwrap_or(media).trim()
}

/// Lower is preferred.
fn media_rank(media: &str) -> u8 {
    let media = media_essence(media);
    if media == "application/json" || media.ends_with("+json") {
        0
    } else if media == "multipart/form-data" {
        1
    } else if media == "application/x-www-form-urlencoded" {
        2
    } else if media == "application/octet-stream" {
        3
    } else if media.starts_with("text/") {
        4
    } else {
        5
    }
}

/// The preferred media type; ties go to document order.
fn pick_media(content: &IndexMap<String, MediaType>) -> Option<(&str, &MediaType)> {
    content
        .iter()
        .min_by_key(|(media, _)| media_rank(media))
        .map(|(media, media_type)| (media.as_str(), media_type))
}
