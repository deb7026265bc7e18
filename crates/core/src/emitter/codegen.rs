//! Code generation from the IR to a TypeScript module.
//!
//! Sections are assembled in a fixed order: imports, `Schemas`, schema
//! validators, `Endpoints`, endpoint validators, `EndpointByMethod`, the
//! shorthand types and the client.

use tracing::debug;

use super::client::{api_client, client_types, shorthand_types};
use super::endpoints::{endpoint_by_method, endpoint_types, endpoint_validators};
use super::runtime::{Declaration, RefScope, backend_for, render_validator};
use super::ts::{Emit, SCHEMAS_NAMESPACE, TsItem, TsModule, TsNamespace, TsType, TsTypeDef};
use crate::config::RuntimeChoice;
use crate::error::{Error, Result};
use crate::ir::GenerationContext;

/// Render the complete TypeScript file for `ctx`.
///
/// Fails with [`Error::DanglingReference`] when any reference in the type
/// table or in an endpoint names a key the table does not hold. The output
/// is byte-identical for identical inputs.
pub fn generate_file(ctx: &GenerationContext, runtime: RuntimeChoice) -> Result<String> {
    check_references(ctx)?;

    debug!(
        runtime = %runtime,
        types = ctx.types.len(),
        endpoints = ctx.endpoints.len(),
        "Generating TypeScript client."
    );

    let module = codegen_module(ctx, runtime);
    Ok(module.emit())
}

/// Build the module AST. References must already be checked.
pub fn codegen_module(ctx: &GenerationContext, runtime: RuntimeChoice) -> TsModule {
    let validator = backend_for(runtime).validator();
    let mut imports = Vec::new();
    let mut items = Vec::new();

    if let Some(syntax) = validator {
        imports.push(syntax.import());
    }

    // Schema types
    items.push(TsItem::Namespace(TsNamespace {
        name: SCHEMAS_NAMESPACE.to_string(),
        types: ctx
            .types
            .iter()
            .map(|entry| TsTypeDef {
                name: entry.name.clone(),
                ty: TsType::from(&entry.ty),
            })
            .collect(),
    }));

    // Schema validators
    if let Some(syntax) = validator {
        let decls: Vec<Declaration<'_>> = ctx
            .types
            .iter()
            .map(|entry| Declaration {
                name: &entry.name,
                validator: render_validator(syntax, &entry.ty, RefScope::Declaration),
                recursive: entry.recursive,
            })
            .collect();
        let declared = syntax.declarations(&decls);
        if !declared.is_empty() {
            items.push(TsItem::Raw("// <Validators>".to_string()));
            items.extend(declared);
            items.push(TsItem::Raw("// </Validators>".to_string()));
        }
    }

    // Endpoints
    items.push(TsItem::Namespace(endpoint_types(&ctx.endpoints)));
    if let Some(syntax) = validator {
        items.extend(endpoint_validators(&ctx.endpoints, syntax));
    }

    items.push(TsItem::Raw("// <EndpointByMethod>".to_string()));
    items.extend(endpoint_by_method(&ctx.endpoints, validator.is_some()));
    items.push(TsItem::Raw("// </EndpointByMethod>".to_string()));

    items.extend(shorthand_types(&ctx.endpoints));
    items.push(client_types());
    items.extend(api_client(&ctx.endpoints));

    TsModule { imports, items }
}

/// Every reference, in the table and in the endpoints, must resolve.
fn check_references(ctx: &GenerationContext) -> Result<()> {
    let mut dangling: Option<String> = None;
    let mut visit = |key: &str, _name: &str| {
        if dangling.is_none() && !ctx.types.contains(key) {
            dangling = Some(key.to_string());
        }
    };

    for entry in ctx.types.iter() {
        entry.ty.for_each_reference(&mut visit);
    }
    for endpoint in &ctx.endpoints {
        for param in &endpoint.parameters {
            param.ty.for_each_reference(&mut visit);
        }
        for ty in endpoint.responses.values().flatten() {
            ty.for_each_reference(&mut visit);
        }
    }

    match dangling {
        Some(key) => Err(Error::DanglingReference { key }),
        None => Ok(()),
    }
}
