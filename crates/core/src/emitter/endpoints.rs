//! Endpoint declarations: the `Endpoints` namespace, endpoint validators and
//! the `EndpointByMethod` lookup table.

use indexmap::IndexMap;

use super::runtime::{RefScope, ValidatorSyntax, js_object, render_validator};
use super::ts::{TsConst, TsItem, TsLiteral, TsNamespace, TsPrimitive, TsProp, TsType, TsTypeDef};
use crate::ir::utils::quote_if_needed;
use crate::ir::{
    Additional, EndpointDescriptor, HttpMethod, Literal, ParamLocation, Property, TypeDescriptor,
};

pub const ENDPOINTS_NAMESPACE: &str = "Endpoints";
pub const ENDPOINT_BY_METHOD: &str = "EndpointByMethod";

/// Parameters grouped by location (`path`, `query`, `header`, `cookie`,
/// `body`), or `None` when the endpoint takes none.
pub fn parameters_descriptor(endpoint: &EndpointDescriptor) -> Option<TypeDescriptor> {
    let mut groups = IndexMap::new();

    for location in [
        ParamLocation::Path,
        ParamLocation::Query,
        ParamLocation::Header,
        ParamLocation::Cookie,
    ] {
        let mut properties = IndexMap::new();
        for param in endpoint.params_in(location) {
            properties.insert(
                param.name.clone(),
                Property {
                    ty: param.ty.clone(),
                    required: param.required,
                },
            );
        }
        if properties.is_empty() {
            continue;
        }
        let required = properties.values().any(|p| p.required);
        groups.insert(
            location.as_key().to_string(),
            Property {
                ty: TypeDescriptor::Object {
                    properties,
                    additional: Additional::Closed,
                },
                required,
            },
        );
    }

    if let Some(body) = endpoint.params_in(ParamLocation::Body).next() {
        groups.insert(
            ParamLocation::Body.as_key().to_string(),
            Property {
                ty: body.ty.clone(),
                required: body.required,
            },
        );
    }

    if groups.is_empty() {
        None
    } else {
        Some(TypeDescriptor::Object {
            properties: groups,
            additional: Additional::Closed,
        })
    }
}

fn prop(name: &str, ty: TsType) -> TsProp {
    TsProp {
        name: name.to_string(),
        ty,
        optional: false,
    }
}

fn string_literal(value: &str) -> TsType {
    TsType::Literal(TsLiteral::String(value.to_string()))
}

fn or_unknown(ty: Option<&TypeDescriptor>) -> TsType {
    ty.map_or(TsType::Primitive(TsPrimitive::Unknown), TsType::from)
}

/// `export namespace Endpoints { export type <alias> = { ... }; }`
pub fn endpoint_types(endpoints: &[EndpointDescriptor]) -> TsNamespace {
    let types = endpoints
        .iter()
        .map(|endpoint| {
            let parameters = parameters_descriptor(endpoint)
                .map_or(TsType::Primitive(TsPrimitive::Never), |d| TsType::from(&d));
            let responses = endpoint
                .responses
                .iter()
                .map(|(status, ty)| prop(status, or_unknown(ty.as_ref())))
                .collect();
            TsTypeDef {
                name: endpoint.alias.clone(),
                ty: TsType::Object(vec![
                    prop("method", string_literal(endpoint.method.as_str())),
                    prop("path", string_literal(&endpoint.path.raw)),
                    prop("requestFormat", string_literal(endpoint.request_format.as_str())),
                    prop("parameters", parameters),
                    prop("response", or_unknown(endpoint.primary_response())),
                    prop("responses", TsType::Object(responses)),
                ]),
            }
        })
        .collect();

    TsNamespace {
        name: ENDPOINTS_NAMESPACE.to_string(),
        types,
    }
}

/// One `export const <alias> = { ... };` per endpoint.
pub fn endpoint_validators(
    endpoints: &[EndpointDescriptor],
    syntax: &dyn ValidatorSyntax,
) -> Vec<TsItem> {
    let render = |ty: Option<&TypeDescriptor>| match ty {
        // Exported schema validators are already standalone.
        Some(ty) if matches!(ty, TypeDescriptor::Reference { .. }) => {
            render_validator(syntax, ty, RefScope::Endpoint)
        }
        Some(ty) => syntax.standalone(render_validator(syntax, ty, RefScope::Endpoint)),
        None => syntax.standalone(syntax.unknown()),
    };
    let literal = |value: &str| syntax.standalone(syntax.literal(&Literal::String(value.into())));

    endpoints
        .iter()
        .map(|endpoint| {
            let parameters = match parameters_descriptor(endpoint) {
                Some(descriptor) => render(Some(&descriptor)),
                None => syntax.standalone(syntax.never()),
            };
            let statuses: Vec<(String, String)> = endpoint
                .responses
                .iter()
                .map(|(status, ty)| (quote_if_needed(status), render(ty.as_ref())))
                .collect();
            let responses = js_object(statuses.iter().map(|(k, v)| (k.as_str(), v.as_str())));

            let fields = [
                ("method", literal(endpoint.method.as_str())),
                ("path", literal(&endpoint.path.raw)),
                ("requestFormat", literal(endpoint.request_format.as_str())),
                ("parameters", parameters),
                ("response", render(endpoint.primary_response())),
                ("responses", responses),
            ];
            TsItem::Const(TsConst {
                name: endpoint.alias.clone(),
                annotation: None,
                init: block(fields.iter().map(|(k, v)| (*k, v.as_str())), 0),
            })
        })
        .collect()
}

/// Methods that have at least one endpoint, in canonical order.
pub fn methods_present(endpoints: &[EndpointDescriptor]) -> Vec<HttpMethod> {
    HttpMethod::ALL
        .into_iter()
        .filter(|method| endpoints.iter().any(|e| e.method == *method))
        .collect()
}

/// `EndpointByMethod` as a type (always) and as a value (validator runtimes).
pub fn endpoint_by_method(endpoints: &[EndpointDescriptor], with_value: bool) -> Vec<TsItem> {
    let methods = methods_present(endpoints);
    let by_method = |method: HttpMethod| endpoints.iter().filter(move |e| e.method == method);

    let ty = TsType::Object(
        methods
            .iter()
            .map(|method| {
                let paths = by_method(*method)
                    .map(|e| {
                        prop(
                            &e.path.raw,
                            TsType::Ref(format!("{ENDPOINTS_NAMESPACE}.{}", e.alias)),
                        )
                    })
                    .collect();
                prop(method.as_key(), TsType::Object(paths))
            })
            .collect(),
    );
    let mut items = vec![TsItem::Type(TsTypeDef {
        name: ENDPOINT_BY_METHOD.to_string(),
        ty,
    })];

    if with_value {
        let groups: Vec<(&str, String)> = methods
            .iter()
            .map(|method| {
                let paths: Vec<(String, &str)> = by_method(*method)
                    .map(|e| (quote_if_needed(&e.path.raw), e.alias.as_str()))
                    .collect();
                (
                    method.as_key(),
                    block(paths.iter().map(|(k, v)| (k.as_str(), *v)), 1),
                )
            })
            .collect();
        items.push(TsItem::Const(TsConst {
            name: ENDPOINT_BY_METHOD.to_string(),
            annotation: None,
            init: block(groups.iter().map(|(k, v)| (*k, v.as_str())), 0),
        }));
    }

    items
}

/// Multi-line object literal at the given indentation level.
fn block<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    let mut output = String::from("{\n");
    for (key, value) in entries {
        output.push_str(&format!("{prefix}  {key}: {value},\n"));
    }
    output.push_str(&format!("{prefix}}}"));
    output
}
