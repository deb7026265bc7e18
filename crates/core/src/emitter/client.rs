//! The fetcher-based API client: per-method shorthands, shared client types,
//! the `ApiClient` class and `createApiClient`.

use super::endpoints::{ENDPOINT_BY_METHOD, methods_present};
use super::ts::{TsItem, TsType, TsTypeDef};
use crate::ir::utils::capitalize_first;
use crate::ir::{EndpointDescriptor, HttpMethod};

/// Methods that get a `<Method>Endpoints` shorthand type.
const SHORTHAND_METHODS: [HttpMethod; 5] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Patch,
    HttpMethod::Delete,
];

const CLIENT_TYPES: &str = r#"// <ApiClientTypes>
export type EndpointParameters = {
  body?: unknown;
  query?: Record<string, unknown>;
  header?: Record<string, unknown>;
  cookie?: Record<string, unknown>;
  path?: Record<string, unknown>;
};

export type MutationMethod = "post" | "put" | "patch" | "delete";
export type Method = "get" | "head" | "options" | "trace" | MutationMethod;

export type RequestFormat = "json" | "form-data" | "form-url" | "binary" | "text";

export type DefaultEndpoint = {
  parameters?: EndpointParameters | undefined;
  response: unknown;
};

export type Endpoint<TConfig extends DefaultEndpoint = DefaultEndpoint> = {
  method: Method;
  path: string;
  requestFormat: RequestFormat;
  parameters?: TConfig["parameters"];
  response: TConfig["response"];
  responses?: Record<string, unknown>;
};

export type Fetcher = (
  method: Method,
  url: string,
  parameters?: EndpointParameters | undefined,
) => Promise<unknown>;

type RequiredKeys<T> = {
  [P in keyof T]-?: undefined extends T[P] ? never : P;
}[keyof T];

type MaybeOptionalArg<T> = RequiredKeys<T> extends never ? [config?: T] : [config: T];
// </ApiClientTypes>
"#;

/// `<Method>Endpoints` for the common verbs present, then `AllEndpoints`.
pub fn shorthand_types(endpoints: &[EndpointDescriptor]) -> Vec<TsItem> {
    let present = methods_present(endpoints);
    let mut items: Vec<TsItem> = SHORTHAND_METHODS
        .into_iter()
        .filter(|method| present.contains(method))
        .map(|method| {
            TsItem::Type(TsTypeDef {
                name: format!("{}Endpoints", capitalize_first(method.as_key())),
                ty: TsType::Ref(format!("{ENDPOINT_BY_METHOD}[\"{}\"]", method.as_key())),
            })
        })
        .collect();
    items.push(TsItem::Type(TsTypeDef {
        name: "AllEndpoints".to_string(),
        ty: TsType::Ref(format!(
            "{ENDPOINT_BY_METHOD}[keyof {ENDPOINT_BY_METHOD}]"
        )),
    }));
    items
}

/// Types every client method signature relies on.
pub fn client_types() -> TsItem {
    TsItem::Raw(CLIENT_TYPES.to_string())
}

/// The `ApiClient` class with one method per HTTP verb present, followed by
/// `createApiClient`.
pub fn api_client(endpoints: &[EndpointDescriptor]) -> Vec<TsItem> {
    let mut class = String::from("// <ApiClient>\nexport class ApiClient {\n");
    class.push_str("  baseUrl: string = \"\";\n\n");
    class.push_str("  constructor(public fetcher: Fetcher) {}\n\n");
    class.push_str("  setBaseUrl(baseUrl: string) {\n");
    class.push_str("    this.baseUrl = baseUrl;\n");
    class.push_str("    return this;\n");
    class.push_str("  }\n");

    for method in methods_present(endpoints) {
        let key = method.as_key();
        let group = format!("{ENDPOINT_BY_METHOD}[\"{key}\"]");
        class.push_str(&format!(
            r#"
  // <ApiClient.{key}>
  {key}<Path extends keyof {group}, TEndpoint extends {group}[Path]>(
    path: Path,
    ...params: MaybeOptionalArg<TEndpoint["parameters"]>
  ): Promise<TEndpoint["response"]> {{
    return this.fetcher("{key}", this.baseUrl + path, params[0]) as Promise<TEndpoint["response"]>;
  }}
  // </ApiClient.{key}>
"#
        ));
    }
    class.push_str("}\n\n");

    class.push_str(
        r#"export function createApiClient(fetcher: Fetcher, baseUrl?: string) {
  return new ApiClient(fetcher).setBaseUrl(baseUrl ?? "");
}
// </ApiClient>
"#,
    );

    vec![TsItem::Raw(class)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::ts::Emit;
    use crate::ir::{PathTemplate, RequestFormat};
    use indexmap::IndexMap;

    fn endpoint(method: HttpMethod) -> EndpointDescriptor {
        EndpointDescriptor {
            method,
            path: PathTemplate::parse("/pets"),
            alias: format!("{}_Pets", method.as_key()),
            operation_id: None,
            request_format: RequestFormat::Json,
            parameters: Vec::new(),
            responses: IndexMap::new(),
        }
    }

    #[test]
    fn test_shorthands_only_for_present_methods() {
        let items = shorthand_types(&[endpoint(HttpMethod::Post), endpoint(HttpMethod::Head)]);
        let emitted: Vec<String> = items.iter().map(|i| i.emit()).collect();
        assert_eq!(
            emitted,
            [
                "export type PostEndpoints = EndpointByMethod[\"post\"];\n",
                "export type AllEndpoints = EndpointByMethod[keyof EndpointByMethod];\n",
            ]
        );
    }

    #[test]
    fn test_client_has_one_method_per_verb() {
        let code = api_client(&[
            endpoint(HttpMethod::Get),
            endpoint(HttpMethod::Delete),
            endpoint(HttpMethod::Get),
        ])[0]
            .emit();
        assert_eq!(code.matches("this.fetcher(\"get\"").count(), 1);
        assert_eq!(code.matches("this.fetcher(\"delete\"").count(), 1);
        assert!(!code.contains("this.fetcher(\"post\""));
        assert!(code.contains("export function createApiClient(fetcher: Fetcher, baseUrl?: string)"));
        assert!(code.contains("setBaseUrl(baseUrl: string)"));
    }

    #[test]
    fn test_client_types_declare_fetcher() {
        let code = client_types().emit();
        assert!(code.contains("export type Fetcher = ("));
        assert!(code.contains("type MaybeOptionalArg<T>"));
    }
}
