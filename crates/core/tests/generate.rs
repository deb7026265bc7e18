#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use typed_openapi_core::ir::{HttpMethod, ParamLocation, TypeDescriptor};
use typed_openapi_core::{
    Error, GenerationContext, OpenApiSpec, RuntimeChoice, generate, generate_file,
    map_openapi_endpoints,
};

const PETSTORE: &str = include_str!("samples/petstore.yaml");

const PET_BY_ID: &str = r#"{
  "openapi": "3.0.3",
  "paths": {
    "/pets/{id}": {
      "get": {
        "parameters": [
          { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
        ],
        "responses": {
          "200": {
            "description": "ok",
            "content": {
              "application/json": {
                "schema": {
                  "type": "object",
                  "required": ["name"],
                  "properties": { "name": { "type": "string" } }
                }
              }
            }
          }
        }
      }
    }
  }
}"#;

fn petstore() -> GenerationContext {
    map_openapi_endpoints(&OpenApiSpec::parse(PETSTORE).unwrap())
}

/// The text between `start` and the next `end` after it.
fn section<'a>(output: &'a str, start: &str, end: &str) -> &'a str {
    let from = output.find(start).unwrap();
    let to = from + output[from..].find(end).unwrap();
    &output[from..to]
}

#[test]
fn test_determinism() {
    for runtime in RuntimeChoice::ALL {
        let first = generate(PETSTORE, runtime).unwrap();
        let second = generate(PETSTORE, runtime).unwrap();
        assert_eq!(first, second, "runtime {runtime}");
    }
}

#[test]
fn test_petstore_ir() {
    let ctx = petstore();

    let endpoints: Vec<_> = ctx
        .endpoints
        .iter()
        .map(|e| (e.method, e.path.raw.as_str(), e.alias.as_str()))
        .collect();
    assert_eq!(
        endpoints,
        [
            (HttpMethod::Get, "/pets", "get_ListPets"),
            (HttpMethod::Post, "/pets", "post_CreatePet"),
            (HttpMethod::Get, "/pets/{id}", "get_GetPetById"),
            (HttpMethod::Delete, "/pets/{id}", "delete_PetsId"),
            (HttpMethod::Get, "/categories", "get_ListCategories"),
        ]
    );

    let names: Vec<_> = ctx.types.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Pet",
            "NewPet",
            "Pets",
            "Status",
            "Category",
            "Error",
            "Anything",
            "GetPetByIdResponse200",
        ]
    );

    // YAML integer status keys become strings.
    let statuses: Vec<_> = ctx.endpoints[0].responses.keys().map(String::as_str).collect();
    assert_eq!(statuses, ["200", "default"]);

    assert_eq!(ctx.diagnostics.len(), 1);
    assert_eq!(ctx.diagnostics[0].pointer, "#/components/schemas/Anything");
}

#[test]
fn test_cycle_termination() {
    let doc = OpenApiSpec::from_json(
        r##"{ "components": { "schemas": {
            "A": { "type": "object", "properties": { "self": { "$ref": "#/components/schemas/A" } } }
        } } }"##,
    )
    .unwrap();
    let ctx = map_openapi_endpoints(&doc);

    assert_eq!(ctx.types.len(), 1);
    let entry = ctx.types.get("#/components/schemas/A").unwrap();
    assert!(entry.recursive);
    let TypeDescriptor::Object { properties, .. } = &entry.ty else {
        panic!("expected object");
    };
    assert!(matches!(
        &properties["self"].ty,
        TypeDescriptor::Reference { name, .. } if name == "A"
    ));

    let zod = generate_file(&ctx, RuntimeChoice::Zod).unwrap();
    assert!(zod.contains(
        "export const A: z.ZodType<Schemas.A> = z.object({ self: z.lazy(() => A).optional() });"
    ));
    let types = generate_file(&ctx, RuntimeChoice::None).unwrap();
    assert!(types.contains("export type A = {\n    self?: Schemas.A | undefined;\n  };"));
}

#[test]
fn test_recursive_schema_in_petstore() {
    let output = generate(PETSTORE, RuntimeChoice::Valibot).unwrap();
    assert!(output.contains("export const Category: v.GenericSchema<Schemas.Category> = "));
    assert!(output.contains("children: v.optional(v.array(v.lazy(() => Category)))"));
}

#[test]
fn test_name_uniqueness() {
    let doc = OpenApiSpec::from_json(
        r#"{ "components": { "schemas": {
            "pet-item": { "type": "string" },
            "pet.item": { "type": "number" },
            "Endpoints": { "type": "boolean" }
        } } }"#,
    )
    .unwrap();
    let ctx = map_openapi_endpoints(&doc);
    let names: Vec<_> = ctx.types.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["PetItem", "PetItem2", "Endpoints2"]);

    let output = generate_file(&ctx, RuntimeChoice::Zod).unwrap();
    assert!(output.contains("export const PetItem = z.string();"));
    assert!(output.contains("export const PetItem2 = z.number();"));
    assert!(output.contains("export const Endpoints2 = z.boolean();"));
}

#[test]
fn test_response_completeness() {
    let doc = OpenApiSpec::from_json(
        r#"{ "paths": {
            "/a": { "get": { "responses": {} }, "put": {} },
            "/b": { "patch": { "responses": { "204": { "description": "none" } } } }
        } }"#,
    )
    .unwrap();
    let ctx = map_openapi_endpoints(&doc);
    let endpoints: Vec<_> = ctx
        .endpoints
        .iter()
        .map(|e| (e.method, e.path.raw.as_str(), e.responses.len()))
        .collect();
    assert_eq!(
        endpoints,
        [
            (HttpMethod::Get, "/a", 0),
            (HttpMethod::Put, "/a", 0),
            (HttpMethod::Patch, "/b", 1),
        ]
    );
    assert_eq!(ctx.endpoints[2].responses["204"], None);

    let output = generate_file(&ctx, RuntimeChoice::None).unwrap();
    assert!(output.contains("    response: unknown;\n    responses: {};\n"));
    assert!(output.contains("    responses: { \"204\": unknown };\n"));
}

#[test]
fn test_unknown_shape_safety() {
    let expected = [
        (RuntimeChoice::None, None),
        (RuntimeChoice::Zod, Some("export const Anything = z.unknown();")),
        (RuntimeChoice::Valibot, Some("export const Anything = v.unknown();")),
        (RuntimeChoice::IoTs, Some("export const Anything = t.unknown;")),
        (RuntimeChoice::Typebox, Some("  Anything: Type.Unknown(),")),
        (RuntimeChoice::Yup, Some("export const Anything = y.mixed().nullable();")),
        (RuntimeChoice::Arktype, Some("  Anything: \"unknown\",")),
    ];
    for (runtime, validator) in expected {
        let output = generate(PETSTORE, runtime).unwrap();
        assert!(output.contains("  export type Anything = unknown;\n"));
        if let Some(validator) = validator {
            assert!(output.contains(validator), "runtime {runtime}");
        }
    }
}

#[test]
fn test_runtime_backend_parity() {
    let types_only = generate(PETSTORE, RuntimeChoice::None).unwrap();
    let schemas = section(&types_only, "export namespace Schemas {", "\n}\n");
    let endpoints = section(&types_only, "export namespace Endpoints {", "\n}\n");
    let ctx = petstore();

    for runtime in RuntimeChoice::ALL {
        let output = generate(PETSTORE, runtime).unwrap();
        assert_eq!(section(&output, "export namespace Schemas {", "\n}\n"), schemas);
        assert_eq!(section(&output, "export namespace Endpoints {", "\n}\n"), endpoints);
        assert_eq!(output.matches("export class ApiClient").count(), 1);

        if runtime != RuntimeChoice::None {
            for endpoint in &ctx.endpoints {
                let declaration = format!("export const {} = {{", endpoint.alias);
                assert_eq!(output.matches(&declaration).count(), 1, "runtime {runtime}");
            }
        }
    }
    assert_eq!(schemas.matches("  export type ").count(), ctx.types.len());
    assert_eq!(endpoints.matches("  export type ").count(), ctx.endpoints.len());
}

#[test]
fn test_end_to_end_pet_by_id() {
    let doc = OpenApiSpec::from_json(PET_BY_ID).unwrap();
    let ctx = map_openapi_endpoints(&doc);

    assert_eq!(ctx.endpoints.len(), 1);
    let endpoint = &ctx.endpoints[0];
    assert_eq!(endpoint.params_in(ParamLocation::Path).count(), 1);
    assert_eq!(endpoint.parameters.len(), 1);
    assert_eq!(endpoint.responses.len(), 1);

    let types_only = generate_file(&ctx, RuntimeChoice::None).unwrap();
    assert_eq!(types_only.matches("export type GetPetsIdResponse200 = ").count(), 1);
    assert!(types_only.contains("  export type GetPetsIdResponse200 = {\n    name: string;\n  };\n"));
    assert_eq!(types_only.matches("export type get_PetsId = ").count(), 1);
    assert!(types_only.contains("  get: { \"/pets/{id}\": Endpoints.get_PetsId };\n"));
    assert!(types_only.contains("    parameters: { path: { id: number } };\n"));
    assert!(!types_only.contains("export const GetPetsIdResponse200"));

    let zod = generate_file(&ctx, RuntimeChoice::Zod).unwrap();
    assert!(zod.contains("export const GetPetsIdResponse200 = z.object({ name: z.string() });"));
    assert!(zod.contains("  response: GetPetsIdResponse200,\n"));
    assert!(zod.contains("  parameters: z.object({ path: z.object({ id: z.number().int() }) }),\n"));
}

#[test]
fn test_dangling_reference_fails_every_runtime() {
    let document = r##"{ "paths": { "/a": { "post": {
        "requestBody": { "content": { "application/json": {
            "schema": { "$ref": "#/components/schemas/Missing" }
        } } },
        "responses": {}
    } } } }"##;
    for runtime in RuntimeChoice::ALL {
        let err = generate(document, runtime).unwrap_err();
        assert!(
            matches!(err, Error::DanglingReference { ref key } if key == "#/components/schemas/Missing")
        );
    }
}

#[test]
fn test_malformed_document() {
    let err = generate("{ \"paths\": [", RuntimeChoice::None).unwrap_err();
    assert!(matches!(err, Error::Document(_)));
}

#[test]
fn test_parallel_runs_are_independent() {
    let expected: Vec<String> = RuntimeChoice::ALL
        .iter()
        .map(|runtime| generate(PETSTORE, *runtime).unwrap())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = RuntimeChoice::ALL
            .iter()
            .flat_map(|runtime| std::iter::repeat_n(*runtime, 4))
            .map(|runtime| scope.spawn(move || (runtime, generate(PETSTORE, runtime).unwrap())))
            .collect();
        for handle in handles {
            let (runtime, output) = handle.join().unwrap();
            let index = RuntimeChoice::ALL.iter().position(|r| *r == runtime).unwrap();
            assert_eq!(output, expected[index]);
        }
    });
}

#[test]
fn test_io_ts_and_typebox_client() {
    let io_ts = generate(PETSTORE, RuntimeChoice::IoTs).unwrap();
    assert!(io_ts.starts_with("import * as t from \"io-ts\";\n"));
    assert!(io_ts.contains("export const Category: t.Type<Schemas.Category> = "));

    let typebox = generate(PETSTORE, RuntimeChoice::Typebox).unwrap();
    assert!(typebox.starts_with("import { Type } from \"@sinclair/typebox\";\n"));
    assert!(typebox.contains("const __Schemas = Type.Module({\n"));
    assert!(typebox.contains("export const Pet = __Schemas.Import(\"Pet\");"));
    assert!(typebox.contains("  Pets: Type.Array(Type.Ref(\"Pet\")),\n"));
}

#[test]
fn test_yup_and_arktype_client() {
    let yup = generate(PETSTORE, RuntimeChoice::Yup).unwrap();
    assert!(yup.starts_with("import * as y from \"yup\";\n"));
    assert!(yup.contains("export const Category: y.Schema<Schemas.Category> = "));
    assert!(yup.contains("y.lazy(() => Category)"));

    let arktype = generate(PETSTORE, RuntimeChoice::Arktype).unwrap();
    assert!(arktype.starts_with("import { scope, type } from \"arktype\";\n"));
    assert!(arktype.contains("const __Schemas = scope({\n"));
    assert!(arktype.contains("}).export();\n"));
    assert!(arktype.contains("export const Pet = __Schemas.Pet;"));
    assert!(arktype.contains("  Pets: [\"Pet\", \"[]\"],\n"));
    assert!(arktype.contains("  method: type([\"===\", \"GET\"]),\n"));
}

#[test]
fn test_root_path_aliases_are_identifiers() {
    let document = r#"{ "paths": { "/": {
        "get": { "responses": {} },
        "delete": { "responses": {} }
    } } }"#;
    let ctx = map_openapi_endpoints(&OpenApiSpec::from_json(document).unwrap());
    let aliases: Vec<_> = ctx.endpoints.iter().map(|e| e.alias.as_str()).collect();
    assert_eq!(aliases, ["get_Root", "delete_Root"]);

    let types_only = generate(document, RuntimeChoice::None).unwrap();
    assert!(types_only.contains("  export type delete_Root = {\n"));
    assert!(!types_only.contains("export type delete "));
    let zod = generate(document, RuntimeChoice::Zod).unwrap();
    assert!(zod.contains("export const delete_Root = {\n"));
    assert!(!zod.contains("export const delete "));
}

#[test]
fn test_pointer_refs_outside_component_names() {
    let document = r##"{
        "paths": {
            "/a": { "get": { "responses": { "200": {
                "description": "ok",
                "content": { "application/json": { "schema": {
                    "type": "object", "properties": { "id": { "type": "integer" } }
                } } }
            } } } },
            "/b": { "get": { "responses": { "200": {
                "description": "ok",
                "content": { "application/json": { "schema": {
                    "$ref": "#/paths/~1a/get/responses/200/content/application~1json/schema"
                } } }
            } } } }
        },
        "components": { "schemas": { "Pet": {
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "owner": { "$ref": "#/components/schemas/Pet/properties/name" }
            }
        } } }
    }"##;
    let ctx = map_openapi_endpoints(&OpenApiSpec::from_json(document).unwrap());
    assert!(ctx.diagnostics.is_empty());
    let names: Vec<_> = ctx.types.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Pet", "Name", "GetAResponse200"]);
    assert_eq!(ctx.endpoints[0].responses["200"], ctx.endpoints[1].responses["200"]);

    for runtime in RuntimeChoice::ALL {
        let output = generate(document, runtime).unwrap();
        assert!(output.contains("    owner?: Schemas.Name | undefined;\n"), "runtime {runtime}");
        assert_eq!(output.matches("response: Schemas.GetAResponse200;").count(), 2);
    }
}

