use super::types::{
    ParameterLocation, ParameterMeta, ParameterStyle, ResponseSpec, Responses, RouteMeta,
};
use super::SecurityScheme;
use crate::validator::{fail_if_issues, ValidationIssue};
use oas3::spec::{ObjectOrReference, Parameter};
use oas3::OpenApiV3Spec;
use serde_json::Value;

/// Resolve a JSON Schema `$ref` to the actual schema definition
///
/// Looks up schema references like `#/components/schemas/User` in the OpenAPI spec
/// and returns the resolved schema object.
pub fn resolve_schema_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::ObjectSchema> {
    if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
        spec.components
            .as_ref()?
            .schemas
            .get(name)
            .and_then(|schema_ref| match schema_ref {
                ObjectOrReference::Object(schema) => Some(schema),
                _ => None,
            })
    } else {
        None
    }
}

/// Recursively expand all JSON Schema `$ref` references in a value
///
/// Traverses the JSON value tree and replaces any `$ref` objects with their
/// resolved schema definitions from the OpenAPI spec. Adds an `x-ref-name` field
/// to track the original reference name.
pub fn expand_schema_refs(spec: &OpenApiV3Spec, value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(ref_path) = obj.get("$ref").and_then(|v| v.as_str()) {
                if let Some(schema) = resolve_schema_ref(spec, ref_path) {
                    if let Ok(mut new_val) = serde_json::to_value(schema) {
                        expand_schema_refs(spec, &mut new_val);
                        if let Some(name) = ref_path.strip_prefix("#/components/schemas/") {
                            if let Value::Object(o) = &mut new_val {
                                o.insert("x-ref-name".to_string(), Value::String(name.to_string()));
                            }
                        }
                        *value = new_val;
                        return;
                    }
                }
            }
            for v in obj.values_mut() {
                expand_schema_refs(spec, v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                expand_schema_refs(spec, v);
            }
        }
        _ => {}
    }
}

fn resolve_handler_name(
    operation: &oas3::spec::Operation,
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    operation
        .extensions
        .iter()
        .find_map(|(key, val)| {
            if key.starts_with("x-handler") {
                if let Value::String(s) = val {
                    return Some(s.clone());
                }
            }
            None
        })
        .or_else(|| operation.operation_id.clone())
        .or_else(|| {
            issues.push(ValidationIssue::new(
                location,
                "MissingHandler",
                "Missing operationId or x-handler-* extension",
            ));
            None
        })
}

/// Extract the request body schema from an OpenAPI operation
///
/// Parses the `requestBody` section of an operation and extracts the JSON schema
/// for `application/json` content type. Also determines if the request body is required.
pub fn extract_request_schema(
    spec: &OpenApiV3Spec,
    operation: &oas3::spec::Operation,
) -> (Option<Value>, bool) {
    let mut required = false;
    let mut schema = operation.request_body.as_ref().and_then(|r| match r {
        ObjectOrReference::Object(req_body) => {
            required = req_body.required.unwrap_or(false);
            req_body.content.get("application/json").and_then(|media| {
                match media.schema.as_ref()? {
                    ObjectOrReference::Object(schema_obj) => serde_json::to_value(schema_obj).ok(),
                    ObjectOrReference::Ref { ref_path, .. } => resolve_schema_ref(spec, ref_path)
                        .and_then(|s| serde_json::to_value(s).ok()),
                }
            })
        }
        _ => None,
    });
    if let Some(ref mut val) = schema {
        expand_schema_refs(spec, val);
    }
    (schema, required)
}

/// Extract response schemas from an OpenAPI operation
///
/// Parses all response definitions from an operation and extracts schemas and
/// content types for each status code. Prioritizes 200 OK with application/json,
/// then falls back to other 2xx responses, then any status with application/json.
///
/// Returns the default response schema (used for the happy-path validator) plus
/// the full per-status, per-media-type response map.
pub fn extract_response_schema_and_example(
    spec: &OpenApiV3Spec,
    operation: &oas3::spec::Operation,
) -> (Option<Value>, Responses) {
    let mut all: Responses = std::collections::HashMap::new();
    let mut default_schema = None;

    if let Some(responses_map) = operation.responses.as_ref() {
        for (status_str, resp_ref) in responses_map {
            let status: u16 = match status_str.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            if let ObjectOrReference::Object(resp_obj) = resp_ref {
                for (mt, media) in &resp_obj.content {
                    let mut schema = match media.schema.as_ref() {
                        Some(ObjectOrReference::Object(schema_obj)) => {
                            serde_json::to_value(schema_obj).ok()
                        }
                        Some(ObjectOrReference::Ref { ref_path, .. }) => {
                            resolve_schema_ref(spec, ref_path)
                                .and_then(|s| serde_json::to_value(s).ok())
                        }
                        None => None,
                    };
                    if let Some(ref mut val) = schema {
                        expand_schema_refs(spec, val);
                    }

                    all.entry(status)
                        .or_default()
                        .insert(mt.clone(), ResponseSpec { schema: schema.clone() });

                    if status == 200 && mt == "application/json" {
                        default_schema = schema;
                    }
                }
            }
        }
    }

    // Fallback selection if no 200 application/json found
    if default_schema.is_none() {
        let mut statuses: Vec<u16> = all.keys().cloned().collect();
        statuses.sort_unstable();
        default_schema = statuses
            .iter()
            .filter(|s| **s >= 200 && **s < 300)
            .find_map(|s| all.get(s).and_then(|m| m.get("application/json")))
            .and_then(|spec| spec.schema.clone());
    }

    if default_schema.is_none() {
        let mut statuses: Vec<u16> = all.keys().cloned().collect();
        statuses.sort_unstable();
        'outer: for s in statuses.iter().filter(|s| **s >= 200 && **s < 300) {
            if let Some(mt_map) = all.get(s) {
                for spec in mt_map.values() {
                    if spec.schema.is_some() {
                        default_schema = spec.schema.clone();
                        break 'outer;
                    }
                }
            }
        }
    }

    if default_schema.is_none() {
        let mut statuses: Vec<u16> = all.keys().cloned().collect();
        statuses.sort_unstable();
        default_schema = statuses
            .iter()
            .find_map(|s| all.get(s).and_then(|m| m.get("application/json")))
            .and_then(|spec| spec.schema.clone());
    }

    (default_schema, all)
}

/// Extract all security schemes from an OpenAPI specification
///
/// Parses the `components.securitySchemes` section and returns a map of scheme names
/// to their definitions (API keys, HTTP auth, OAuth2, OpenID Connect, etc.).
pub fn extract_security_schemes(
    spec: &OpenApiV3Spec,
) -> std::collections::HashMap<String, SecurityScheme> {
    spec.components
        .as_ref()
        .map(|c| {
            c.security_schemes
                .iter()
                .filter_map(|(name, scheme)| match scheme {
                    ObjectOrReference::Object(obj) => Some((name.clone(), obj.clone())),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn resolve_parameter_ref<'a>(
    spec: &'a OpenApiV3Spec,
    ref_path: &str,
) -> Option<&'a oas3::spec::Parameter> {
    if let Some(name) = ref_path.strip_prefix("#/components/parameters/") {
        spec.components
            .as_ref()?
            .parameters
            .get(name)
            .and_then(|param_ref| match param_ref {
                ObjectOrReference::Object(param) => Some(param),
                _ => None,
            })
    } else {
        None
    }
}

/// Extract parameter metadata from an OpenAPI operation
///
/// Resolves parameter references and extracts metadata for path, query, header,
/// and cookie parameters. Each parameter includes its name, location, schema,
/// whether it's required, and serialization style.
pub fn extract_parameters(
    spec: &OpenApiV3Spec,
    params: &Vec<ObjectOrReference<Parameter>>,
) -> Vec<ParameterMeta> {
    let mut out = Vec::new();
    for p in params {
        let param = match p {
            ObjectOrReference::Object(obj) => Some(obj),
            ObjectOrReference::Ref { ref_path, .. } => resolve_parameter_ref(spec, ref_path),
        };

        if let Some(param) = param {
            let schema = param.schema.as_ref().and_then(|s| match s {
                ObjectOrReference::Object(obj) => serde_json::to_value(obj).ok(),
                ObjectOrReference::Ref { ref_path, .. } => resolve_schema_ref(spec, ref_path)
                    .and_then(|sch| serde_json::to_value(sch).ok()),
            });

            out.push(ParameterMeta {
                name: param.name.clone(),
                location: ParameterLocation::from(param.location),
                required: param.required.is_some(),
                schema,
                style: param.style.map(ParameterStyle::from),
                explode: param.explode,
            });
        }
    }
    out
}

/// Merge path-level and operation-level parameters.
///
/// Per OpenAPI 3, an operation parameter overrides a path-item parameter with the
/// same name and location; path-level parameters not overridden are kept, in
/// path-then-operation declaration order.
fn merge_parameters(path_level: Vec<ParameterMeta>, operation_level: Vec<ParameterMeta>) -> Vec<ParameterMeta> {
    let mut order: Vec<(String, ParameterLocation)> = Vec::new();
    let mut by_key: std::collections::HashMap<(String, ParameterLocation), ParameterMeta> =
        std::collections::HashMap::new();

    for param in path_level.into_iter().chain(operation_level) {
        let key = (param.name.clone(), param.location.clone());
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.insert(key, param);
    }

    order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect()
}

/// Build route metadata for all operations in an OpenAPI specification
///
/// Walks every path and method, resolves the handler (operation) name, request
/// and response schemas, merged parameters, and effective security requirements.
pub fn build_routes(spec: &OpenApiV3Spec, slug: &str) -> anyhow::Result<Vec<RouteMeta>> {
    let _ = slug;
    let mut routes = Vec::new();
    let mut issues = Vec::new();

    let base_path = if let Some(server) = spec.servers.first() {
        let url_str = &server.url;
        url::Url::parse(url_str)
            .or_else(|_| url::Url::parse(&format!("http://dummy{url_str}")))
            .map(|u| {
                let p = u.path().trim_end_matches('/');
                if p == "/" || p.is_empty() {
                    String::new()
                } else {
                    p.to_string()
                }
            })
            .unwrap_or_default()
    } else {
        String::new()
    };

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            for (method_str, operation) in item.methods() {
                let method = method_str.clone();
                let location = format!("{path} {method}");

                let operation_id = match resolve_handler_name(operation, &location, &mut issues) {
                    Some(name) => name,
                    None => continue,
                };

                let (request_schema, request_body_required) =
                    extract_request_schema(spec, operation);
                let (response_schema, responses) =
                    extract_response_schema_and_example(spec, operation);

                let security = if !operation.security.is_empty() {
                    operation.security.clone()
                } else {
                    spec.security.clone()
                };

                let parameters = merge_parameters(
                    extract_parameters(spec, &item.parameters),
                    extract_parameters(spec, &operation.parameters),
                );

                routes.push(RouteMeta {
                    method,
                    path_pattern: path.clone(),
                    operation_id,
                    parameters,
                    request_schema,
                    request_body_required,
                    response_schema,
                    responses,
                    security,
                    base_path: base_path.clone(),
                });
            }
        }
    }

    fail_if_issues(issues);
    Ok(routes)
}
