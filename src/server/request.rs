//! HTTP request parsing - hot path module.
//!
//! # JSF Compliance (Rule 206)
//!
//! This module is part of the request hot path. Clippy lints are denied
//! to enforce "no heap allocations after initialization".

// JSF Rule 206: Deny heap allocations in the hot path
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::router::HeaderVec;
use crate::router::ParamVec;
use crate::spec::ParameterStyle;
use http::Method;
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

/// Parsed HTTP request data used by `AppService`.
///
/// Contains all extracted information from the raw HTTP request including
/// headers, cookies, query parameters, and JSON body.
///
/// # JSF Compliance
///
/// Uses SmallVec (HeaderVec/ParamVec) instead of HashMap for stack-allocated
/// storage in the common case, avoiding heap allocation in the hot path.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    /// JSF P1: Use Method enum instead of String to avoid allocation
    pub method: Method,
    /// Request path including query string
    pub path: String,
    /// HTTP headers (lowercase keys) - stack-allocated for ≤16 headers
    pub headers: HeaderVec,
    /// Parsed cookies from Cookie header - stack-allocated for ≤16 cookies
    pub cookies: HeaderVec,
    /// Parsed query string parameters - stack-allocated for ≤8 params
    pub query_params: ParamVec,
    /// Parsed JSON body (if content-type is application/json)
    pub body: Option<serde_json::Value>,
    /// Raw body bytes, preserved verbatim for forwarding upstream regardless of
    /// whether they parsed as JSON.
    pub raw_body: Vec<u8>,
}

impl ParsedRequest {
    /// Get a header by name (case-insensitive)
    #[inline]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a cookie by name
    #[inline]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name
    #[inline]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Extract cookies from headers, returning a stack-allocated SmallVec
pub fn parse_cookies(headers: &HeaderVec) -> HeaderVec {
    // Find cookie header using linear search (efficient for small collections)
    let cookie_value = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("cookie"))
        .map(|(_, v)| v.as_str());

    match cookie_value {
        Some(c) => c
            .split(';')
            .filter_map(|pair| {
                let mut parts = pair.trim().splitn(2, '=');
                let name = parts.next()?.trim().to_string();
                let value = parts.next().unwrap_or("").trim().to_string();
                Some((name, value))
            })
            .collect(),
        None => HeaderVec::new(),
    }
}

/// Parse query string parameters from a URL path
///
/// Extracts everything after the `?` character and URL-decodes parameter names and values.
///
/// # Arguments
///
/// * `path` - The full URL path (e.g., `/users?limit=10&offset=20`)
///
/// # Returns
///
/// A stack-allocated SmallVec of query parameter (name, value) pairs
///
/// # JSF Compliance
///
/// Returns ParamVec (SmallVec) to avoid heap allocation for ≤8 params
pub fn parse_query_params(path: &str) -> ParamVec {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        // JSF: Use Arc::from for param names (O(1) clone in hot path)
        // Values remain String as they're per-request data
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
            .collect()
    } else {
        ParamVec::new()
    }
}

/// Decode a parameter value according to OpenAPI schema and style
///
/// Converts string parameter values to their appropriate JSON types based on
/// the OpenAPI schema (integer, number, boolean, array, object). Handles
/// different serialization styles (form, simple, etc.) for arrays and objects.
///
/// # Arguments
///
/// * `value` - The raw parameter value string
/// * `schema` - Optional JSON Schema for type conversion
/// * `style` - Optional OpenAPI parameter style (form, simple, etc.)
/// * `_explode` - Whether to use exploded format (currently unused)
///
/// # Returns
///
/// The decoded JSON value with appropriate type
pub fn decode_param_value(
    value: &str,
    schema: Option<&serde_json::Value>,
    style: Option<ParameterStyle>,
    _explode: Option<bool>,
) -> serde_json::Value {
    use serde_json::Value;

    fn convert_primitive(val: &str, schema: Option<&Value>) -> Value {
        if let Some(ty) = schema.and_then(|s| s.get("type").and_then(|v| v.as_str())) {
            match ty {
                "integer" => val
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(val.to_string())),
                "number" => val
                    .parse::<f64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(val.to_string())),
                "boolean" => val
                    .parse::<bool>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(val.to_string())),
                _ => Value::String(val.to_string()),
            }
        } else {
            Value::String(val.to_string())
        }
    }

    if let Some(ty) = schema.and_then(|s| s.get("type").and_then(|v| v.as_str())) {
        match ty {
            "array" => {
                let items_schema = schema.and_then(|s| s.get("items"));
                let delim = match style.unwrap_or(ParameterStyle::Form) {
                    ParameterStyle::SpaceDelimited => ' ',
                    ParameterStyle::PipeDelimited => '|',
                    _ => ',',
                };
                let parts = value
                    .split(delim)
                    .filter(|s| !s.is_empty())
                    .map(|p| convert_primitive(p.trim(), items_schema))
                    .collect::<Vec<_>>();
                Value::Array(parts)
            }
            "object" => serde_json::from_str(value).unwrap_or(Value::String(value.to_string())),
            _ => convert_primitive(value, schema),
        }
    } else {
        Value::String(value.to_string())
    }
}

/// Parse an incoming HTTP request into a ParsedRequest
///
/// Extracts all components (method, path, headers, cookies, query params, body)
/// from the raw HTTP request.
///
/// # Arguments
///
/// * `req` - The raw HTTP request from may_minihttp
///
/// # Returns
///
/// A parsed request with all extracted components
///
/// # JSF Compliance
///
/// Uses SmallVec for headers, cookies, and query params to avoid heap
/// allocation in the common case.
///
/// # Returns
///
/// Returns `Ok(ParsedRequest)` if the request is valid, or `Err(invalid_method_string)`
/// if the HTTP method is invalid and cannot be parsed.
pub fn parse_request(req: Request) -> Result<ParsedRequest, String> {
    // JSF P1: Parse method directly to Method enum (avoids String allocation)
    // Reject invalid HTTP methods instead of defaulting to GET (security fix)
    let method_str = req.method();
    let method = method_str.parse().map_err(|_| method_str.to_string())?;
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();
    // JSF P1: Use static strings for HTTP version (avoids format! allocation)
    // Note: may_minihttp version() returns a Debug-able type, but we can't match on it
    // So we format once (acceptable as it's not in the hot path per-request allocation)
    let http_version = format!("{:?}", req.version());

    // R3: Headers extracted - using SmallVec for stack allocation
    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let header_names: Vec<&String> = headers.iter().map(|(k, _)| k).take(20).collect();
    let header_count = headers.len();
    let size_bytes: usize = headers.iter().map(|(k, v)| k.len() + v.len()).sum();

    debug!(
        header_count = header_count,
        size_bytes = size_bytes,
        header_names = ?header_names,
        "Headers extracted"
    );

    // R7: Cookies extracted
    let cookies = parse_cookies(&headers);
    let cookie_names: Vec<&String> = cookies.iter().map(|(k, _)| k).collect();
    debug!(
        cookie_count = cookies.len(),
        cookie_names = ?cookie_names,
        "Cookies extracted"
    );

    // R4: Query params parsed
    let query_params = parse_query_params(&raw_path);
    debug!(
        param_count = query_params.len(),
        query_params = ?query_params,
        "Query params parsed"
    );

    // R5 & R6: Request body read and JSON body parsed
    let parse_start = std::time::Instant::now();
    let mut raw_body = Vec::new();
    let _ = req.body().read_to_end(&mut raw_body);
    let body = if raw_body.is_empty() {
        None
    } else {
        // Find content-type header using the HeaderVec helper
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
            .unwrap_or("");

        // R5: Request body read
        info!(
            content_length = raw_body.len(),
            content_type = %content_type,
            body_size_bytes = raw_body.len(),
            "Request body read"
        );

        // R6: JSON body parsed
        let body_result: Result<serde_json::Value, _> = serde_json::from_slice(&raw_body);
        let parse_duration_ms = parse_start.elapsed().as_millis() as u64;

        if let Ok(ref json) = body_result {
            debug!(
                parse_duration_ms = parse_duration_ms,
                body_fields = json.as_object().map(|o| o.len()),
                "JSON body parsed"
            );
        } else if body_result.is_err() {
            debug!(
                parse_duration_ms = parse_duration_ms,
                error = "JSON parse failed",
                "JSON body parse attempted"
            );
        }

        body_result.ok()
    };

    // R2: HTTP request parsed
    info!(
        method = %method,
        path = %path,
        http_version = %http_version,
        headers_count = header_count,
        "HTTP request parsed"
    );

    Ok(ParsedRequest {
        method,
        path,
        headers,
        cookies,
        query_params,
        body,
        raw_body,
    })
}
