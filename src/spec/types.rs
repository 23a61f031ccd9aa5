use http::Method;
use serde_json::Value;
use super::SecurityRequirement;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
            ParameterLocation::Header => write!(f, "Header"),
            ParameterLocation::Cookie => write!(f, "Cookie"),
        }
    }
}

impl From<oas3::spec::ParameterIn> for ParameterLocation {
    fn from(loc: oas3::spec::ParameterIn) -> Self {
        match loc {
            oas3::spec::ParameterIn::Path => ParameterLocation::Path,
            oas3::spec::ParameterIn::Query => ParameterLocation::Query,
            oas3::spec::ParameterIn::Header => ParameterLocation::Header,
            oas3::spec::ParameterIn::Cookie => ParameterLocation::Cookie,
        }
    }
}

/// How an array/object parameter value is serialized in the URL, per OpenAPI 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    Matrix,
    Label,
    Form,
    Simple,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

impl From<oas3::spec::ParameterStyle> for ParameterStyle {
    fn from(style: oas3::spec::ParameterStyle) -> Self {
        match style {
            oas3::spec::ParameterStyle::Matrix => ParameterStyle::Matrix,
            oas3::spec::ParameterStyle::Label => ParameterStyle::Label,
            oas3::spec::ParameterStyle::Form => ParameterStyle::Form,
            oas3::spec::ParameterStyle::Simple => ParameterStyle::Simple,
            oas3::spec::ParameterStyle::SpaceDelimited => ParameterStyle::SpaceDelimited,
            oas3::spec::ParameterStyle::PipeDelimited => ParameterStyle::PipeDelimited,
            oas3::spec::ParameterStyle::DeepObject => ParameterStyle::DeepObject,
        }
    }
}

/// A single routed operation: method + path template plus everything the
/// firewall needs to validate requests/responses and enforce auth against it.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    pub path_pattern: String,
    pub operation_id: String,
    pub parameters: Vec<ParameterMeta>,
    pub request_schema: Option<Value>,
    pub request_body_required: bool,
    pub response_schema: Option<Value>,
    pub responses: Responses,
    pub security: Vec<SecurityRequirement>,
    pub base_path: String,
}

#[derive(Debug, Clone)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
    pub style: Option<ParameterStyle>,
    pub explode: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    pub schema: Option<Value>,
}

pub type Responses = std::collections::HashMap<u16, std::collections::HashMap<String, ResponseSpec>>;
