//! API-level IR: endpoints, parameters, responses, and the generation context.

use indexmap::IndexMap;

use super::types::{TypeDescriptor, TypeTable};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Parse a lowercase path-item key.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "get" => HttpMethod::Get,
            "put" => HttpMethod::Put,
            "post" => HttpMethod::Post,
            "delete" => HttpMethod::Delete,
            "options" => HttpMethod::Options,
            "head" => HttpMethod::Head,
            "patch" => HttpMethod::Patch,
            "trace" => HttpMethod::Trace,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lowercase form, used as object keys and client method names.
    pub fn as_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
    Body,
}

impl ParamLocation {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "path" => ParamLocation::Path,
            "query" => ParamLocation::Query,
            "header" => ParamLocation::Header,
            "cookie" => ParamLocation::Cookie,
            _ => return None,
        })
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
            ParamLocation::Body => "body",
        }
    }
}

/// Single parameter of an endpoint
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    /// Name as written in the document
    pub name: String,
    pub location: ParamLocation,
    pub ty: TypeDescriptor,
    pub required: bool,
}

/// URL template part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Static string
    Literal(String),
    /// `{name}` placeholder
    Param(String),
}

/// A parsed path such as `/pets/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pub raw: String,
    pub segments: Vec<PathSegment>,
}

impl PathTemplate {
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut in_param = false;

        for c in path.chars() {
            match c {
                '{' if !in_param => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Literal(std::mem::take(&mut current)));
                    }
                    in_param = true;
                }
                '}' if in_param => {
                    segments.push(PathSegment::Param(std::mem::take(&mut current)));
                    in_param = false;
                }
                _ => current.push(c),
            }
        }
        if in_param {
            // Unterminated brace: keep it as text.
            current.insert(0, '{');
        }
        if !current.is_empty() {
            segments.push(PathSegment::Literal(current));
        }

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    /// Placeholder names in order of appearance.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            PathSegment::Param(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }
}

/// How the request body is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    FormData,
    FormUrl,
    Binary,
    Text,
}

impl RequestFormat {
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type == "application/json" || media_type.ends_with("+json") {
            RequestFormat::Json
        } else if media_type == "multipart/form-data" {
            RequestFormat::FormData
        } else if media_type == "application/x-www-form-urlencoded" {
            RequestFormat::FormUrl
        } else if media_type.starts_with("text/") {
            RequestFormat::Text
        } else if media_type == "application/octet-stream"
            || media_type.starts_with("image/")
            || media_type.starts_with("audio/")
            || media_type.starts_with("video/")
            || media_type == "application/pdf"
        {
            RequestFormat::Binary
        } else {
            RequestFormat::Json
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestFormat::Json => "json",
            RequestFormat::FormData => "form-data",
            RequestFormat::FormUrl => "form-url",
            RequestFormat::Binary => "binary",
            RequestFormat::Text => "text",
        }
    }
}

/// One API operation.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    pub method: HttpMethod,
    pub path: PathTemplate,
    /// Unique identifier for the endpoint (e.g., `get_FindPets`)
    pub alias: String,
    pub operation_id: Option<String>,
    pub request_format: RequestFormat,
    pub parameters: Vec<ParamDescriptor>,
    /// Status key (`"200"`, `"2XX"`, `"default"`) -> body type; `None` = no content
    pub responses: IndexMap<String, Option<TypeDescriptor>>,
}

impl EndpointDescriptor {
    pub fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &ParamDescriptor> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    /// The success response: first 2xx in document order, then `default`.
    pub fn primary_response(&self) -> Option<&TypeDescriptor> {
        self.responses
            .iter()
            .find(|(status, _)| is_success_status(status))
            .or_else(|| self.responses.get_key_value("default"))
            .and_then(|(_, ty)| ty.as_ref())
    }
}

/// `200`..`299` or the `2XX` range.
pub fn is_success_status(status: &str) -> bool {
    status.len() == 3 && status.starts_with('2')
}

/// A schema node mapped to `unknown` instead of something more precise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// JSON pointer of the node
    pub pointer: String,
    pub reason: String,
}

/// The IR: everything the emitter needs besides the runtime choice.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub endpoints: Vec<EndpointDescriptor>,
    pub types: TypeTable,
    pub diagnostics: Vec<Diagnostic>,
}
