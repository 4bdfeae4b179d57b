use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::utils::UriUtils;

/// HTTP method, also used as the operation key of a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            "PATCH" => Ok(HttpMethod::Patch),
            "TRACE" => Ok(HttpMethod::Trace),
            _ => Err(format!("Unknown HTTP method '{}'", s)),
        }
    }
}

/// Multi-valued header collection with case-insensitive name lookup.
/// Entries keep their insertion order and original casing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, keeping any existing values for the same name
    pub fn append(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// Replace every value for `name` with a single value
    pub fn insert(&mut self, name: &str, value: &str) {
        self.remove(name);
        self.append(name, value);
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// All values for `name` joined with a comma
    pub fn get(&self, name: &str) -> Option<String> {
        let values = self.get_all(name);
        if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Media type without parameters, lowercased (`application/json; charset=utf-8` → `application/json`)
pub fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Message body with its declared content type
#[derive(Debug, Clone, PartialEq)]
pub struct HttpBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl HttpBody {
    pub fn new(content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.to_string(),
            bytes,
        }
    }

    pub fn text(content_type: &str, text: &str) -> Self {
        Self::new(content_type, text.as_bytes().to_vec())
    }

    pub fn json(value: &Value) -> Self {
        Self::new("application/json", value.to_string().into_bytes())
    }

    /// Content type without parameters, lowercased
    pub fn media_type(&self) -> String {
        normalize_media_type(&self.content_type)
    }

    pub fn as_text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    pub fn parse_json(&self) -> serde_json::Result<Value> {
        serde_json::from_slice(&self.bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Outgoing request as handed to the HTTP client collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute (`http://host/api/x?y=1`) or relative (`/api/x?y=1`) URI
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(HttpMethod::Get, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(HttpMethod::Post, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(HttpMethod::Put, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::new(HttpMethod::Delete, uri)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: HttpBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json_body(self, value: &Value) -> Self {
        self.with_body(HttpBody::json(value))
    }

    /// Absolute path of the URI, without scheme, authority, query or fragment
    pub fn path(&self) -> &str {
        UriUtils::path(&self.uri)
    }

    /// Raw query string (without the leading `?`), if any
    pub fn query(&self) -> Option<&str> {
        UriUtils::query(&self.uri)
    }
}

/// Response returned by the HTTP client collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<HttpBody>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: HttpBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json_body(self, value: &Value) -> Self {
        self.with_body(HttpBody::json(value))
    }

    pub fn status_code(&self) -> String {
        self.status.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_parsing_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("FETCH".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_header_lookup_joins_values() {
        let mut headers = HeaderMap::new();
        headers.append("Accept", "application/json");
        headers.append("accept", "text/plain");
        headers.append("X-Trace", "abc");

        assert_eq!(headers.get("ACCEPT"), Some("application/json,text/plain".to_string()));
        assert!(headers.contains("x-trace"));
        assert_eq!(headers.get("missing"), None);

        headers.insert("Accept", "*/*");
        assert_eq!(headers.get_all("accept"), vec!["*/*"]);
    }

    #[test]
    fn test_media_type_strips_parameters() {
        let body = HttpBody::text("Application/JSON; charset=utf-8", "{}");
        assert_eq!(body.media_type(), "application/json");
    }

    #[test]
    fn test_request_path_and_query() {
        let request = HttpRequest::get("http://localhost:8080/api/products?pageNo=1#top");

        assert_eq!(request.path(), "/api/products");
        assert_eq!(request.query(), Some("pageNo=1"));
    }

    #[test]
    fn test_json_body_builder() {
        let response = HttpResponse::new(201).with_json_body(&json!({ "name": "foo" }));
        let body = response.body.as_ref().unwrap();

        assert_eq!(body.media_type(), "application/json");
        assert_eq!(body.parse_json().unwrap(), json!({ "name": "foo" }));
        assert_eq!(response.status_code(), "201");
    }
}
