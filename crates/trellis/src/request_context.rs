// File: src/request_context.rs
// Purpose: Request context with path, query params, headers, and cookies

use axum::http::{request::Parts, HeaderMap, Method, Uri};
use std::borrow::Cow;
use std::collections::HashMap;
use trellis_router::clean_path;

/// Query marker sent by live navigation requests (`?__live=navigation`)
pub const LIVE_NAVIGATION_PARAM: &str = "__live";
pub const LIVE_NAVIGATION_VALUE: &str = "navigation";

/// Request context passed to parsers, loaders, and render callbacks
#[derive(Clone)]
pub struct RequestContext {
    /// HTTP method
    pub method: Method,

    /// Request path, percent-decoded and cleaned when built from a URI
    pub path: String,

    /// Query parameters from URL (?key=value)
    pub query: QueryParams,

    /// Request headers
    pub headers: HeaderMap,

    /// Parsed cookies
    pub cookies: HashMap<String, String>,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>, query: QueryParams, headers: HeaderMap) -> Self {
        let cookies = Self::parse_cookies(&headers);

        Self {
            method,
            path: path.into(),
            query,
            headers,
            cookies,
        }
    }

    /// Build from the parts of an incoming request
    pub fn from_parts(parts: &Parts) -> Self {
        Self::from_uri(parts.method.clone(), &parts.uri, parts.headers.clone())
    }

    pub fn from_uri(method: Method, uri: &Uri, headers: HeaderMap) -> Self {
        let query = uri.query().map(QueryParams::parse).unwrap_or_default();
        Self::new(method, request_path(uri.path()), query, headers)
    }

    /// Shorthand for a GET request to `uri` (path plus optional query)
    pub fn get(uri: &str) -> Self {
        match uri.parse::<Uri>() {
            Ok(uri) => Self::from_uri(Method::GET, &uri, HeaderMap::new()),
            Err(_) => Self::new(Method::GET, uri, QueryParams::default(), HeaderMap::new()),
        }
    }

    /// Parse cookies from Cookie header
    fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
        let mut cookies = HashMap::new();

        if let Some(cookie_header) = headers.get("cookie") {
            if let Ok(cookie_str) = cookie_header.to_str() {
                for cookie in cookie_str.split(';') {
                    let cookie = cookie.trim();
                    if let Some((key, value)) = cookie.split_once('=') {
                        cookies.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }

        cookies
    }

    pub fn get_cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// True for live requests issued by client-side navigation
    pub fn is_live_navigation(&self) -> bool {
        self.query.get(LIVE_NAVIGATION_PARAM).map(String::as_str) == Some(LIVE_NAVIGATION_VALUE)
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }
}

/// Query parameters from URL
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Parse a raw query string (`a=1&b=two%20words`)
    ///
    /// Keys and values are percent-decoded and `+` reads as a space. A
    /// repeated key keeps its last value.
    pub fn parse(raw: &str) -> Self {
        let params = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a query parameter as a specific type
    pub fn get_as<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.params.get(key)?.parse().ok()
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.params
    }
}

/// Decoded, canonical request path; invalid UTF-8 escapes stay encoded
fn request_path(raw: &str) -> String {
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    clean_path(&decoded).into_owned()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
