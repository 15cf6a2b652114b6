//! Request handlers.
//!
//! # Data Flow
//! ```text
//! call-time params
//!     → merge_default_params (client defaults < handler defaults < call)
//!     → build_request (GET/HEAD: query string, OPTIONS: nothing,
//!                      others: form body; long GETs become POSTs)
//!     → SolrClient::execute (HTTP)
//!     → parse_response (wt=json → JSON, otherwise XML)
//! ```
//!
//! # Design Decisions
//! - A handler is a plain value; the client registry hands out clones, so a
//!   request in flight never observes later default changes
//! - Client defaults are passed in explicitly as a snapshot
//! - Transport and decode failures are returned as-is, never retried

pub mod registry;

pub use registry::HandlerRegistry;

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::SolrClient;
use crate::error::{DecodeError, SolrResult};
use crate::params::{ParamMap, ParamValue};
use crate::response::{DecodeResponse, ResponseFormat};

/// HTTP verb used to reach a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Options,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-request transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Overrides the client's request timeout for this call.
    pub timeout: Option<Duration>,
}

/// A fully resolved request, ready for the client to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: ParamMap,
    /// Form-encoded body.
    pub body: Option<ParamMap>,
    pub headers: HeaderMap,
    pub options: RequestOptions,
}

impl PreparedRequest {
    pub fn query_string(&self) -> String {
        self.query.to_query_string()
    }
}

/// Camel-case a handler path: `/update/json` → `updateJson`.
///
/// The path is split on every non-alphanumeric character, each piece gets an
/// upper-case first letter, and the joined result a lower-case first letter.
pub fn build_name_from_path(path: &str) -> String {
    let joined: String = path
        .split(|c: char| !c.is_ascii_alphanumeric())
        .map(|piece| {
            let mut chars = piece.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// A Solr request handler endpoint with its own default parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHandler {
    path: String,
    name: String,
    method: HttpMethod,
    default_params: ParamMap,
}

impl RequestHandler {
    /// A GET handler at `path`, named after the path. A missing leading
    /// `/` is added so the path always joins cleanly onto the base URL.
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Self {
            name: build_name_from_path(&path),
            path,
            method: HttpMethod::Get,
            default_params: ParamMap::new(),
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Register under an explicit name instead of the derived one.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_default_params(mut self, params: ParamMap) -> Self {
        self.default_params = params;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn set_method(&mut self, method: HttpMethod) -> &mut Self {
        self.method = method;
        self
    }

    /// This handler's own default layer.
    pub fn default_params(&self) -> &ParamMap {
        &self.default_params
    }

    pub fn set_default_params(&mut self, params: ParamMap) -> &mut Self {
        self.default_params = params;
        self
    }

    pub fn set_default_param(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.default_params.insert(key, value);
        self
    }

    pub fn remove_default_param(&mut self, key: &str) -> &mut Self {
        self.default_params.remove(key);
        self
    }

    /// Merge with precedence: call-time params, then this handler's
    /// defaults, then the client's defaults.
    pub fn merge_default_params(&self, client_defaults: &ParamMap, params: &ParamMap) -> ParamMap {
        ParamMap::merge_layers(client_defaults, &self.default_params, params)
    }

    /// Resolve method, query and body for the given parameters.
    ///
    /// A GET whose query string the client considers too long is sent as a
    /// POST with the parameters in the body.
    pub fn build_request(
        &self,
        client: &SolrClient,
        params: &ParamMap,
        headers: HeaderMap,
        options: RequestOptions,
    ) -> PreparedRequest {
        let mut method = self.method;

        if method == HttpMethod::Get && client.use_post_method(&self.path, params) {
            tracing::debug!(
                handler = %self.name,
                path = %self.path,
                "Query string too long, switching GET to POST"
            );
            method = HttpMethod::Post;
        }

        let (query, body) = match method {
            HttpMethod::Get | HttpMethod::Head => (params.clone(), None),
            HttpMethod::Options => (ParamMap::new(), None),
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => {
                let body = if params.is_empty() { None } else { Some(params.clone()) };
                (ParamMap::new(), body)
            }
        };

        PreparedRequest {
            method,
            path: self.path.clone(),
            query,
            body,
            headers,
            options,
        }
    }

    /// Decode the body according to the `wt` parameter.
    pub fn parse_response<R: DecodeResponse>(&self, response: &R, params: &ParamMap) -> Result<Value, DecodeError> {
        match ResponseFormat::from_params(params) {
            ResponseFormat::Json => response.json(),
            ResponseFormat::Xml => response.xml(),
        }
    }

    /// Merge, send and decode.
    pub async fn send(
        &self,
        client: &SolrClient,
        params: impl Into<ParamMap>,
        headers: HeaderMap,
        options: RequestOptions,
    ) -> SolrResult<Value> {
        let params = self.merge_default_params(&client.default_params(), &params.into());
        let request = self.build_request(client, &params, headers, options);
        let response = client.execute(&self.name, request).await?;
        Ok(self.parse_response(&response, &params)?)
    }
}
