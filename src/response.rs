//! Solr HTTP responses and body decoding.

use serde_json::Value;

use crate::error::DecodeError;
use crate::params::ParamMap;
use crate::xml;

/// Response format requested through the `wt` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    Json,
    #[default]
    Xml,
}

impl ResponseFormat {
    /// `wt=json` selects JSON; any other or missing value selects XML.
    pub fn from_params(params: &ParamMap) -> Self {
        match params.get("wt").and_then(|v| v.as_str()) {
            Some("json") => ResponseFormat::Json,
            _ => ResponseFormat::Xml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

/// Something whose body can be decoded as JSON or XML.
pub trait DecodeResponse {
    fn json(&self) -> Result<Value, DecodeError>;
    fn xml(&self) -> Result<Value, DecodeError>;
}

/// A successful (2xx) response from Solr.
#[derive(Debug, Clone)]
pub struct SolrResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

impl SolrResponse {
    pub fn new(status: u16, content_type: Option<String>, body: String) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl DecodeResponse for SolrResponse {
    fn json(&self) -> Result<Value, DecodeError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    fn xml(&self) -> Result<Value, DecodeError> {
        xml::decode(&self.body)
    }
}
