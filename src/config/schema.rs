//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::handler::{HttpMethod, RequestHandler};
use crate::params::ParamMap;

/// Root configuration for a Solr client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SolrConfig {
    /// Core or collection URL, e.g. "http://localhost:8983/solr/books".
    pub base_url: String,

    /// Parameters sent with every request unless overridden.
    pub default_params: ParamMap,

    /// Longest `path?query` sent as GET before falling back to POST.
    pub max_query_length: usize,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Additional or overriding request handlers.
    pub handlers: Vec<HandlerConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8983/solr".to_string(),
            default_params: ParamMap::new(),
            max_query_length: 1024,
            timeouts: TimeoutConfig::default(),
            handlers: Vec::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Request handler declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Handler path relative to the base URL (e.g., "/suggest").
    pub path: String,

    /// Registry name; derived from the path when absent.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub method: HttpMethod,

    #[serde(default)]
    pub default_params: ParamMap,
}

impl HandlerConfig {
    pub fn to_handler(&self) -> RequestHandler {
        let handler = RequestHandler::new(self.path.clone())
            .with_method(self.method)
            .with_default_params(self.default_params.clone());
        match &self.name {
            Some(name) => handler.with_name(name.clone()),
            None => handler,
        }
    }
}

/// Timeout configuration for HTTP requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_default_config() {
        let config = SolrConfig::default();
        assert_eq!(config.base_url, "http://localhost:8983/solr");
        assert_eq!(config.max_query_length, 1024);
        assert_eq!(config.timeouts.connect_secs, 5);
        assert!(config.default_params.is_empty());
        assert!(config.handlers.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config: SolrConfig = toml::from_str(
            r#"
            base_url = "http://solr.internal:8983/solr/books"
            max_query_length = 2048

            [default_params]
            wt = "json"

            [timeouts]
            request_secs = 10

            [[handlers]]
            path = "/suggest"
            method = "POST"

            [handlers.default_params]
            "suggest.count" = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://solr.internal:8983/solr/books");
        assert_eq!(config.max_query_length, 2048);
        assert_eq!(config.default_params.get("wt"), Some(&ParamValue::from("json")));
        assert_eq!(config.timeouts.request_secs, 10);
        assert_eq!(config.timeouts.connect_secs, 5);

        let handler = config.handlers[0].to_handler();
        assert_eq!(handler.name(), "suggest");
        assert_eq!(handler.method(), HttpMethod::Post);
        assert_eq!(handler.default_params().get("suggest.count"), Some(&ParamValue::Int(5)));
    }
}
