//! Solr HTTP client.
//!
//! # Responsibilities
//! - Hold the HTTP connection pool, base URL and client-wide settings
//! - Decide when a GET is too long and must be sent as POST
//! - Execute prepared requests and surface HTTP failures
//! - Resolve request handlers by name
//!
//! # Design Decisions
//! - Client settings (default params, query length limit) live behind an
//!   `ArcSwap`: readers take a snapshot per request, reloads swap atomically
//! - Non-2xx responses are errors carrying the status and body
//! - No retries; every failure is returned to the caller unchanged

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{validate_config, ConfigError, SolrConfig};
use crate::error::{SolrError, SolrResult, TransportError};
use crate::handler::{HandlerRegistry, PreparedRequest, RequestHandler, RequestOptions};
use crate::observability::metrics;
use crate::params::ParamMap;
use crate::request::{Select, SolrRequest};
use crate::response::SolrResponse;

/// Settings read on every request and replaceable at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub default_params: ParamMap,
    pub max_query_length: usize,
}

/// Client for a single Solr core or collection.
pub struct SolrClient {
    http: reqwest::Client,
    base_url: String,
    settings: ArcSwap<ClientSettings>,
    handlers: HandlerRegistry,
}

impl SolrClient {
    /// Build a client from a validated configuration.
    pub fn new(config: SolrConfig) -> SolrResult<Self> {
        validate_config(&config).map_err(|errors| SolrError::Config(ConfigError::Validation(errors)))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()
            .map_err(TransportError::Http)?;

        let handlers = HandlerRegistry::with_builtin();
        handlers.replace_configured(&config.handlers);

        tracing::info!(
            base_url = %config.base_url,
            max_query_length = config.max_query_length,
            handlers = handlers.len(),
            "Solr client initialized"
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            settings: ArcSwap::from_pointee(ClientSettings {
                default_params: config.default_params,
                max_query_length: config.max_query_length,
            }),
            handlers,
        })
    }

    /// Client for `base_url` with every other setting at its default.
    pub fn from_url(base_url: impl Into<String>) -> SolrResult<Self> {
        Self::new(SolrConfig {
            base_url: base_url.into(),
            ..SolrConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<ClientSettings> {
        self.settings.load_full()
    }

    /// Client-wide default parameters as of now.
    pub fn default_params(&self) -> ParamMap {
        self.settings.load().default_params.clone()
    }

    pub fn set_default_params(&self, params: ParamMap) {
        self.settings.rcu(|current| ClientSettings {
            default_params: params.clone(),
            max_query_length: current.max_query_length,
        });
    }

    pub fn set_default_param(&self, key: &str, value: impl Into<crate::params::ParamValue>) {
        let value = value.into();
        self.settings.rcu(|current| {
            let mut next = ClientSettings::clone(current);
            next.default_params.insert(key, value.clone());
            next
        });
    }

    pub fn remove_default_param(&self, key: &str) {
        self.settings.rcu(|current| {
            let mut next = ClientSettings::clone(current);
            next.default_params.remove(key);
            next
        });
    }

    pub fn max_query_length(&self) -> usize {
        self.settings.load().max_query_length
    }

    /// Whether `path?query` for these params is too long to send as GET.
    pub fn use_post_method(&self, path: &str, params: &ParamMap) -> bool {
        let length = path.len() + 1 + params.to_query_string().len();
        length > self.max_query_length()
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Snapshot of a registered handler.
    pub fn handler(&self, name: &str) -> SolrResult<RequestHandler> {
        self.handlers
            .get(name)
            .ok_or_else(|| SolrError::UnknownHandler(name.to_string()))
    }

    pub fn register_handler(&self, handler: RequestHandler) {
        self.handlers.register(handler);
    }

    /// Mutate a registered handler. Requests already in flight keep the
    /// handler as it was when they started.
    pub fn update_handler<F>(&self, name: &str, f: F) -> SolrResult<()>
    where
        F: FnOnce(&mut RequestHandler),
    {
        if self.handlers.update(name, f) {
            Ok(())
        } else {
            Err(SolrError::UnknownHandler(name.to_string()))
        }
    }

    /// Send a request through the named handler.
    pub async fn send(&self, handler: &str, params: impl Into<ParamMap>) -> SolrResult<Value> {
        self.send_with(handler, params, HeaderMap::new(), RequestOptions::default())
            .await
    }

    pub async fn send_with(
        &self,
        handler: &str,
        params: impl Into<ParamMap>,
        headers: HeaderMap,
        options: RequestOptions,
    ) -> SolrResult<Value> {
        let handler = self.handler(handler)?;
        handler.send(self, params, headers, options).await
    }

    /// Run a query against the `select` handler.
    pub async fn select(&self, request: Select) -> SolrResult<Value> {
        self.send("select", request.into_params()).await
    }

    /// Hit `/admin/ping`.
    pub async fn ping(&self) -> SolrResult<Value> {
        self.send("adminPing", ParamMap::new()).await
    }

    /// Perform the HTTP exchange for a prepared request.
    pub async fn execute(&self, handler: &str, request: PreparedRequest) -> Result<SolrResponse, TransportError> {
        let url_str = format!("{}{}", self.base_url, request.path);
        let url = url::Url::parse(&url_str).map_err(|source| TransportError::InvalidUrl {
            url: url_str.clone(),
            source,
        })?;

        let method = request.method;
        tracing::debug!(
            handler = %handler,
            method = %method,
            url = %url,
            query_params = request.query.len(),
            body_params = request.body.as_ref().map_or(0, |b| b.len()),
            "Sending Solr request"
        );

        let mut builder = self.http.request(method.to_reqwest(), url).headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query.to_pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.form(&body.to_pairs());
        }
        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_request(method.as_str(), None, start);
                tracing::warn!(handler = %handler, method = %method, error = %e, "Solr request failed");
                return Err(TransportError::Http(e));
            }
        };

        let status = response.status();
        metrics::record_request(method.as_str(), Some(status.as_u16()), start);

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                handler = %handler,
                method = %method,
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Solr returned error status"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            handler = %handler,
            method = %method,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Solr request completed"
        );

        Ok(SolrResponse::new(status.as_u16(), content_type, body))
    }

    /// Apply the reloadable parts of a new configuration: default params,
    /// query length limit and declared handlers.
    ///
    /// Handlers declared by the previous configuration but not by this one
    /// are withdrawn. An invalid configuration is rejected and nothing changes.
    pub fn apply_config(&self, config: &SolrConfig) -> SolrResult<()> {
        validate_config(config).map_err(|errors| SolrError::Config(ConfigError::Validation(errors)))?;

        if config.base_url.trim_end_matches('/') != self.base_url {
            tracing::warn!(
                current = %self.base_url,
                requested = %config.base_url,
                "base_url changes require a new client; ignoring"
            );
        }

        self.settings.store(Arc::new(ClientSettings {
            default_params: config.default_params.clone(),
            max_query_length: config.max_query_length,
        }));
        self.handlers.replace_configured(&config.handlers);

        tracing::info!(
            max_query_length = config.max_query_length,
            default_params = config.default_params.len(),
            handlers = config.handlers.len(),
            "Client configuration reloaded"
        );
        Ok(())
    }

    /// Apply every configuration received on `updates` (typically from a
    /// [`ConfigWatcher`](crate::config::ConfigWatcher)) until the sender is dropped.
    pub fn follow_config_updates(self: Arc<Self>, mut updates: mpsc::UnboundedReceiver<SolrConfig>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(config) = updates.recv().await {
                if let Err(e) = self.apply_config(&config) {
                    tracing::warn!(error = %e, "Rejected configuration update, keeping current settings");
                }
            }
            tracing::debug!("Config update channel closed");
        })
    }
}

impl std::fmt::Debug for SolrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolrClient")
            .field("base_url", &self.base_url)
            .field("settings", &self.settings())
            .field("handlers", &self.handlers.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandlerConfig;
    use crate::handler::HttpMethod;
    use crate::params::ParamValue;

    #[test]
    fn test_use_post_method_threshold() {
        let client = SolrClient::new(SolrConfig {
            max_query_length: 16,
            ..SolrConfig::default()
        })
        .unwrap();

        // "/select?q=abcd" is 14 bytes
        let short: ParamMap = [("q", "abcd")].into_iter().collect();
        assert!(!client.use_post_method("/select", &short));

        // "/select?q=abcdef" is exactly 16 bytes
        let exact: ParamMap = [("q", "abcdef")].into_iter().collect();
        assert!(!client.use_post_method("/select", &exact));

        let long: ParamMap = [("q", "abcdefg")].into_iter().collect();
        assert!(client.use_post_method("/select", &long));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = SolrClient::from_url("localhost:8983").unwrap_err();
        assert!(matches!(err, SolrError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_default_param_layer() {
        let client = SolrClient::from_url("http://localhost:8983/solr/core1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8983/solr/core1");

        client.set_default_param("wt", "json");
        client.set_default_param("indent", true);
        let snapshot = client.default_params();

        client.remove_default_param("indent");
        client.remove_default_param("never-set");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(client.default_params().len(), 1);
        assert_eq!(client.default_params().get("wt"), Some(&ParamValue::from("json")));
    }

    #[test]
    fn test_apply_config() {
        let client = SolrClient::from_url("http://localhost:8983/solr/core1").unwrap();
        assert!(client.handler("suggest").is_err());

        let mut config = SolrConfig {
            base_url: "http://localhost:8983/solr/core1".into(),
            max_query_length: 4096,
            ..SolrConfig::default()
        };
        config.default_params.insert("wt", "json");
        config.handlers.push(HandlerConfig {
            path: "/suggest".into(),
            name: None,
            method: HttpMethod::Post,
            default_params: ParamMap::new(),
        });

        client.apply_config(&config).unwrap();

        assert_eq!(client.max_query_length(), 4096);
        assert_eq!(client.default_params().get("wt"), Some(&ParamValue::from("json")));
        assert_eq!(client.handler("suggest").unwrap().method(), HttpMethod::Post);
    }

    #[test]
    fn test_reload_withdraws_dropped_handlers() {
        let mut config = SolrConfig::default();
        config.handlers.push(HandlerConfig {
            path: "/select".into(),
            name: None,
            method: HttpMethod::Post,
            default_params: ParamMap::new(),
        });
        config.handlers.push(HandlerConfig {
            path: "/suggest".into(),
            name: None,
            method: HttpMethod::Get,
            default_params: ParamMap::new(),
        });
        let client = SolrClient::new(config).unwrap();
        assert_eq!(client.handler("select").unwrap().method(), HttpMethod::Post);

        client.apply_config(&SolrConfig::default()).unwrap();

        assert_eq!(client.handler("select").unwrap().method(), HttpMethod::Get);
        assert!(matches!(client.handler("suggest"), Err(SolrError::UnknownHandler(_))));
    }

    #[test]
    fn test_apply_invalid_config_keeps_settings() {
        let client = SolrClient::from_url("http://localhost:8983/solr/core1").unwrap();
        client.set_default_param("wt", "json");
        let before = client.settings();

        let mut config = SolrConfig {
            max_query_length: 0,
            ..SolrConfig::default()
        };
        config.default_params.insert("rows", 1i64);
        config.handlers.push(HandlerConfig {
            path: "/suggest".into(),
            name: None,
            method: HttpMethod::Get,
            default_params: ParamMap::new(),
        });

        let err = client.apply_config(&config).unwrap_err();
        assert!(matches!(err, SolrError::Config(ConfigError::Validation(ref e)) if e.len() == 1));
        assert_eq!(*client.settings(), *before);
        assert!(client.handler("suggest").is_err());
    }

    #[test]
    fn test_update_handler() {
        let client = SolrClient::from_url("http://localhost:8983/solr").unwrap();
        client
            .update_handler("select", |h| {
                h.set_default_param("df", "title");
            })
            .unwrap();
        assert!(client.handler("select").unwrap().default_params().contains_key("df"));
        assert!(matches!(
            client.update_handler("nope", |_| {}),
            Err(SolrError::UnknownHandler(_))
        ));
    }

    #[tokio::test]
    async fn test_follow_config_updates() {
        let client = Arc::new(SolrClient::from_url("http://localhost:8983/solr").unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let task = client.clone().follow_config_updates(rx);

        tx.send(SolrConfig {
            max_query_length: 0,
            ..SolrConfig::default()
        })
        .unwrap();
        tx.send(SolrConfig {
            max_query_length: 99,
            ..SolrConfig::default()
        })
        .unwrap();
        drop(tx);
        task.await.unwrap();

        assert_eq!(client.max_query_length(), 99);
    }
}
