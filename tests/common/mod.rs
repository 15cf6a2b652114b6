//! Shared utilities for integration testing.

use solr_client::{SolrClient, SolrConfig};
use wiremock::MockServer;

pub const CORE_PATH: &str = "/solr/books";

/// Start a mock Solr server.
pub async fn start_mock_solr() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server's core.
pub fn client_for(server: &MockServer) -> SolrClient {
    client_with(server, |_| {})
}

/// Client pointed at the mock server, with config tweaks applied.
pub fn client_with<F>(server: &MockServer, f: F) -> SolrClient
where
    F: FnOnce(&mut SolrConfig),
{
    let mut config = SolrConfig {
        base_url: format!("{}{}", server.uri(), CORE_PATH),
        ..SolrConfig::default()
    };
    f(&mut config);
    SolrClient::new(config).expect("valid test config")
}

#[allow(dead_code)]
pub const SELECT_JSON: &str = r#"{
  "responseHeader": {"status": 0, "QTime": 1},
  "response": {"numFound": 1, "start": 0, "docs": [{"id": "978-0", "title": "Rust in Action"}]}
}"#;

#[allow(dead_code)]
pub const SELECT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
<lst name="responseHeader"><int name="status">0</int><int name="QTime">1</int></lst>
<result name="response" numFound="1" start="0">
  <doc><str name="id">978-0</str><str name="title">Rust in Action</str></doc>
</result>
</response>"#;
