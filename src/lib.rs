//! Thin client for the Apache Solr HTTP query API.
//!
//! # Architecture Overview
//!
//! ```text
//!   Select / ParamMap                         SolrConfig (TOML)
//!         │                                         │
//!         ▼                                         ▼
//!   ┌──────────────┐  merge defaults   ┌──────────────────────┐
//!   │RequestHandler│◀─────────────────▶│      SolrClient      │
//!   │  (registry)  │  GET→POST policy  │ settings + reqwest   │
//!   └──────┬───────┘                   └──────────┬───────────┘
//!          │ PreparedRequest                      │ HTTP
//!          └─────────────────────────────────────▶│────────▶ Solr
//!                                                 │
//!   serde_json::Value ◀── parse_response ◀── SolrResponse (json | xml)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use solr_client::{ResponseFormat, Select, SolrClient, SolrRequest};
//!
//! # async fn run() -> solr_client::SolrResult<()> {
//! let client = SolrClient::from_url("http://localhost:8983/solr/books")?;
//! let results = client
//!     .select(
//!         Select::new()
//!             .query("title:rust")
//!             .rows(10)
//!             .response_format(ResponseFormat::Json),
//!     )
//!     .await?;
//! println!("{}", results["response"]["numFound"]);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod observability;
pub mod params;
pub mod request;
pub mod response;
pub mod xml;

pub use client::{ClientSettings, SolrClient};
pub use config::SolrConfig;
pub use error::{DecodeError, SolrError, SolrResult, TransportError};
pub use handler::{HttpMethod, PreparedRequest, RequestHandler, RequestOptions};
pub use params::{ParamMap, ParamValue};
pub use request::{Select, SolrRequest};
pub use response::{DecodeResponse, ResponseFormat, SolrResponse};
