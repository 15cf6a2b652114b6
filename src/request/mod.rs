//! Request parameter builders.
//!
//! # Data Flow
//! ```text
//! caller sets parameters on a builder (e.g. Select)
//!     → into_params() yields a ParamMap
//!     → handler merges it over client and handler defaults
//!     → handler sends it as query string or form body
//! ```
//!
//! # Design Decisions
//! - Builders are plain parameter containers; no value or cross-field checks
//! - Setters consume and return the builder for chaining

pub mod select;

pub use select::Select;

use crate::params::{ParamMap, ParamValue};
use crate::response::ResponseFormat;

/// A Solr request: a parameter container with chainable setters.
pub trait SolrRequest: Sized {
    fn params(&self) -> &ParamMap;

    fn params_mut(&mut self) -> &mut ParamMap;

    fn into_params(self) -> ParamMap;

    /// Set an arbitrary parameter.
    fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params_mut().insert(key, value);
        self
    }

    /// Drop a parameter if present.
    fn without(mut self, key: &str) -> Self {
        self.params_mut().remove(key);
        self
    }

    fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params().get(key)
    }

    /// Select the response writer (`wt`).
    fn response_format(self, format: ResponseFormat) -> Self {
        self.param("wt", format.as_str())
    }
}
