//! Parameters for the `select` request handler.
//!
//! Parameter names follow Solr's common query parameters verbatim:
//! `q`, `sort`, `start`, `rows`, `pageDoc`, `pageScore`, `fq`, `fl`,
//! `defType`, `timeAllowed`, `omitHeader`.

use crate::params::ParamMap;
use crate::request::SolrRequest;

/// Builder for a `select` query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    params: ParamMap,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main query string (`q`).
    pub fn query(self, query: impl Into<String>) -> Self {
        self.param("q", query.into())
    }

    /// Sort specification, e.g. `score desc, id asc`.
    pub fn sort(self, sort: impl Into<String>) -> Self {
        self.param("sort", sort.into())
    }

    /// Offset of the first returned document.
    pub fn start(self, start: u64) -> Self {
        self.param("start", start)
    }

    pub fn rows(self, rows: u64) -> Self {
        self.param("rows", rows)
    }

    pub fn page_doc(self, page_doc: u64) -> Self {
        self.param("pageDoc", page_doc)
    }

    pub fn page_score(self, page_score: f64) -> Self {
        self.param("pageScore", page_score)
    }

    /// Replace the filter query (`fq`).
    pub fn filter_query(self, filter_query: impl Into<String>) -> Self {
        self.param("fq", filter_query.into())
    }

    /// Add another filter query, keeping any already set.
    pub fn add_filter_query(mut self, filter_query: impl Into<String>) -> Self {
        self.params.append("fq", filter_query.into());
        self
    }

    /// Field list (`fl`).
    pub fn field_list(self, fl: impl Into<String>) -> Self {
        self.param("fl", fl.into())
    }

    /// Query parser (`defType`), e.g. `edismax`.
    pub fn def_type(self, def_type: impl Into<String>) -> Self {
        self.param("defType", def_type.into())
    }

    /// Search time budget in milliseconds.
    pub fn time_allowed(self, millis: u64) -> Self {
        self.param("timeAllowed", millis)
    }

    pub fn omit_header(self, omit: bool) -> Self {
        self.param("omitHeader", if omit { "true" } else { "false" })
    }
}

impl SolrRequest for Select {
    fn params(&self) -> &ParamMap {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ParamMap {
        &mut self.params
    }

    fn into_params(self) -> ParamMap {
        self.params
    }
}

impl From<Select> for ParamMap {
    fn from(select: Select) -> Self {
        select.params
    }
}
