//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, query length limit > 0)
//! - Detect handler name collisions
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SolrConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::SolrConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base_url '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("max_query_length must be greater than 0")]
    ZeroQueryLength,

    #[error("timeout '{0}' must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("handler path '{0}' must start with '/'")]
    InvalidHandlerPath(String),

    #[error("duplicate handler name '{0}'")]
    DuplicateHandler(String),
}

pub fn validate_config(config: &SolrConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.base_url.clone())),
    }

    if config.max_query_length == 0 {
        errors.push(ValidationError::ZeroQueryLength);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    let mut seen = HashSet::new();
    for handler in &config.handlers {
        if !handler.path.starts_with('/') || handler.path.len() < 2 {
            errors.push(ValidationError::InvalidHandlerPath(handler.path.clone()));
            continue;
        }
        let name = handler.to_handler().name().to_string();
        if !seen.insert(name.clone()) {
            errors.push(ValidationError::DuplicateHandler(name));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandlerConfig;
    use crate::handler::HttpMethod;
    use crate::params::ParamMap;

    fn handler(path: &str, name: Option<&str>) -> HandlerConfig {
        HandlerConfig {
            path: path.to_string(),
            name: name.map(str::to_string),
            method: HttpMethod::Get,
            default_params: ParamMap::new(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SolrConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SolrConfig {
            base_url: "not a url".into(),
            max_query_length: 0,
            ..SolrConfig::default()
        };
        config.timeouts.request_secs = 0;
        config.handlers = vec![
            handler("suggest", None),
            handler("/terms", None),
            handler("/other", Some("terms")),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBaseUrl("not a url".into()),
                ValidationError::ZeroQueryLength,
                ValidationError::ZeroTimeout("request_secs"),
                ValidationError::InvalidHandlerPath("suggest".into()),
                ValidationError::DuplicateHandler("terms".into()),
            ]
        );
    }
}
