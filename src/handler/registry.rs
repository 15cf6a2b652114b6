//! Handler registry keyed by handler name.
//!
//! Handlers are looked up by the name derived from their path
//! (`/update/json` → `updateJson`), so callers can write
//! `client.send("updateJson", params)`.
//!
//! Handlers declared in configuration are tracked separately from handlers
//! registered in code, so a reload can retract exactly what the previous
//! configuration added.

use dashmap::{DashMap, DashSet};

use crate::config::HandlerConfig;
use crate::handler::{HttpMethod, RequestHandler};

/// Concurrent map of handler name → handler.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, RequestHandler>,
    configured: DashSet<String>,
}

/// The stock Solr handlers every client starts with.
fn builtin_handlers() -> Vec<RequestHandler> {
    vec![
        RequestHandler::new("/select"),
        RequestHandler::new("/admin/ping"),
        RequestHandler::new("/update").with_method(HttpMethod::Post),
        RequestHandler::new("/update/json").with_method(HttpMethod::Post),
    ]
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the stock Solr handlers.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        for handler in builtin_handlers() {
            registry.insert(handler);
        }
        registry
    }

    fn insert(&self, handler: RequestHandler) {
        tracing::debug!(name = %handler.name(), path = %handler.path(), "Registering request handler");
        self.handlers.insert(handler.name().to_string(), handler);
    }

    /// Add or replace a handler under its name. Handlers registered here
    /// survive configuration reloads.
    pub fn register(&self, handler: RequestHandler) {
        self.configured.remove(handler.name());
        self.insert(handler);
    }

    /// Make `configs` the full set of configuration-declared handlers.
    ///
    /// Names declared by the previous call but absent from `configs` are
    /// removed, or restored to the stock handler when they shadowed one.
    pub fn replace_configured(&self, configs: &[HandlerConfig]) {
        let incoming: Vec<RequestHandler> = configs.iter().map(HandlerConfig::to_handler).collect();

        let stale: Vec<String> = self
            .configured
            .iter()
            .map(|name| name.key().clone())
            .filter(|name| !incoming.iter().any(|h| h.name() == name))
            .collect();
        for name in stale {
            self.configured.remove(&name);
            match builtin_handlers().into_iter().find(|h| h.name() == name) {
                Some(builtin) => self.insert(builtin),
                None => {
                    self.handlers.remove(&name);
                    tracing::debug!(name = %name, "Removed request handler dropped from configuration");
                }
            }
        }

        for handler in incoming {
            self.configured.insert(handler.name().to_string());
            self.insert(handler);
        }
    }

    /// Snapshot of a handler.
    pub fn get(&self, name: &str) -> Option<RequestHandler> {
        self.handlers.get(name).map(|r| r.value().clone())
    }

    /// Mutate a handler in place. Returns false if it is not registered.
    pub fn update<F>(&self, name: &str, f: F) -> bool
    where
        F: FnOnce(&mut RequestHandler),
    {
        match self.handlers.get_mut(name) {
            Some(mut entry) => {
                f(entry.value_mut());
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, name: &str) -> Option<RequestHandler> {
        self.configured.remove(name);
        self.handlers.remove(name).map(|(_, h)| h)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_builtin_handlers() {
        let registry = HandlerRegistry::with_builtin();
        assert_eq!(registry.names(), vec!["adminPing", "select", "update", "updateJson"]);
        assert_eq!(registry.get("updateJson").unwrap().method(), HttpMethod::Post);
        assert_eq!(registry.get("select").unwrap().path(), "/select");
        assert!(registry.get("suggest").is_none());
    }

    #[test]
    fn test_update_and_snapshot_isolation() {
        let registry = HandlerRegistry::with_builtin();
        let snapshot = registry.get("select").unwrap();

        assert!(registry.update("select", |h| {
            h.set_default_param("rows", 50i64);
        }));
        assert!(!registry.update("missing", |_| {}));

        assert!(snapshot.default_params().is_empty());
        assert_eq!(
            registry.get("select").unwrap().default_params().get("rows"),
            Some(&ParamValue::Int(50))
        );
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = HandlerRegistry::with_builtin();
        registry.register(RequestHandler::new("/select").with_method(HttpMethod::Post));
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("select").unwrap().method(), HttpMethod::Post);

        assert!(registry.remove("select").is_some());
        assert!(registry.remove("select").is_none());
    }

    fn handler_config(path: &str, method: HttpMethod) -> HandlerConfig {
        HandlerConfig {
            path: path.to_string(),
            name: None,
            method,
            default_params: Default::default(),
        }
    }

    #[test]
    fn test_replace_configured_retracts_previous_set() {
        let registry = HandlerRegistry::with_builtin();
        registry.replace_configured(&[
            handler_config("/select", HttpMethod::Post),
            handler_config("/suggest", HttpMethod::Get),
            handler_config("/spell", HttpMethod::Get),
        ]);
        assert_eq!(registry.get("select").unwrap().method(), HttpMethod::Post);
        assert!(registry.get("suggest").is_some());

        registry.replace_configured(&[handler_config("/spell", HttpMethod::Post)]);
        assert_eq!(registry.get("select").unwrap().method(), HttpMethod::Get);
        assert!(registry.get("suggest").is_none());
        assert_eq!(registry.get("spell").unwrap().method(), HttpMethod::Post);

        registry.replace_configured(&[]);
        assert_eq!(registry.names(), vec!["adminPing", "select", "update", "updateJson"]);
    }

    #[test]
    fn test_registered_in_code_survives_reload() {
        let registry = HandlerRegistry::with_builtin();
        registry.replace_configured(&[handler_config("/terms", HttpMethod::Get)]);

        // Taking over a configured name detaches it from configuration
        registry.register(RequestHandler::new("/terms").with_method(HttpMethod::Post));
        registry.register(RequestHandler::new("/mlt"));

        registry.replace_configured(&[]);
        assert_eq!(registry.get("terms").unwrap().method(), HttpMethod::Post);
        assert!(registry.get("mlt").is_some());
    }
}
