//! Handler registry for resolving shortcode names to handlers

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::Handler;
use crate::processor::ProcessedShortcode;

/// Errors that can occur while registering handlers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// Alias target is neither a handler nor an alias
    #[error("handler not found: {name}")]
    NotFound { name: String },

    /// Name already taken by a handler or an alias
    #[error("duplicate handler or alias: {name}")]
    Duplicate { name: String },
}

/// Name to handler mapping with aliases and an optional default
///
/// Aliases are resolved to their canonical handler name at registration, so
/// an alias of an alias points straight at the handler.
#[derive(Default, Clone)]
pub struct HandlerContainer {
    handlers: HashMap<String, Arc<dyn Handler>>,
    aliases: HashMap<String, String>,
    default: Option<Arc<dyn Handler>>,
}

impl HandlerContainer {
    /// Create a new empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure under `name`
    pub fn add<F>(&mut self, name: impl Into<String>, handler: F) -> Result<(), HandlerError>
    where
        F: Fn(&ProcessedShortcode, Option<&ProcessedShortcode>) -> Option<String>
            + Send
            + Sync
            + 'static,
    {
        self.add_handler(name, handler)
    }

    /// Register any [`Handler`] under `name`
    pub fn add_handler(
        &mut self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), HandlerError> {
        let name = name.into();
        self.ensure_free(&name)?;
        self.handlers.insert(name, Arc::new(handler));
        Ok(())
    }

    /// Make `alias` resolve to the handler registered as `target`
    pub fn add_alias(
        &mut self,
        alias: impl Into<String>,
        target: &str,
    ) -> Result<(), HandlerError> {
        let alias = alias.into();
        self.ensure_free(&alias)?;

        let canonical = if self.handlers.contains_key(target) {
            target.to_string()
        } else {
            self.aliases
                .get(target)
                .cloned()
                .ok_or_else(|| HandlerError::NotFound {
                    name: target.to_string(),
                })?
        };
        self.aliases.insert(alias, canonical);
        Ok(())
    }

    /// Set the closure used for names without a handler or alias
    pub fn set_default<F>(&mut self, handler: F)
    where
        F: Fn(&ProcessedShortcode, Option<&ProcessedShortcode>) -> Option<String>
            + Send
            + Sync
            + 'static,
    {
        self.set_default_handler(handler);
    }

    /// Set the [`Handler`] used for names without a handler or alias
    pub fn set_default_handler(&mut self, handler: impl Handler + 'static) {
        self.default = Some(Arc::new(handler));
    }

    /// Handler registered under exactly `name`
    pub fn resolve(&self, name: &str) -> Option<&dyn Handler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// Canonical handler name behind an alias
    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(|s| s.as_str())
    }

    pub fn resolve_default(&self) -> Option<&dyn Handler> {
        self.default.as_deref()
    }

    /// Handler for `name`: exact match, then alias, then the default
    pub fn get(&self, name: &str) -> Option<&dyn Handler> {
        self.resolve(name)
            .or_else(|| self.resolve_alias(name).and_then(|c| self.resolve(c)))
            .or_else(|| self.resolve_default())
    }

    /// Check if a handler or alias exists for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Get all handler and alias names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers
            .keys()
            .chain(self.aliases.keys())
            .map(|s| s.as_str())
    }

    fn ensure_free(&self, name: &str) -> Result<(), HandlerError> {
        if self.contains(name) {
            return Err(HandlerError::Duplicate {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for HandlerContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<_> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("HandlerContainer")
            .field("handlers", &handlers)
            .field("aliases", &self.aliases)
            .field("default", &self.default.is_some())
            .finish()
    }
}
