//! TOML configuration for processors built from templates
//!
//! A config file bundles a syntax, engine limits and template handlers so a
//! processor can be set up without writing Rust closures:
//!
//! ```toml
//! default = "<!-- %name% -->"
//!
//! [syntax]
//! opening_tag = "{{"
//! closing_tag = "}}"
//!
//! [processor]
//! recursion_depth = 2
//! max_iterations = "unbounded"
//!
//! [handlers]
//! b = "<b>%content%</b>"
//! link = "<a href=\"%href%\">%content%</a>"
//!
//! [aliases]
//! strong = "b"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::error::ProcessorError;
use crate::handler::{HandlerContainer, HandlerError, TemplateHandler};
use crate::parser::RegularParser;
use crate::processor::{Processor, ProcessorConfig};
use crate::syntax::Syntax;

/// Errors that can occur when loading a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("syntax literal {literal} must not be empty")]
    EmptyLiteral { literal: &'static str },
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Processor setup loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Template for names without a handler
    pub default: Option<String>,
    pub syntax: Syntax,
    pub processor: ProcessorConfig,
    /// Handler name -> template
    pub handlers: BTreeMap<String, String>,
    /// Alias -> handler or alias name
    pub aliases: BTreeMap<String, String>,
}

impl Config {
    /// Load and validate a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        if let Some(literal) = config.syntax.empty_literals().into_iter().next() {
            return Err(ConfigError::EmptyLiteral { literal });
        }
        config.processor.validate()?;
        Ok(config)
    }

    /// Register every template and alias in a fresh container
    pub fn handlers(&self) -> Result<HandlerContainer, ConfigError> {
        let mut handlers = HandlerContainer::new();
        for (name, template) in &self.handlers {
            handlers.add_handler(name.as_str(), TemplateHandler::new(template.as_str()))?;
        }
        if let Some(template) = &self.default {
            handlers.set_default_handler(TemplateHandler::new(template.as_str()));
        }

        // Aliases may point at other aliases, so register them once their
        // target is known.
        let mut pending: Vec<(&String, &String)> = self.aliases.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut blocked = Vec::new();
            for (alias, target) in pending {
                match handlers.add_alias(alias.as_str(), target) {
                    Ok(()) => {}
                    Err(HandlerError::NotFound { .. }) if self.aliases.contains_key(target) => {
                        blocked.push((alias, target));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            if blocked.len() == before {
                let (_, target) = blocked[0];
                return Err(HandlerError::NotFound {
                    name: target.clone(),
                }
                .into());
            }
            pending = blocked;
        }

        debug!(
            handlers = self.handlers.len(),
            aliases = self.aliases.len(),
            "registered configured handlers"
        );
        Ok(handlers)
    }

    /// Build a ready-to-use processor
    pub fn build_processor(&self) -> Result<Processor, ConfigError> {
        let parser = RegularParser::new(self.syntax.clone());
        let processor =
            Processor::with_parser(parser, self.handlers()?).with_config(self.processor.clone())?;
        Ok(processor)
    }
}
