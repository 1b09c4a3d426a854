//! Shortcode - parser and resolution engine for inline tags
//!
//! Finds WordPress/BBCode-style shortcodes (`[name a=1]content[/name]`) in
//! arbitrary text and replaces them with the output of registered handlers,
//! resolving nested shortcodes first.
//!
//! # Example
//!
//! ```rust
//! use shortcode::{HandlerContainer, Processor};
//!
//! let mut handlers = HandlerContainer::new();
//! handlers.add("upper", |s, _| s.content().map(str::to_uppercase)).unwrap();
//! handlers.add("name", |s, _| Some(s.name().to_string())).unwrap();
//!
//! let processor = Processor::new(handlers);
//! assert_eq!(processor.process("x [upper]a [name /][/upper] y"), "x A NAME y");
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod parser;
pub mod processor;
pub mod report;
pub mod syntax;

pub use config::{Config, ConfigError};
pub use error::ProcessorError;
pub use handler::{Handler, HandlerContainer, HandlerError, TemplateHandler};
pub use parser::{parse, Parameters, ParsedShortcode, Positions, RegularParser, ShortcodeParser};
pub use processor::{ProcessedShortcode, Processor, ProcessorConfig};
pub use syntax::Syntax;
