//! Shortcode handlers
//!
//! A handler turns one processed occurrence into its replacement text.
//! Closures with the matching signature are handlers too:
//!
//! ```rust
//! use shortcode::{HandlerContainer, Processor};
//!
//! let mut handlers = HandlerContainer::new();
//! handlers
//!     .add("b", |s, _| Some(format!("<b>{}</b>", s.content().unwrap_or(""))))
//!     .unwrap();
//!
//! let processor = Processor::new(handlers);
//! assert_eq!(processor.process("[b]bold[/b]"), "<b>bold</b>");
//! ```

mod registry;
mod template;

pub use registry::{HandlerContainer, HandlerError};
pub use template::TemplateHandler;

use crate::processor::ProcessedShortcode;

/// Replacement logic for a shortcode
///
/// Receives the occurrence (its content already resolved when content
/// auto-processing applies) and its immediate enclosing occurrence, if any.
/// Returning `None` replaces the occurrence with nothing.
pub trait Handler: Send + Sync {
    fn handle(
        &self,
        shortcode: &ProcessedShortcode,
        parent: Option<&ProcessedShortcode>,
    ) -> Option<String>;
}

impl<F> Handler for F
where
    F: Fn(&ProcessedShortcode, Option<&ProcessedShortcode>) -> Option<String> + Send + Sync,
{
    fn handle(
        &self,
        shortcode: &ProcessedShortcode,
        parent: Option<&ProcessedShortcode>,
    ) -> Option<String> {
        self(shortcode, parent)
    }
}
