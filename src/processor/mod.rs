//! Resolution engine
//!
//! Parses text, resolves nested content depth-first, calls handlers and
//! splices their output back, repeating passes until the text settles.

mod config;
mod engine;
mod processed;

pub use config::ProcessorConfig;
pub use engine::{Processor, MAX_RECURSION_LEVEL};
pub use processed::ProcessedShortcode;
