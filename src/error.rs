//! Error types for engine configuration

use thiserror::Error;

/// Errors raised when configuring a [`Processor`](crate::Processor)
///
/// Processing itself never fails; these only signal caller mistakes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("invalid value for {setting}: {reason}")]
    InvalidArgument {
        setting: &'static str,
        reason: String,
    },
}
