//! Configuration for the resolution engine

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::error::ProcessorError;

/// Limits and switches for shortcode processing
///
/// `None` limits are unbounded, written `"unbounded"` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// How many levels of nested content are resolved
    #[serde(deserialize_with = "limit")]
    pub recursion_depth: Option<usize>,

    /// Maximum number of passes over the text; never `Some(0)`
    #[serde(deserialize_with = "limit")]
    pub max_iterations: Option<usize>,

    /// Resolve nested shortcodes in content before calling the handler
    pub auto_process_content: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            recursion_depth: None,
            max_iterations: Some(1),
            auto_process_content: true,
        }
    }
}

impl ProcessorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recursion depth; `Some(0)` disables content resolution
    pub fn with_recursion_depth(mut self, depth: Option<usize>) -> Self {
        self.recursion_depth = depth;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, iterations: Option<usize>) -> Result<Self, ProcessorError> {
        if iterations == Some(0) {
            return Err(ProcessorError::InvalidArgument {
                setting: "max_iterations",
                reason: "must be a positive integer or unbounded".to_string(),
            });
        }
        self.max_iterations = iterations;
        Ok(self)
    }

    /// Enable or disable content auto-processing
    pub fn with_auto_process_content(mut self, enabled: bool) -> Self {
        self.auto_process_content = enabled;
        self
    }

    /// Check values that deserialization alone cannot rule out
    pub fn validate(&self) -> Result<(), ProcessorError> {
        self.clone().with_max_iterations(self.max_iterations).map(|_| ())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LimitValue {
    Count(usize),
    Keyword(String),
}

fn limit<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    match LimitValue::deserialize(deserializer)? {
        LimitValue::Count(count) => Ok(Some(count)),
        LimitValue::Keyword(keyword) if keyword == "unbounded" => Ok(None),
        LimitValue::Keyword(other) => Err(D::Error::custom(format!(
            "expected a non-negative integer or \"unbounded\", found \"{other}\""
        ))),
    }
}
