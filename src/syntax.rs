//! Delimiter literals recognized by the tokenizer

use serde::Deserialize;

/// The five literal strings that make up shortcode markup
///
/// The default syntax reads `[name param="value"]content[/name]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Syntax {
    opening_tag: String,
    closing_tag: String,
    closing_tag_marker: String,
    parameter_value_separator: String,
    parameter_value_delimiter: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            opening_tag: "[".to_string(),
            closing_tag: "]".to_string(),
            closing_tag_marker: "/".to_string(),
            parameter_value_separator: "=".to_string(),
            parameter_value_delimiter: "\"".to_string(),
        }
    }
}

impl Syntax {
    /// Create a syntax from all five literals
    pub fn new(
        opening_tag: impl Into<String>,
        closing_tag: impl Into<String>,
        closing_tag_marker: impl Into<String>,
        parameter_value_separator: impl Into<String>,
        parameter_value_delimiter: impl Into<String>,
    ) -> Self {
        Self {
            opening_tag: opening_tag.into(),
            closing_tag: closing_tag.into(),
            closing_tag_marker: closing_tag_marker.into(),
            parameter_value_separator: parameter_value_separator.into(),
            parameter_value_delimiter: parameter_value_delimiter.into(),
        }
    }

    pub fn opening_tag(&self) -> &str {
        &self.opening_tag
    }

    pub fn closing_tag(&self) -> &str {
        &self.closing_tag
    }

    pub fn closing_tag_marker(&self) -> &str {
        &self.closing_tag_marker
    }

    pub fn parameter_value_separator(&self) -> &str {
        &self.parameter_value_separator
    }

    pub fn parameter_value_delimiter(&self) -> &str {
        &self.parameter_value_delimiter
    }

    /// Set the opening tag literal
    pub fn with_opening_tag(mut self, literal: impl Into<String>) -> Self {
        self.opening_tag = literal.into();
        self
    }

    /// Set the closing tag literal
    pub fn with_closing_tag(mut self, literal: impl Into<String>) -> Self {
        self.closing_tag = literal.into();
        self
    }

    /// Set the closing tag marker literal
    pub fn with_closing_tag_marker(mut self, literal: impl Into<String>) -> Self {
        self.closing_tag_marker = literal.into();
        self
    }

    /// Set the parameter value separator literal
    pub fn with_parameter_value_separator(mut self, literal: impl Into<String>) -> Self {
        self.parameter_value_separator = literal.into();
        self
    }

    /// Set the parameter value delimiter literal
    pub fn with_parameter_value_delimiter(mut self, literal: impl Into<String>) -> Self {
        self.parameter_value_delimiter = literal.into();
        self
    }

    /// Names of literals that are empty and can therefore never match
    pub fn empty_literals(&self) -> Vec<&'static str> {
        [
            ("opening_tag", &self.opening_tag),
            ("closing_tag", &self.closing_tag),
            ("closing_tag_marker", &self.closing_tag_marker),
            ("parameter_value_separator", &self.parameter_value_separator),
            ("parameter_value_delimiter", &self.parameter_value_delimiter),
        ]
        .into_iter()
        .filter(|(_, literal)| literal.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
