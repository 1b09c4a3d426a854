//! Structural results of a successful parse

/// Ordered parameter list of a shortcode
///
/// Insertion order is preserved so parameters can also be addressed by
/// position. A parameter without a value (`[tag flag]`) stores `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(String, Option<String>)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter; a repeated name overwrites the value in place
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    /// Value of a named parameter; `None` when absent or value-less
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Name of the parameter at `index`
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(n, _)| n.as_str())
    }

    /// Value of the parameter at `index`
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (N, Option<String>)>>(iter: I) -> Self {
        let mut parameters = Parameters::new();
        for (name, value) in iter {
            parameters.insert(name, value);
        }
        parameters
    }
}

/// Offsets of the structural parts of a shortcode, relative to its start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Positions {
    pub name: usize,
    pub parameters: usize,
    /// Closing marker of a self-closing tag, or of the matching closing tag
    pub marker: Option<usize>,
    pub content: Option<usize>,
}

/// A shortcode occurrence found in text
///
/// `content` is `None` for self-closing tags and for opening tags without a
/// matching closing tag; `Some("")` means an explicitly closed, empty body.
/// All offsets count codepoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedShortcode {
    pub name: String,
    pub parameters: Parameters,
    pub bbcode: Option<String>,
    pub content: Option<String>,
    /// Exact source text of the occurrence, nested occurrences included
    pub text: String,
    /// Start offset in the parsed text
    pub offset: usize,
    pub positions: Positions,
}

impl ParsedShortcode {
    /// Value of a named parameter
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }

    /// `[tag /]` form
    pub fn is_self_closing(&self) -> bool {
        self.content.is_none() && self.positions.marker.is_some()
    }

    /// Length of the source text in codepoints
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Codepoint range covered in the parsed text
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len()
    }
}
