//! Placeholder-substituting handler used for configured shortcodes

use super::Handler;
use crate::processor::ProcessedShortcode;

/// Handler that fills a template with values from the occurrence
///
/// Placeholders are `%name%`, `%content%`, `%bbcode%` and `%<parameter>%`.
/// Unknown placeholders are kept as written. Substituted values are never
/// rescanned for placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateHandler {
    template: String,
}

impl TemplateHandler {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    fn lookup<'s>(shortcode: &'s ProcessedShortcode, key: &str) -> Option<&'s str> {
        match key {
            "name" => Some(shortcode.name()),
            "content" => Some(shortcode.content().unwrap_or("")),
            "bbcode" => Some(shortcode.bbcode().unwrap_or("")),
            _ if shortcode.shortcode().has_parameter(key) => {
                Some(shortcode.parameter(key).unwrap_or(""))
            }
            _ => None,
        }
    }

    /// Expand the template for one occurrence
    pub fn render(&self, shortcode: &ProcessedShortcode) -> String {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('%') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('%') {
                Some(end) => match Self::lookup(shortcode, &after[..end]) {
                    Some(value) => {
                        output.push_str(value);
                        rest = &after[end + 1..];
                    }
                    None => {
                        // Keep the `%` and retry from the next one
                        output.push('%');
                        rest = after;
                    }
                },
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        output.push_str(rest);
        output
    }
}

impl Handler for TemplateHandler {
    fn handle(
        &self,
        shortcode: &ProcessedShortcode,
        _parent: Option<&ProcessedShortcode>,
    ) -> Option<String> {
        Some(self.render(shortcode))
    }
}
