//! Annotated listing of the shortcodes found in a text

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use tracing::warn;

use crate::parser::ParsedShortcode;

/// Render one report per occurrence, with ANSI colors
pub fn render(source: &str, filename: &str, shortcodes: &[ParsedShortcode]) -> String {
    render_with_color(source, filename, shortcodes, true)
}

/// Same as [`render`], without color codes
pub fn render_plain(source: &str, filename: &str, shortcodes: &[ParsedShortcode]) -> String {
    render_with_color(source, filename, shortcodes, false)
}

fn render_with_color(
    source: &str,
    filename: &str,
    shortcodes: &[ParsedShortcode],
    color: bool,
) -> String {
    if shortcodes.is_empty() {
        return format!("{filename}: no shortcodes\n");
    }

    let mut buf = Vec::new();
    for shortcode in shortcodes {
        let spans = Spans::of(shortcode);
        let mut report = Report::build(ReportKind::Advice, filename, shortcode.offset)
            .with_config(Config::default().with_color(color))
            .with_message(format!("shortcode `{}`", shortcode.name))
            .with_label(
                Label::new((filename, spans.name))
                    .with_message("name")
                    .with_color(Color::Cyan)
                    .with_order(0),
            );

        if let Some(span) = spans.parameters {
            report = report.with_label(
                Label::new((filename, span))
                    .with_message(describe_parameters(shortcode))
                    .with_color(Color::Yellow)
                    .with_order(1),
            );
        }
        if let Some(span) = spans.content {
            let message = match &shortcode.content {
                Some(content) if content.is_empty() => "empty content".to_string(),
                _ => "content".to_string(),
            };
            report = report.with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Green)
                    .with_order(2),
            );
        }

        if let Err(e) = report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
        {
            warn!(error = %e, name = %shortcode.name, "failed to write report");
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Absolute codepoint ranges of the labelled parts of an occurrence
struct Spans {
    name: Range<usize>,
    parameters: Option<Range<usize>>,
    content: Option<Range<usize>>,
}

impl Spans {
    fn of(shortcode: &ParsedShortcode) -> Self {
        let start = shortcode.offset;
        let positions = &shortcode.positions;

        let name_start = start + positions.name;
        let name = name_start..name_start + shortcode.name.chars().count();

        let open_tag_end = match (positions.content, positions.marker) {
            (Some(content), _) => start + content,
            (None, Some(marker)) => start + marker,
            (None, None) => start + shortcode.len(),
        };
        let has_arguments = !shortcode.parameters.is_empty() || shortcode.bbcode.is_some();
        let parameters = (has_arguments && name.end < open_tag_end).then(|| name.end..open_tag_end);

        let content = shortcode
            .content
            .as_deref()
            .zip(positions.content)
            .map(|(content, at)| {
                let content_start = start + at;
                // Zero-width labels are not drawn, so mark at least one codepoint
                let len = content.chars().count().max(1);
                content_start..content_start + len
            });

        Self {
            name,
            parameters,
            content,
        }
    }
}

fn describe_parameters(shortcode: &ParsedShortcode) -> String {
    let mut parts = Vec::new();
    if let Some(bbcode) = &shortcode.bbcode {
        parts.push(format!("bbcode `{bbcode}`"));
    }
    for (name, value) in shortcode.parameters.iter() {
        match value {
            Some(value) => parts.push(format!("{name} = `{value}`")),
            None => parts.push(name.to_string()),
        }
    }
    parts.join(", ")
}
