//! Recursive shortcode resolution

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use super::config::ProcessorConfig;
use super::processed::{Arena, NodeId, Placement, ProcessedShortcode};
use crate::error::ProcessorError;
use crate::handler::HandlerContainer;
use crate::parser::{RegularParser, ShortcodeParser};

/// Deepest content level ever resolved, whatever the configured depth
pub const MAX_RECURSION_LEVEL: usize = 256;

/// Replaces shortcodes in text with the output of their handlers
///
/// Configuration methods consume the processor and return a new one; clone
/// first to keep the original. Clones share the same handlers.
#[derive(Debug, Clone)]
pub struct Processor<P = RegularParser> {
    parser: P,
    handlers: Arc<HandlerContainer>,
    config: ProcessorConfig,
}

/// Counters carried down one level of resolution
///
/// Nested levels work on a copy, so their counts never leak back out.
#[derive(Debug, Clone, Default)]
struct Scope {
    iteration: usize,
    recursion_level: usize,
    base_offset: usize,
    position: usize,
    name_positions: HashMap<String, usize>,
}

impl Processor<RegularParser> {
    /// Create a processor using the default syntax
    pub fn new(handlers: HandlerContainer) -> Self {
        Self::with_parser(RegularParser::default(), handlers)
    }
}

impl<P: ShortcodeParser> Processor<P> {
    /// Create a processor around a custom parser
    pub fn with_parser(parser: P, handlers: HandlerContainer) -> Self {
        Self {
            parser,
            handlers: Arc::new(handlers),
            config: ProcessorConfig::default(),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn handlers(&self) -> &HandlerContainer {
        &self.handlers
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ProcessorConfig) -> Result<Self, ProcessorError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Limit how many levels of nested content are resolved
    ///
    /// `None` means no configured limit; resolution still stops below
    /// [`MAX_RECURSION_LEVEL`].
    pub fn with_recursion_depth(mut self, depth: Option<usize>) -> Self {
        self.config = self.config.with_recursion_depth(depth);
        self
    }

    /// Limit the number of passes (`None` = until a fixed point)
    pub fn with_max_iterations(mut self, iterations: Option<usize>) -> Result<Self, ProcessorError> {
        self.config = self.config.with_max_iterations(iterations)?;
        Ok(self)
    }

    /// Enable or disable resolving content before calling handlers
    pub fn with_auto_process_content(mut self, enabled: bool) -> Self {
        self.config = self.config.with_auto_process_content(enabled);
        self
    }

    /// Resolve every shortcode in `text`
    ///
    /// Passes repeat until the output stops changing or the iteration cap is
    /// reached, whichever comes first.
    pub fn process(&self, text: &str) -> String {
        let mut text = text.to_string();
        let mut iteration = 0;

        loop {
            iteration += 1;
            let scope = Scope {
                iteration,
                ..Scope::default()
            };
            let mut arena = Arena::default();
            let output = self.process_level(&text, scope, None, &mut arena);
            debug!(iteration, shortcodes = arena.len(), "finished pass");

            if output == text {
                debug!(iteration, "reached fixed point");
                break;
            }
            text = output;

            if self.config.max_iterations.is_some_and(|max| iteration >= max) {
                debug!(iteration, "reached iteration limit");
                break;
            }
        }

        text
    }

    fn process_level(
        &self,
        text: &str,
        mut scope: Scope,
        parent: Option<NodeId>,
        arena: &mut Arena,
    ) -> String {
        if scope.recursion_level > self.depth_limit() {
            trace!(level = scope.recursion_level, "recursion depth exhausted");
            return text.to_string();
        }

        let shortcodes = self.parser.parse(text);
        let mut replacements = Vec::with_capacity(shortcodes.len());

        for shortcode in shortcodes {
            scope.position += 1;
            let name_position = *scope
                .name_positions
                .entry(shortcode.name.clone())
                .and_modify(|n| *n += 1)
                .or_insert(1);
            let placement = Placement {
                position: scope.position,
                name_position,
                iteration: scope.iteration,
                recursion_level: scope.recursion_level,
                absolute_offset: scope.base_offset + shortcode.offset,
            };
            let id = arena.push(ProcessedShortcode::new(shortcode, parent, placement));

            if self.config.auto_process_content {
                self.process_content(id, &scope, placement, arena);
            }

            let node = arena.get(id);
            let Some(handler) = self.handlers.get(node.name()) else {
                // Nested handlers above have already run; only this
                // occurrence's resolved content is dropped.
                trace!(name = node.name(), "no handler, keeping source text");
                continue;
            };
            let replacement = handler
                .handle(node, arena.parent_of(id))
                .unwrap_or_default();
            replacements.push((node.offset(), node.text().len(), replacement));
        }

        splice(text, replacements)
    }

    fn depth_limit(&self) -> usize {
        self.config
            .recursion_depth
            .map_or(MAX_RECURSION_LEVEL, |depth| depth.min(MAX_RECURSION_LEVEL))
    }

    /// Resolve the content of `id` one level deeper
    fn process_content(&self, id: NodeId, scope: &Scope, placement: Placement, arena: &mut Arena) {
        let node = arena.get(id);
        let (Some(content), Some(content_at)) =
            (node.shortcode().content.clone(), node.positions().content)
        else {
            return;
        };

        let nested = Scope {
            recursion_level: scope.recursion_level + 1,
            base_offset: placement.absolute_offset + content_at,
            ..scope.clone()
        };
        let resolved = self.process_level(&content, nested, Some(id), arena);
        arena.get_mut(id).content = Some(resolved);
    }
}

/// Apply `(char offset, byte length, replacement)` edits, rightmost first
fn splice(text: &str, replacements: Vec<(usize, usize, String)>) -> String {
    let mut output = text.to_string();
    for (offset, len, replacement) in replacements.into_iter().rev() {
        let start = byte_index(&output, offset);
        output.replace_range(start..start + len, &replacement);
    }
    output
}

fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(i, _)| i)
}
