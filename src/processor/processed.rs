//! Resolution-time view of a shortcode occurrence

use crate::parser::{Parameters, ParsedShortcode, Positions};

/// Index of a processed shortcode within one pass's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// A parsed occurrence as seen by its handler
#[derive(Debug, Clone)]
pub struct ProcessedShortcode {
    shortcode: ParsedShortcode,
    /// Content after recursive resolution, or the raw content when skipped
    pub(crate) content: Option<String>,
    pub(crate) parent: Option<NodeId>,
    position: usize,
    name_position: usize,
    iteration: usize,
    recursion_level: usize,
    absolute_offset: usize,
}

/// Counters and offsets describing where an occurrence sits in a pass
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Placement {
    pub position: usize,
    pub name_position: usize,
    pub iteration: usize,
    pub recursion_level: usize,
    pub absolute_offset: usize,
}

impl ProcessedShortcode {
    pub(crate) fn new(
        shortcode: ParsedShortcode,
        parent: Option<NodeId>,
        placement: Placement,
    ) -> Self {
        Self {
            content: shortcode.content.clone(),
            shortcode,
            parent,
            position: placement.position,
            name_position: placement.name_position,
            iteration: placement.iteration,
            recursion_level: placement.recursion_level,
            absolute_offset: placement.absolute_offset,
        }
    }

    /// Wrap a parsed occurrence outside of any processing pass
    ///
    /// Useful for calling handlers directly, e.g. in tests.
    pub fn detached(shortcode: ParsedShortcode) -> Self {
        let placement = Placement {
            position: 1,
            name_position: 1,
            iteration: 1,
            recursion_level: 0,
            absolute_offset: shortcode.offset,
        };
        Self::new(shortcode, None, placement)
    }

    /// The occurrence as parsed, with its original content
    pub fn shortcode(&self) -> &ParsedShortcode {
        &self.shortcode
    }

    pub fn name(&self) -> &str {
        &self.shortcode.name
    }

    pub fn parameters(&self) -> &Parameters {
        &self.shortcode.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.shortcode.parameter(name)
    }

    /// Value of the parameter at `index` in declaration order
    pub fn parameter_at(&self, index: usize) -> Option<&str> {
        self.shortcode.parameters.value_at(index)
    }

    pub fn bbcode(&self) -> Option<&str> {
        self.shortcode.bbcode.as_deref()
    }

    /// Content handed to the handler
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Exact source text of the occurrence
    pub fn text(&self) -> &str {
        &self.shortcode.text
    }

    /// Start offset in the text being processed at this level
    pub fn offset(&self) -> usize {
        self.shortcode.offset
    }

    pub fn positions(&self) -> &Positions {
        &self.shortcode.positions
    }

    /// 1-based ordinal among the occurrences handled so far at this level
    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based ordinal among same-named occurrences handled so far
    pub fn name_position(&self) -> usize {
        self.name_position
    }

    /// 1-based number of the pass this occurrence was found in
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Nesting depth, 0 for root occurrences
    pub fn recursion_level(&self) -> usize {
        self.recursion_level
    }

    /// Start offset in the whole text of the current pass
    pub fn absolute_offset(&self) -> usize {
        self.absolute_offset
    }
}

/// Per-pass storage that lets handlers see their parent without ownership cycles
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<ProcessedShortcode>,
}

impl Arena {
    pub fn push(&mut self, node: ProcessedShortcode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &ProcessedShortcode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut ProcessedShortcode {
        &mut self.nodes[id.0]
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&ProcessedShortcode> {
        self.get(id).parent.map(|p| self.get(p))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
