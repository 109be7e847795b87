//! Packrat parser state: input, offset, per-rule cache and furthest failure.
//!
//! A [`Grammar`] maps rule names to reader functions. Each reader works on a
//! [`Parser`], the same way a generated `_read_<rule>` method works on the
//! generated parser instance, and leaves the offset just past whatever it
//! matched. [`Parser::read`] wraps every reader in the packrat cache.

use std::collections::{BTreeMap, HashMap};

use canopy_types::{RuleName, RuleTag};
use tracing::{debug, trace};

use crate::error::{ErrorRecord, ParseError, ParseResult};
use crate::node::SyntaxNode;

/// Expectation recorded when the entry rule stops short of the end of input.
pub const END_OF_INPUT: &str = "<EOF>";

/// A rule reader: `Some(node)` on a match, `None` on a failure.
pub type Reader = Box<dyn Fn(&mut Parser<'_>) -> ParseResult<Option<SyntaxNode>>>;

// ══════════════════════════════════════════════════════════════════════════════
// Grammar
// ══════════════════════════════════════════════════════════════════════════════

/// A set of named rule readers with one entry rule.
pub struct Grammar {
    root: RuleName,
    rules: BTreeMap<RuleName, Reader>,
}

impl Grammar {
    pub fn new(root: RuleName) -> Self {
        Self {
            root,
            rules: BTreeMap::new(),
        }
    }

    /// Add (or replace) the reader for `name`.
    pub fn rule<F>(mut self, name: RuleName, read: F) -> Self
    where
        F: Fn(&mut Parser<'_>) -> ParseResult<Option<SyntaxNode>> + 'static,
    {
        self.rules.insert(name, Box::new(read));
        self
    }

    pub fn root(&self) -> &RuleName {
        &self.root
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &RuleName> {
        self.rules.keys()
    }

    /// Parse `input` from the entry rule with a fresh parser.
    pub fn parse(&self, input: &str) -> ParseResult<SyntaxNode> {
        Parser::new(self, input).parse()
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("root", &self.root)
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Parser
// ══════════════════════════════════════════════════════════════════════════════

/// State of one parse.
pub struct Parser<'a> {
    grammar: &'a Grammar,
    input: &'a str,
    offset: usize,
    /// Rule → start offset → result. Failures are cached as `None`.
    cache: HashMap<RuleName, HashMap<usize, Option<SyntaxNode>>>,
    error: Option<ErrorRecord>,
}

impl<'a> Parser<'a> {
    pub fn new(grammar: &'a Grammar, input: &'a str) -> Self {
        Self {
            grammar,
            input,
            offset: 0,
            cache: HashMap::new(),
            error: None,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the parse position, e.g. to backtrack to a saved offset.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// The furthest failure recorded so far.
    pub fn error(&self) -> Option<&ErrorRecord> {
        self.error.as_ref()
    }

    /// Read `rule` at the current offset, at most once per offset.
    ///
    /// A cached match advances the offset by the length of its text; a
    /// cached failure leaves it where it is.
    pub fn read(&mut self, rule: &RuleName) -> ParseResult<Option<SyntaxNode>> {
        let index = self.offset;
        if let Some(cached) = self.cache.get(rule).and_then(|table| table.get(&index)) {
            let cached = cached.clone();
            trace!(%rule, index, hit = cached.is_some(), "cache hit");
            if let Some(node) = &cached {
                self.offset += node.text.len();
            }
            return Ok(cached);
        }

        let grammar = self.grammar;
        let read = grammar
            .rules
            .get(rule)
            .ok_or_else(|| ParseError::UnknownRule(rule.clone()))?;
        trace!(%rule, index, "cache miss");
        let result = read(self)?;
        self.cache
            .entry(rule.clone())
            .or_default()
            .insert(index, result.clone());
        Ok(result)
    }

    /// Up to `length` characters at the current offset, or `None` at the end
    /// of input.
    pub fn chunk(&self, length: usize) -> Option<&'a str> {
        let rest = self.input.get(self.offset..)?;
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(length)
            .map_or(rest.len(), |(i, _)| i);
        Some(&rest[..end])
    }

    /// Build a node for `text` at the current offset, tag it, then advance
    /// the offset by `bump` bytes.
    pub fn syntax_node(
        &mut self,
        text: &str,
        bump: usize,
        elements: Vec<SyntaxNode>,
        tag: Option<&RuleTag>,
    ) -> SyntaxNode {
        let mut node = SyntaxNode::new(text, self.offset, elements);
        if let Some(tag) = tag {
            node.set_rule_tag(tag.clone());
        }
        self.offset += bump;
        node
    }

    /// Record a failure to match `expected` at the current offset and return
    /// the failed result.
    ///
    /// The record is replaced unless an earlier one lies strictly further
    /// into the input; at equal offsets the later failure wins.
    pub fn fail(&mut self, expected: &str) -> Option<SyntaxNode> {
        let replace = self
            .error
            .as_ref()
            .map_or(true, |error| error.offset <= self.offset);
        if replace {
            trace!(offset = self.offset, %expected, "recording failure");
            self.error = Some(ErrorRecord::new(self.input, self.offset, expected));
        }
        None
    }

    /// Read the entry rule and require it to consume the whole input.
    ///
    /// On failure the furthest recorded failure is reported; if nothing
    /// failed, the entry rule stopped early and `<EOF>` is expected where it
    /// stopped.
    pub fn parse(mut self) -> ParseResult<SyntaxNode> {
        let root = self.grammar.root.clone();
        debug!(%root, len = self.input.len(), "parse");
        if let Some(node) = self.read(&root)? {
            if self.offset == self.input.len() {
                return Ok(node);
            }
        }
        let record = match self.error.take() {
            Some(record) => record,
            None => ErrorRecord::new(self.input, self.offset, END_OF_INPUT),
        };
        debug!(offset = record.offset, expected = %record.expected, "parse failed");
        Err(ParseError::failed(record))
    }
}
