//! Parser-specific emitters.
//!
//! Generated parsers keep their state on the parser instance:
//!
//! ```text
//! this._input   the string being parsed
//! this._offset  current position, zero based
//! this._cache   one table per rule: offset → node | null
//! this.error    furthest failure: {input, offset, expected}
//! ```
//!
//! Every rule is a `_read_<rule>` method on the `Grammar` object literal,
//! wrapped in [`Scope::cache`] so it runs at most once per offset.

use canopy_types::{RuleName, RuleTag};
use tracing::{debug, trace};

use crate::error::{BuildError, BuildResult};
use crate::expr;
use crate::quote::quote;
use crate::scope::Scope;

pub const INPUT: &str = "this._input";
pub const OFFSET: &str = "this._offset";
pub const SYNTAX_NODE: &str = "SyntaxNode";
/// Expectation recorded when the entry rule stops short of the input end.
pub const END_OF_INPUT: &str = "<EOF>";

/// Name of the generated method that reads `rule`.
pub fn reader_name(rule: &RuleName) -> String {
    format!("_read_{rule}")
}

/// Runtime table caching results of `rule`.
pub fn cache_table(rule: &RuleName) -> String {
    format!("this._cache._{rule}")
}

/// An error record literal.
fn error_record(expected: &str) -> String {
    format!("{{input: {INPUT}, offset: {OFFSET}, expected: {expected}}}")
}

impl Scope<'_> {
    /// The expression for the current parse position.
    pub fn offset(&self) -> &'static str {
        OFFSET
    }

    // ══════════════════════════════════════════════════════════════════════
    // Syntax nodes
    // ══════════════════════════════════════════════════════════════════════

    /// Emit the `SyntaxNode` class and return its name.
    pub fn syntax_node_class(&mut self) -> BuildResult<&'static str> {
        self.function(
            &format!("var {SYNTAX_NODE}"),
            &["textValue", "offset", "elements"],
            |b| {
                b.line("this.textValue = textValue");
                b.line("this.offset = offset");
                b.line(&format!("this.elements = elements || {}", expr::EMPTY_LIST));
                b.line(&format!("this.ruleTag = {}", expr::NULL));
                Ok(())
            },
        )?;
        self.function(
            &format!("{SYNTAX_NODE}.prototype.setRuleTag"),
            &["tag"],
            |b| {
                b.line("this.ruleTag = tag");
                Ok(())
            },
        )?;
        self.function(
            &format!("{SYNTAX_NODE}.prototype.forEach"),
            &["block", "context"],
            |b| {
                b.for_block("var el = this.elements, i = 0, n = el.length; i < n; i++", |b| {
                    b.line("block.call(context, el[i], i, el)");
                    Ok(())
                })
            },
        )?;
        Ok(SYNTAX_NODE)
    }

    /// Construct a node for text `expression` starting at the current offset,
    /// tag it, then advance the offset by `bump`.
    ///
    /// `elements` defaults to an empty list and `node_class` to `SyntaxNode`.
    pub fn syntax_node(
        &mut self,
        address: &str,
        tag: Option<&RuleTag>,
        expression: &str,
        bump: &str,
        elements: Option<&str>,
        node_class: Option<&str>,
    ) {
        let class = node_class.unwrap_or(SYNTAX_NODE);
        let elements = elements.unwrap_or(expr::EMPTY_LIST);
        self.assign(
            address,
            &format!("new {class}({expression}, {OFFSET}, {elements})"),
        );
        if let Some(tag) = tag {
            self.tag_node(address, tag);
        }
        self.line(&format!("{OFFSET} += {bump}"));
    }

    /// Set the rule tag of a freshly built node.
    pub fn tag_node(&mut self, address: &str, tag: &RuleTag) {
        self.line(&format!("{address}.setRuleTag({})", quote(tag.as_str())));
    }

    /// Mix the user-supplied node type `node_type` into the node at
    /// `address`. Node types are looked up as properties of the parser class.
    pub fn extend_node(&mut self, address: &str, node_type: &str) {
        self.line(&format!("extend({address}, this.constructor.{node_type})"));
    }

    // ══════════════════════════════════════════════════════════════════════
    // Packrat cache
    // ══════════════════════════════════════════════════════════════════════

    /// Wrap a rule body in the cache read/store pattern.
    ///
    /// Emits, in order: `address`/`index` locals, creation of the rule's
    /// table, a lookup at `index` that replays the offset advance and returns
    /// on a hit (negative results included), then `body`, which must leave
    /// the rule's result in `address`, then the store-and-return.
    pub fn cache<F>(&mut self, rule: &RuleName, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>, &str) -> BuildResult<()>,
    {
        trace!(%rule, "emitting cache");
        let names = self.locals(&[("address", expr::NULL), ("index", OFFSET)]);
        let (address, index) = (&names[0], &names[1]);
        let table = cache_table(rule);
        let slot = expr::array_lookup(&table, index);

        self.assign(&table, &format!("{table} || {{}}"));
        let cached = self.local("cached", &slot);
        self.if_block(&format!("{cached} !== undefined"), |b| {
            b.if_block(&format!("{cached} !== {}", expr::NULL), |b| {
                b.line(&format!("{OFFSET} += {cached}.textValue.length"));
                Ok(())
            })?;
            b.return_value(&cached);
            Ok(())
        })?;

        body(self, address.as_str())?;
        self.return_value(&format!("{slot} = {address}"));
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Failures
    // ══════════════════════════════════════════════════════════════════════

    /// Set `address` to null and record a failure at the current offset,
    /// unless a failure further into the input is already recorded. A
    /// failure at the same offset replaces the recorded one.
    pub fn failure(&mut self, address: &str, expected: &str) -> BuildResult<()> {
        trace!(%expected, "emitting failure");
        self.assign(address, expr::NULL);
        let record = error_record(&quote(expected));
        self.if_block(
            &format!("!this.error || this.error.offset <= {OFFSET}"),
            |b| {
                b.line(&format!("this.error = this.constructor.lastError = {record}"));
                Ok(())
            },
        )
    }

    // ══════════════════════════════════════════════════════════════════════
    // Input access and rule calls
    // ══════════════════════════════════════════════════════════════════════

    /// Read up to `length` characters at the current offset into a fresh
    /// `chunk` local (null at the end of input) and return the local's name.
    pub fn chunk(&mut self, length: &str) -> BuildResult<String> {
        let chunk = self.local("chunk", expr::NULL);
        self.if_block(&format!("{INPUT}.length > {OFFSET}"), |b| {
            b.assign(
                &chunk,
                &format!("{INPUT}.substring({OFFSET}, {OFFSET} + {length})"),
            );
            Ok(())
        })?;
        Ok(chunk)
    }

    /// `address = this._read_<rule>()`
    pub fn jump(&mut self, address: &str, rule: &RuleName) {
        self.assign(address, &format!("this.{}()", reader_name(rule)));
    }

    // ══════════════════════════════════════════════════════════════════════
    // Grammar and parser
    // ══════════════════════════════════════════════════════════════════════

    /// `var Grammar = { … };` with the members emitted by `body`.
    pub fn grammar_module<F>(&mut self, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        debug!("emitting grammar module");
        self.newline();
        self.write("var Grammar = {");
        self.child(None).indented(body)?;
        self.newline();
        self.write("};");
        self.newline();
        Ok(())
    }

    /// Emit the `Parser` class with `root` as its entry rule, the one-shot
    /// `Parser.parse`, and mix the grammar's readers into its prototype.
    pub fn parser_class(&mut self, root: &RuleName) -> BuildResult<()> {
        if self.grammar.is_none() {
            return Err(BuildError::MissingGrammarName);
        }
        debug!(%root, "emitting parser class");

        self.function("var Parser", &["input"], |b| {
            b.assign(INPUT, "input");
            b.assign(OFFSET, "0");
            b.assign("this._cache", "{}");
            Ok(())
        })?;
        self.function("Parser.prototype.parse", &[], |b| {
            b.line(&format!("var result = this.{}()", reader_name(root)));
            let complete = expr::and(
                &format!("result !== {}", expr::NULL),
                &format!("{OFFSET} === {INPUT}.length"),
            );
            b.if_block(&complete, |b| {
                b.return_value("result");
                Ok(())
            })?;
            b.unless_block("this.error", |b| {
                b.line(&format!("this.error = {}", error_record(&quote(END_OF_INPUT))));
                Ok(())
            })?;
            b.line("throw new Error(formatError(this.error))");
            Ok(())
        })?;
        self.function("Parser.parse", &["input"], |b| {
            b.line("var parser = new Parser(input)");
            b.return_value("parser.parse()");
            Ok(())
        })?;
        self.line("extend(Parser.prototype, Grammar)");
        self.newline();
        Ok(())
    }
}
