//! Output buffer, scope nodes, indentation and local naming.
//!
//! A [`Builder`] owns the one output buffer of a generation pass. Every
//! lexical region of generated code (module body, class, function body,
//! object literal) is a [`Scope`] that holds a reborrowed `&mut String` to
//! that buffer, so whichever scope writes, the text lands in the same place
//! and in call order.
//!
//! Each scope carries its own indent depth (copied from the parent when the
//! scope is created) and its own local-name counters. Function and method
//! scopes are always fresh scopes, so `chunk0` can be reused by every
//! generated function without any global numbering.

use std::collections::HashMap;

use canopy_types::{ClassDescriptor, ConstructName};
use tracing::trace;

use crate::error::BuildResult;
use crate::options::BuilderOptions;

/// Separator written before every object-literal member except the first.
const FIELD_SEPARATOR: &str = ",\n";

// ══════════════════════════════════════════════════════════════════════════════
// Builder
// ══════════════════════════════════════════════════════════════════════════════

/// Root of a generation pass: owns the output buffer and the options.
#[derive(Debug, Default)]
pub struct Builder {
    buffer: String,
    options: BuilderOptions,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder using `options`, which are validated first.
    pub fn with_options(options: BuilderOptions) -> BuildResult<Self> {
        options.validate()?;
        Ok(Self {
            buffer: String::new(),
            options,
        })
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// The root scope, at depth 0. Calling this again later continues
    /// appending to the same buffer with fresh counters.
    pub fn root(&mut self) -> Scope<'_> {
        Scope {
            out: &mut self.buffer,
            options: &self.options,
            depth: 0,
            class: None,
            grammar: None,
            field_separator: "",
            locals: HashMap::new(),
        }
    }

    /// Text accumulated so far.
    pub fn serialize(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Scope
// ══════════════════════════════════════════════════════════════════════════════

/// One lexical region of generated code.
pub struct Scope<'w> {
    out: &'w mut String,
    pub(crate) options: &'w BuilderOptions,
    depth: usize,
    /// Class whose constructor and methods are being emitted, if any.
    pub(crate) class: Option<ClassDescriptor>,
    /// Grammar name, set by `package` on the module scope.
    pub(crate) grammar: Option<ConstructName>,
    field_separator: &'static str,
    /// Base name → next free numeric suffix.
    locals: HashMap<String, usize>,
}

impl<'w> Scope<'w> {
    /// A child scope writing to the same buffer, starting at this scope's
    /// current depth with empty counters and separator state.
    pub(crate) fn child(&mut self, class: Option<ClassDescriptor>) -> Scope<'_> {
        trace!(depth = self.depth, class = ?class.as_ref().map(|c| c.name()), "new scope");
        Scope {
            out: &mut *self.out,
            options: self.options,
            depth: self.depth,
            class,
            grammar: None,
            field_separator: "",
            locals: HashMap::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn class_descriptor(&self) -> Option<&ClassDescriptor> {
        self.class.as_ref()
    }

    pub fn grammar(&self) -> Option<&ConstructName> {
        self.grammar.as_ref()
    }

    // ── Buffer & indentation ─────────────────────────────────────────────

    /// Append raw text to the shared buffer.
    pub fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Line break followed by one indent unit per depth level.
    pub fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(&self.options.indent);
        }
    }

    /// Run `body` against this scope one level deeper, then restore the depth.
    pub fn indented<F>(&mut self, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    /// Write a multi-line fragment starting on the current line, indenting
    /// its continuation lines to the current depth. Blank lines stay blank.
    pub(crate) fn write_fragment(&mut self, fragment: &str) {
        for (i, text) in fragment.lines().enumerate() {
            if i > 0 {
                if text.is_empty() {
                    self.out.push('\n');
                    continue;
                }
                self.newline();
            }
            self.write(text);
        }
    }

    /// A statement on its own line, terminated with `;`.
    pub fn line(&mut self, source: &str) {
        self.newline();
        self.write(source);
        self.write(";");
    }

    /// Write the member separator, except before the first member.
    pub(crate) fn delimit_field(&mut self) {
        self.out.push_str(self.field_separator);
        self.field_separator = FIELD_SEPARATOR;
    }

    // ── Local names ──────────────────────────────────────────────────────

    fn next_name(&mut self, base: &str) -> String {
        let index = self.locals.entry(base.to_string()).or_insert(0);
        let name = format!("{base}{index}");
        *index += 1;
        trace!(%name, "allocated local");
        name
    }

    /// Declare a fresh local `<base><n>` initialised to `value` and return
    /// its name.
    pub fn local(&mut self, base: &str, value: &str) -> String {
        let name = self.next_name(base);
        self.assign(&format!("var {name}"), value);
        name
    }

    /// Declare several fresh locals in one `var` statement. Names come back
    /// in the order given.
    pub fn locals(&mut self, vars: &[(&str, &str)]) -> Vec<String> {
        let mut names = Vec::with_capacity(vars.len());
        let mut decls = Vec::with_capacity(vars.len());
        for (base, value) in vars {
            let name = self.next_name(base);
            decls.push(format!("{name} = {value}"));
            names.push(name);
        }
        self.line(&format!("var {}", decls.join(", ")));
        names
    }

    // ── Simple statements ────────────────────────────────────────────────

    pub fn assign(&mut self, target: &str, value: &str) {
        self.line(&format!("{target} = {value}"));
    }

    /// `this._<name> = value`
    pub fn ivar(&mut self, name: &str, value: &str) {
        self.assign(&format!("this._{name}"), value);
    }

    /// `this['<name>'] = value`
    pub fn attribute(&mut self, name: &str, value: &str) {
        self.assign(&format!("this[{}]", crate::quote::quote(name)), value);
    }

    pub fn return_value(&mut self, expression: &str) {
        self.line(&format!("return {expression}"));
    }

    pub fn append(&mut self, list: &str, value: &str) {
        self.line(&format!("{list}.push({value})"));
    }

    /// Add a node's text to a string accumulator.
    pub fn concat_text(&mut self, buffer: &str, value: &str) {
        self.line(&format!("{buffer} += {value}.textValue"));
    }

    pub fn decrement(&mut self, variable: &str) {
        self.line(&format!("--{variable}"));
    }
}
