//! Export wiring for the generated module.
//!
//! The generated code picks one of three strategies at load time:
//!
//! 1. A host module system (`require` + `exports`): copy the exports onto
//!    `exports`; for a dotted grammar name whose namespace path already
//!    exists globally, also assign the dotted path.
//! 2. No module system, dotted name: create every missing namespace segment
//!    on the global object, then assign the last segment.
//! 3. No module system, plain name: assign it on the global object.

use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::scope::Scope;

/// Exported bindings, by the name consumers see.
const EXPORTED: &str =
    "{Grammar: Grammar, Parser: Parser, parse: Parser.parse, formatError: formatError}";

const HOST_MODULE: &str = "typeof require === 'function' && typeof exports === 'object'";

/// The global object, reachable from strict-mode code.
const GLOBAL_OBJECT: &str =
    "typeof globalThis === 'object' ? globalThis : Function('return this')()";

impl Scope<'_> {
    /// Emit the export cascade for the grammar named by the enclosing
    /// `package`.
    pub fn exports(&mut self) -> BuildResult<()> {
        let grammar = self.grammar.clone().ok_or(BuildError::MissingGrammarName)?;
        debug!(grammar = %grammar, "emitting exports");

        let path_exists: Vec<String> = (1..=grammar.namespace().len())
            .map(|len| format!("typeof {} !== 'undefined'", grammar.prefix(len)))
            .collect();

        self.assign("var exported", EXPORTED);
        self.newline();

        self.if_else(
            HOST_MODULE,
            |b| {
                b.line("extend(exports, exported)");
                if path_exists.is_empty() {
                    return Ok(());
                }
                b.if_block(&path_exists.join(" && "), |b| {
                    b.assign(&grammar.to_string(), "exported");
                    Ok(())
                })
            },
            |b| {
                b.assign("var namespace", GLOBAL_OBJECT);
                for segment in grammar.namespace() {
                    b.assign(
                        "namespace",
                        &format!("namespace.{segment} = namespace.{segment} || {{}}"),
                    );
                }
                b.assign(&format!("namespace.{}", grammar.last()), "exported");
                Ok(())
            },
        )
    }
}
