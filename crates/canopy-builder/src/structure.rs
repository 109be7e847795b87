//! Structural emitters: module wrapper, classes, functions, object-literal
//! members and control flow.

use canopy_types::{ClassDescriptor, ConstructName};
use tracing::{debug, trace};

use crate::error::{BuildError, BuildResult};
use crate::expr;
use crate::scope::Scope;

impl Scope<'_> {
    // ══════════════════════════════════════════════════════════════════════
    // Module wrapper
    // ══════════════════════════════════════════════════════════════════════

    /// Emit the immediately-invoked module wrapper for grammar `name`.
    ///
    /// The body runs against this scope one level deeper, after the strict
    /// mode directive and the runtime helpers. `name` is remembered so that
    /// `parser_class` and `exports` can be called from the body.
    pub fn package<F>(&mut self, name: &str, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        let grammar = ConstructName::parse(name)?;
        debug!(grammar = %grammar, "emitting package");
        self.grammar = Some(grammar);

        self.write("(function() {");
        self.indented(|b| {
            if b.options.strict {
                b.line("'use strict'");
            }
            b.newline();
            b.runtime_helpers();
            body(b)
        })?;
        self.newline();
        self.write("})();");
        self.newline();
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Classes
    // ══════════════════════════════════════════════════════════════════════

    /// Run `body` in a new scope describing `class`, so that `constructor`
    /// knows what it is building.
    pub fn class<F>(&mut self, class: ClassDescriptor, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        debug!(class = %class, "emitting class");
        let mut scope = self.child(Some(class));
        body(&mut scope)
    }

    /// Emit the constructor of the enclosing class.
    ///
    /// With a parent, the constructor first forwards all of its arguments to
    /// the parent constructor, and the inheritance wiring follows the
    /// function.
    pub fn constructor<F>(&mut self, args: &[&str], body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        let class = self.class.clone().ok_or(BuildError::NoEnclosingClass)?;
        let strategy = self.options.inheritance.strategy();

        self.function(&format!("var {}", class.name()), args, |b| {
            if let Some(parent) = class.parent() {
                b.line(&strategy.super_call(parent));
            }
            body(b)
        })?;
        if let Some(parent) = class.parent() {
            strategy.wire(self, class.name(), parent);
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Functions and object-literal members
    // ══════════════════════════════════════════════════════════════════════

    /// `<name> = function(<args>) { … };`
    ///
    /// `name` is the full assignment target, e.g. `var Parser` or
    /// `Parser.prototype.parse`. The body gets a fresh scope that keeps the
    /// enclosing class.
    pub fn function<F>(&mut self, name: &str, args: &[&str], body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        trace!(%name, "emitting function");
        self.newline();
        self.write(&format!("{name} = function({}) {{", args.join(", ")));
        let class = self.class.clone();
        self.child(class).indented(body)?;
        self.newline();
        self.write("};");
        self.newline();
        Ok(())
    }

    /// `name: value` inside an object literal.
    pub fn field(&mut self, name: &str, value: &str) {
        self.delimit_field();
        self.newline();
        self.write(&format!("{name}: {value}"));
    }

    /// `name: function(<args>) { … }` inside an object literal, with the
    /// body in a fresh scope.
    pub fn method<F>(&mut self, name: &str, args: &[&str], body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        trace!(%name, "emitting method");
        self.delimit_field();
        self.newline();
        self.write(&format!("{name}: function({}) {{", args.join(", ")));
        self.child(None).indented(body)?;
        self.newline();
        self.write("}");
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Control flow
    // ══════════════════════════════════════════════════════════════════════

    fn conditional<F>(&mut self, keyword: &str, condition: &str, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.newline();
        self.write(&format!("{keyword} ({condition}) {{"));
        self.indented(body)?;
        self.newline();
        self.write("}");
        Ok(())
    }

    fn else_clause<F>(&mut self, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.write(" else {");
        self.indented(body)?;
        self.newline();
        self.write("}");
        Ok(())
    }

    pub fn if_block<F>(&mut self, condition: &str, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.conditional("if", condition, body)
    }

    pub fn if_else<F, G>(&mut self, condition: &str, then: F, otherwise: G) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
        G: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.conditional("if", condition, then)?;
        self.else_clause(otherwise)
    }

    pub fn unless_block<F>(&mut self, condition: &str, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.if_block(&expr::not(condition), body)
    }

    pub fn unless_else<F, G>(&mut self, condition: &str, then: F, otherwise: G) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
        G: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.if_else(&expr::not(condition), then, otherwise)
    }

    pub fn while_block<F>(&mut self, condition: &str, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.conditional("while", condition, body)
    }

    /// `for (<header>) { … }`; `header` is the full `init; test; update`.
    pub fn for_block<F>(&mut self, header: &str, body: F) -> BuildResult<()>
    where
        F: FnOnce(&mut Scope<'_>) -> BuildResult<()>,
    {
        self.conditional("for", header, body)
    }
}
