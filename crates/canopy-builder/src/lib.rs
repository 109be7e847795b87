//! Canopy code emitter: turns a sequence of emission calls into the
//! JavaScript source of a packrat parser module.
//!
//! # Architecture
//!
//! The grammar front end decides *what* to emit and in which order; this
//! crate only decides *how* it is spelled. A generation pass owns one
//! [`Builder`], takes its root [`Scope`] and drives it:
//!
//! ```text
//! package(name)                   (function() { 'use strict'; helpers…
//!   syntax_node_class()             var SyntaxNode = function(…) {…};
//!   grammar_module()                var Grammar = {
//!     method(_read_<rule>)            _read_<rule>: function() {
//!       cache(rule)                     packrat lookup / body / store
//!   parser_class(root)              var Parser = function(input) {…};
//!   exports()                       module / namespace / global wiring
//!                                 })();
//! ```
//!
//! ## Scopes
//!
//! Every nested region is a [`Scope`] writing to the builder's single
//! buffer. Scopes carry their own indent depth and local-name counters;
//! functions and methods always open a fresh scope, control-flow blocks
//! reuse the enclosing one.
//!
//! ## Generated runtime contract
//!
//! The emitted parser memoizes each rule per input offset, records the
//! furthest failure (ties go to the later failure) and only accepts a parse
//! that consumes the whole input. `canopy-runtime` implements the same
//! contract in Rust.

pub mod error;
pub mod exports;
pub mod expr;
pub mod inherit;
pub mod options;
pub mod parser;
pub mod quote;
pub mod runtime;
pub mod scope;
pub mod structure;

pub use error::{BuildError, BuildResult};
pub use inherit::{InheritanceStrategy, InheritanceStyle};
pub use options::BuilderOptions;
pub use quote::quote;
pub use scope::{Builder, Scope};
