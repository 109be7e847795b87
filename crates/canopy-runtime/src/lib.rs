//! Canopy runtime model.
//!
//! Executes the contract that generated parser modules implement in
//! JavaScript: each rule is memoized per input offset (failures included),
//! the furthest failure is tracked with ties going to the later failure, and
//! a parse only succeeds when the entry rule consumes the whole input.
//!
//! Offsets here are byte offsets into a `&str`.

pub mod error;
pub mod node;
pub mod parser;

pub use error::{format_error, ErrorRecord, ParseError, ParseResult};
pub use node::SyntaxNode;
pub use parser::{Grammar, Parser, Reader, END_OF_INPUT};
