//! Shared types for the Canopy parser generator.
//!
//! This crate defines the validated names that flow between the grammar
//! front end, the code-emission builder and the runtime model: dotted
//! construct names, rule names, rule tags and class descriptors.

mod class;
mod name;

pub use class::ClassDescriptor;
pub use name::{ConstructName, NameError, RuleName, RuleTag};

/// Result type for name validation.
pub type Result<T> = std::result::Result<T, NameError>;
