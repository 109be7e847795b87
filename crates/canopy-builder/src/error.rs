//! Builder error types.

use canopy_types::NameError;
use thiserror::Error;

/// Errors raised while emitting a parser module.
///
/// These all point at a malformed call sequence from the grammar front end;
/// nothing here is recoverable mid-emission.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A grammar, class or rule name is not usable as an identifier.
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// `constructor` was called outside a `class` scope.
    #[error("constructor emitted outside of a class scope")]
    NoEnclosingClass,

    /// Export or parser wiring was requested outside a `package` scope.
    #[error("no grammar name in scope; call this inside `package`")]
    MissingGrammarName,

    /// Builder options could not be decoded.
    #[error("invalid builder options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// The configured indent unit contains something other than blanks.
    #[error("indent unit must be spaces or tabs, got {0:?}")]
    InvalidIndent(String),
}

/// Builder result type alias.
pub type BuildResult<T> = Result<T, BuildError>;
