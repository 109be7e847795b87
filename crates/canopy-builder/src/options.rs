//! Builder configuration.
//!
//! Options are plain data so a front end can keep them next to its own
//! settings and hand them over as JSON:
//!
//! ```json
//! { "indent": "    ", "inheritance": "object_create", "strict": true }
//! ```
//!
//! Every field is optional; missing fields take their default.

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};
use crate::inherit::InheritanceStyle;

/// Default indent unit: two spaces per depth level.
pub const DEFAULT_INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderOptions {
    /// Text emitted once per indent level after every line break.
    pub indent: String,
    /// How `constructor` spells out single-parent inheritance.
    pub inheritance: InheritanceStyle,
    /// Open the module wrapper with `'use strict'`.
    pub strict: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            inheritance: InheritanceStyle::default(),
            strict: true,
        }
    }
}

impl BuilderOptions {
    /// Decode options from JSON and validate them.
    pub fn from_json(json: &str) -> BuildResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the indent unit only contains spaces and tabs.
    pub fn validate(&self) -> BuildResult<()> {
        if self.indent.chars().all(|c| c == ' ' || c == '\t') {
            Ok(())
        } else {
            Err(BuildError::InvalidIndent(self.indent.clone()))
        }
    }
}
