//! Syntax tree nodes.

use canopy_types::RuleTag;
use serde::{Deserialize, Serialize};

/// A matched span of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub text: String,
    /// Byte offset of `text` in the input.
    pub offset: usize,
    pub elements: Vec<SyntaxNode>,
    pub rule_tag: Option<RuleTag>,
}

impl SyntaxNode {
    pub fn new(text: impl Into<String>, offset: usize, elements: Vec<SyntaxNode>) -> Self {
        Self {
            text: text.into(),
            offset,
            elements,
            rule_tag: None,
        }
    }

    pub fn set_rule_tag(&mut self, tag: RuleTag) {
        self.rule_tag = Some(tag);
    }

    pub fn rule_tag(&self) -> Option<&RuleTag> {
        self.rule_tag.as_ref()
    }

    /// Byte offset just past this node.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SyntaxNode> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a SyntaxNode {
    type Item = &'a SyntaxNode;
    type IntoIter = std::slice::Iter<'a, SyntaxNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
