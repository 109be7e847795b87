//! Single-parent inheritance strategies.
//!
//! A [`ClassDescriptor`](canopy_types::ClassDescriptor) only says "`Child`
//! extends `Parent`". The strategy decides what text expresses that: the
//! statement that forwards constructor arguments to the parent, and the
//! wiring emitted after the constructor function.

use canopy_types::ConstructName;
use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Spells out inheritance for one output dialect.
pub trait InheritanceStrategy {
    /// First statement of the child constructor: run the parent constructor
    /// on `this` with every received argument.
    fn super_call(&self, parent: &ConstructName) -> String;

    /// Emit whatever links `class`'s lookup chain to `parent`'s. Called right
    /// after the constructor function has been closed.
    fn wire(&self, scope: &mut Scope<'_>, class: &str, parent: &ConstructName);
}

/// Uses the `inherit` helper shipped in the module wrapper.
#[derive(Debug, Clone, Copy)]
pub struct PrototypeChain;

impl InheritanceStrategy for PrototypeChain {
    fn super_call(&self, parent: &ConstructName) -> String {
        format!("{parent}.apply(this, arguments)")
    }

    fn wire(&self, scope: &mut Scope<'_>, class: &str, parent: &ConstructName) {
        scope.write(&format!("inherit({class}, {parent});"));
        scope.newline();
    }
}

/// Wires the prototype inline with `Object.create`, no helper needed.
#[derive(Debug, Clone, Copy)]
pub struct ObjectCreate;

impl InheritanceStrategy for ObjectCreate {
    fn super_call(&self, parent: &ConstructName) -> String {
        format!("{parent}.apply(this, arguments)")
    }

    fn wire(&self, scope: &mut Scope<'_>, class: &str, parent: &ConstructName) {
        scope.write(&format!(
            "{class}.prototype = Object.create({parent}.prototype);"
        ));
        scope.newline();
        scope.write(&format!("{class}.prototype.constructor = {class};"));
        scope.newline();
    }
}

/// Configurable choice of [`InheritanceStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceStyle {
    #[default]
    PrototypeChain,
    ObjectCreate,
}

impl InheritanceStyle {
    pub fn strategy(self) -> &'static dyn InheritanceStrategy {
        match self {
            Self::PrototypeChain => &PrototypeChain,
            Self::ObjectCreate => &ObjectCreate,
        }
    }
}
