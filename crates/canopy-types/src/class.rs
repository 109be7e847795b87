use serde::{Deserialize, Serialize};
use std::fmt;

use crate::name::{check_identifier, ConstructName, NameError};

/// A generated class: its own name plus, at most, one parent.
///
/// The descriptor only records the relationship. How the inheritance is
/// spelled out in the output language is decided by the builder's
/// inheritance strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClass")]
pub struct ClassDescriptor {
    name: String,
    parent: Option<ConstructName>,
}

#[derive(Deserialize)]
struct RawClass {
    name: String,
    parent: Option<ConstructName>,
}

impl TryFrom<RawClass> for ClassDescriptor {
    type Error = NameError;

    fn try_from(raw: RawClass) -> Result<Self, Self::Error> {
        check_identifier(&raw.name, &raw.name)?;
        Ok(Self {
            name: raw.name,
            parent: raw.parent,
        })
    }
}

impl ClassDescriptor {
    /// A class with no parent.
    pub fn new(name: &str) -> crate::Result<Self> {
        check_identifier(name, name)?;
        Ok(Self {
            name: name.to_string(),
            parent: None,
        })
    }

    /// A class extending `parent`. The parent may be a dotted path.
    pub fn extending(name: &str, parent: &str) -> crate::Result<Self> {
        let mut class = Self::new(name)?;
        class.parent = Some(ConstructName::parse(parent)?);
        Ok(class)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&ConstructName> {
        self.parent.as_ref()
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{} < {}", self.name, parent),
            None => f.write_str(&self.name),
        }
    }
}
