//! Archetype identity and archetype-specific record fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Registry key for an archetype rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    Mortal,
    Ghoul,
    Animal,
}

impl ArchetypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mortal => "mortal",
            Self::Ghoul => "ghoul",
            Self::Animal => "animal",
        }
    }
}

impl fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArchetypeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mortal" | "human" => Ok(Self::Mortal),
            "ghoul" | "revenant" => Ok(Self::Ghoul),
            "animal" => Ok(Self::Animal),
            _ => Err(DomainError::parse(format!("Unknown archetype: {}", s))),
        }
    }
}

/// Revenant bloodlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevenantFamily {
    Bratovich,
    Grimaldi,
    Obertus,
    Zantosa,
}

/// How a ghoul came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "family")]
pub enum GhoulType {
    /// Bound to a domitor.
    #[default]
    Vassal,
    /// Feeds without a master.
    Independent,
    /// Born to a ghoul family.
    Revenant(RevenantFamily),
}

impl GhoulType {
    pub fn is_revenant(&self) -> bool {
        matches!(self, Self::Revenant(_))
    }
}

/// Archetype plus the fields only that archetype carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Archetype {
    Mortal,
    Ghoul {
        #[serde(default)]
        ghoul_type: GhoulType,
    },
    Animal {
        species: String,
        /// A ghouled animal gains access to Disciplines.
        #[serde(default)]
        ghouled: bool,
    },
}

impl Archetype {
    pub fn kind(&self) -> ArchetypeKind {
        match self {
            Self::Mortal => ArchetypeKind::Mortal,
            Self::Ghoul { .. } => ArchetypeKind::Ghoul,
            Self::Animal { .. } => ArchetypeKind::Animal,
        }
    }

    pub fn ghoul_type(&self) -> Option<GhoulType> {
        match self {
            Self::Ghoul { ghoul_type } => Some(*ghoul_type),
            _ => None,
        }
    }

    pub fn is_ghouled_animal(&self) -> bool {
        matches!(self, Self::Animal { ghouled: true, .. })
    }
}
