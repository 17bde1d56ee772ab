//! Trait category value object.
//!
//! Provides type safety for category references instead of the loose strings
//! ("attributes", "disc") a sheet form sends. The same tag is stamped on every
//! ledger entry, so breakdowns never have to guess a bucket from a key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Every category of dot-rated or point-valued trait on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitCategory {
    Attributes,
    Abilities,
    Disciplines,
    Backgrounds,
    Virtues,
    Willpower,
    Humanity,
    Merits,
    Flaws,
}

impl TraitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Abilities => "abilities",
            Self::Disciplines => "disciplines",
            Self::Backgrounds => "backgrounds",
            Self::Virtues => "virtues",
            Self::Willpower => "willpower",
            Self::Humanity => "humanity",
            Self::Merits => "merits",
            Self::Flaws => "flaws",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Attributes => "Attributes",
            Self::Abilities => "Abilities",
            Self::Disciplines => "Disciplines",
            Self::Backgrounds => "Backgrounds",
            Self::Virtues => "Virtues",
            Self::Willpower => "Willpower",
            Self::Humanity => "Humanity",
            Self::Merits => "Merits",
            Self::Flaws => "Flaws",
        }
    }

    /// Single-valued categories have no per-trait key on the record.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Willpower | Self::Humanity)
    }

    pub fn all() -> [TraitCategory; 9] {
        [
            Self::Attributes,
            Self::Abilities,
            Self::Disciplines,
            Self::Backgrounds,
            Self::Virtues,
            Self::Willpower,
            Self::Humanity,
            Self::Merits,
            Self::Flaws,
        ]
    }
}

impl fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TraitCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attributes" | "attribute" | "attr" => Ok(Self::Attributes),
            "abilities" | "ability" | "abil" => Ok(Self::Abilities),
            "disciplines" | "discipline" | "disc" => Ok(Self::Disciplines),
            "backgrounds" | "background" => Ok(Self::Backgrounds),
            "virtues" | "virtue" => Ok(Self::Virtues),
            "willpower" => Ok(Self::Willpower),
            "humanity" => Ok(Self::Humanity),
            "merits" | "merit" => Ok(Self::Merits),
            "flaws" | "flaw" => Ok(Self::Flaws),
            _ => Err(DomainError::parse(format!("Unknown trait category: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!(TraitCategory::from_str("attributes"), Ok(TraitCategory::Attributes));
        assert_eq!(TraitCategory::from_str("Disc"), Ok(TraitCategory::Disciplines));
        assert_eq!(TraitCategory::from_str("flaw"), Ok(TraitCategory::Flaws));
        assert!(TraitCategory::from_str("spells").is_err());
    }

    #[test]
    fn test_category_serde_roundtrip() {
        let json = serde_json::to_string(&TraitCategory::Backgrounds).unwrap();
        assert_eq!(json, "\"backgrounds\"");
        let parsed: TraitCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TraitCategory::Backgrounds);
    }

    #[test]
    fn test_scalar_categories() {
        assert!(TraitCategory::Willpower.is_scalar());
        assert!(TraitCategory::Humanity.is_scalar());
        assert!(!TraitCategory::Virtues.is_scalar());
    }
}
