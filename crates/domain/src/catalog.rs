//! Trait group catalog.
//!
//! Static definitions of which named traits belong to which group. Trait keys
//! are the display names used on the sheet ("Strength", "Animal Ken"), so the
//! catalog is also the authority on which keys a record may hold for the
//! grouped categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

// =============================================================================
// Groups
// =============================================================================

/// Category family whose groups share a priority spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityCategory {
    Attributes,
    Abilities,
}

impl PriorityCategory {
    /// Groups in this family, in sheet order.
    pub fn groups(&self) -> [TraitGroup; 3] {
        match self {
            Self::Attributes => [TraitGroup::Physical, TraitGroup::Social, TraitGroup::Mental],
            Self::Abilities => [
                TraitGroup::Talents,
                TraitGroup::Skills,
                TraitGroup::Knowledges,
            ],
        }
    }

    /// Lowest rating a trait in this family may hold; dots at or below it are free.
    pub fn floor(&self) -> i32 {
        match self {
            Self::Attributes => 1,
            Self::Abilities => 0,
        }
    }
}

impl fmt::Display for PriorityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attributes => write!(f, "attributes"),
            Self::Abilities => write!(f, "abilities"),
        }
    }
}

/// A prioritizable trait group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitGroup {
    Physical,
    Social,
    Mental,
    Talents,
    Skills,
    Knowledges,
}

impl TraitGroup {
    pub fn category(&self) -> PriorityCategory {
        match self {
            Self::Physical | Self::Social | Self::Mental => PriorityCategory::Attributes,
            Self::Talents | Self::Skills | Self::Knowledges => PriorityCategory::Abilities,
        }
    }

    pub fn traits(&self) -> &'static [&'static str] {
        match self {
            Self::Physical => PHYSICAL,
            Self::Social => SOCIAL,
            Self::Mental => MENTAL,
            Self::Talents => TALENTS,
            Self::Skills => SKILLS,
            Self::Knowledges => KNOWLEDGES,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Social => "Social",
            Self::Mental => "Mental",
            Self::Talents => "Talents",
            Self::Skills => "Skills",
            Self::Knowledges => "Knowledges",
        }
    }

    pub fn all() -> [TraitGroup; 6] {
        [
            Self::Physical,
            Self::Social,
            Self::Mental,
            Self::Talents,
            Self::Skills,
            Self::Knowledges,
        ]
    }
}

impl fmt::Display for TraitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TraitGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physical" => Ok(Self::Physical),
            "social" => Ok(Self::Social),
            "mental" => Ok(Self::Mental),
            "talents" => Ok(Self::Talents),
            "skills" => Ok(Self::Skills),
            "knowledges" => Ok(Self::Knowledges),
            _ => Err(DomainError::parse(format!("Unknown trait group: {}", s))),
        }
    }
}

// =============================================================================
// Trait lists
// =============================================================================

pub const PHYSICAL: &[&str] = &["Strength", "Dexterity", "Stamina"];
pub const SOCIAL: &[&str] = &["Charisma", "Manipulation", "Appearance"];
pub const MENTAL: &[&str] = &["Perception", "Intelligence", "Wits"];

pub const TALENTS: &[&str] = &[
    "Alertness",
    "Athletics",
    "Awareness",
    "Brawl",
    "Empathy",
    "Expression",
    "Intimidation",
    "Leadership",
    "Streetwise",
    "Subterfuge",
];
pub const SKILLS: &[&str] = &[
    "Animal Ken",
    "Crafts",
    "Drive",
    "Etiquette",
    "Firearms",
    "Larceny",
    "Melee",
    "Performance",
    "Stealth",
    "Survival",
];
pub const KNOWLEDGES: &[&str] = &[
    "Academics",
    "Computer",
    "Finance",
    "Investigation",
    "Law",
    "Medicine",
    "Occult",
    "Politics",
    "Science",
    "Technology",
];

/// The fixed virtue triad.
pub const VIRTUES: &[&str] = &["Conscience", "Self-Control", "Courage"];

/// Disciplines priced at the cheaper "physical" rate.
pub const PHYSICAL_DISCIPLINES: &[&str] = &["Celerity", "Fortitude", "Potence"];

/// Discipline every ghoul starts with one dot of.
pub const STARTING_DISCIPLINE: &str = "Potence";

// =============================================================================
// Lookups
// =============================================================================

/// Resolve the group an attribute or ability belongs to.
pub fn group_of(key: &str) -> Option<TraitGroup> {
    TraitGroup::all()
        .into_iter()
        .find(|group| group.traits().contains(&key))
}

/// All attribute names in sheet order.
pub fn attributes() -> impl Iterator<Item = &'static str> {
    PriorityCategory::Attributes
        .groups()
        .into_iter()
        .flat_map(|g| g.traits().iter().copied())
}

/// All ability names in sheet order.
pub fn abilities() -> impl Iterator<Item = &'static str> {
    PriorityCategory::Abilities
        .groups()
        .into_iter()
        .flat_map(|g| g.traits().iter().copied())
}

pub fn is_virtue(key: &str) -> bool {
    VIRTUES.contains(&key)
}

pub fn is_physical_discipline(key: &str) -> bool {
    PHYSICAL_DISCIPLINES
        .iter()
        .any(|d| d.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_trait_has_exactly_one_group() {
        for key in attributes().chain(abilities()) {
            let owners = TraitGroup::all()
                .into_iter()
                .filter(|g| g.traits().contains(&key))
                .count();
            assert_eq!(owners, 1, "{key} should belong to one group");
        }
    }

    #[test]
    fn group_lookup() {
        assert_eq!(group_of("Strength"), Some(TraitGroup::Physical));
        assert_eq!(group_of("Perception"), Some(TraitGroup::Mental));
        assert_eq!(group_of("Animal Ken"), Some(TraitGroup::Skills));
        assert_eq!(group_of("Occult"), Some(TraitGroup::Knowledges));
        assert_eq!(group_of("Flight"), None);
    }

    #[test]
    fn groups_report_their_category() {
        assert_eq!(TraitGroup::Social.category(), PriorityCategory::Attributes);
        assert_eq!(TraitGroup::Talents.category(), PriorityCategory::Abilities);
        assert_eq!(PriorityCategory::Attributes.floor(), 1);
        assert_eq!(PriorityCategory::Abilities.floor(), 0);
    }

    #[test]
    fn physical_disciplines_ignore_case() {
        assert!(is_physical_discipline("Potence"));
        assert!(is_physical_discipline("celerity"));
        assert!(!is_physical_discipline("Dominate"));
    }

    #[test]
    fn trait_group_from_str() {
        assert_eq!("Physical".parse::<TraitGroup>().ok(), Some(TraitGroup::Physical));
        assert_eq!(" knowledges ".parse::<TraitGroup>().ok(), Some(TraitGroup::Knowledges));
        assert!("virtues".parse::<TraitGroup>().is_err());
    }
}
