//! Character record entity - one per NPC or player character sheet.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{self, PriorityCategory, TraitGroup};
use crate::entities::Archetype;
use crate::error::DomainError;
use crate::ids::CharacterId;
use crate::ledger::{ExperienceBalance, FreebieBalance, Ledger, LedgerEntry};
use crate::value_objects::{PaidMode, TraitCategory};

/// Trait name → dot rating (or point value for merits and flaws).
pub type TraitMap = BTreeMap<String, i32>;

/// Starting values a template fills a fresh record with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitDefaults {
    pub attribute: i32,
    pub ability: i32,
    pub virtue: i32,
    pub willpower: i32,
    pub humanity: i32,
    pub blood_pool: i32,
    /// Whether the record carries a virtue triad at all.
    pub has_virtues: bool,
}

/// Experience economy: an externally granted total plus the spend log.
///
/// `spent` is not stored; it is always the log sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePool {
    pub total: i32,
    pub log: Ledger,
}

impl Default for ExperiencePool {
    fn default() -> Self {
        Self {
            total: 0,
            log: Ledger::new(PaidMode::Experience),
        }
    }
}

impl ExperiencePool {
    pub fn spent(&self) -> i32 {
        self.log.spent()
    }
}

fn default_freebie_log() -> Ledger {
    Ledger::new(PaidMode::Freebie)
}

/// A character sheet's trait state and both point ledgers.
///
/// Persisted as a single document snapshot after every accepted change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub archetype: Archetype,

    #[serde(default)]
    pub attributes: TraitMap,
    #[serde(default)]
    pub abilities: TraitMap,
    #[serde(default)]
    pub virtues: TraitMap,
    #[serde(default)]
    pub disciplines: TraitMap,
    #[serde(default)]
    pub backgrounds: TraitMap,

    pub willpower: i32,
    pub humanity: i32,
    pub blood_pool: i32,

    #[serde(default)]
    pub merits: TraitMap,
    #[serde(default)]
    pub flaws: TraitMap,

    #[serde(default)]
    pub experience: ExperiencePool,
    #[serde(default = "default_freebie_log")]
    pub freebie_log: Ledger,
}

impl CharacterRecord {
    /// Create a record filled with template defaults.
    pub fn new(name: impl Into<String>, archetype: Archetype, defaults: &TraitDefaults) -> Self {
        let attributes = catalog::attributes()
            .map(|key| (key.to_string(), defaults.attribute))
            .collect();
        let abilities = catalog::abilities()
            .map(|key| (key.to_string(), defaults.ability))
            .collect();
        let virtues = if defaults.has_virtues {
            catalog::VIRTUES
                .iter()
                .map(|key| (key.to_string(), defaults.virtue))
                .collect()
        } else {
            TraitMap::new()
        };

        Self {
            id: CharacterId::new(),
            name: name.into(),
            archetype,
            attributes,
            abilities,
            virtues,
            disciplines: TraitMap::new(),
            backgrounds: TraitMap::new(),
            willpower: defaults.willpower,
            humanity: defaults.humanity,
            blood_pool: defaults.blood_pool,
            merits: TraitMap::new(),
            flaws: TraitMap::new(),
            experience: ExperiencePool::default(),
            freebie_log: default_freebie_log(),
        }
    }

    /// The keyed trait map for a category. `None` for scalar categories.
    pub fn traits(&self, category: TraitCategory) -> Option<&TraitMap> {
        match category {
            TraitCategory::Attributes => Some(&self.attributes),
            TraitCategory::Abilities => Some(&self.abilities),
            TraitCategory::Disciplines => Some(&self.disciplines),
            TraitCategory::Backgrounds => Some(&self.backgrounds),
            TraitCategory::Virtues => Some(&self.virtues),
            TraitCategory::Merits => Some(&self.merits),
            TraitCategory::Flaws => Some(&self.flaws),
            TraitCategory::Willpower | TraitCategory::Humanity => None,
        }
    }

    fn traits_mut(&mut self, category: TraitCategory) -> Option<&mut TraitMap> {
        match category {
            TraitCategory::Attributes => Some(&mut self.attributes),
            TraitCategory::Abilities => Some(&mut self.abilities),
            TraitCategory::Disciplines => Some(&mut self.disciplines),
            TraitCategory::Backgrounds => Some(&mut self.backgrounds),
            TraitCategory::Virtues => Some(&mut self.virtues),
            TraitCategory::Merits => Some(&mut self.merits),
            TraitCategory::Flaws => Some(&mut self.flaws),
            TraitCategory::Willpower | TraitCategory::Humanity => None,
        }
    }

    /// Current rating of a trait; absent keys read as 0.
    pub fn trait_value(&self, category: TraitCategory, key: &str) -> i32 {
        match category {
            TraitCategory::Willpower => self.willpower,
            TraitCategory::Humanity => self.humanity,
            _ => self
                .traits(category)
                .and_then(|map| map.get(key))
                .copied()
                .unwrap_or(0),
        }
    }

    /// Write a trait rating. Merits and flaws lowered to 0 are removed.
    pub fn set_trait(&mut self, category: TraitCategory, key: &str, value: i32) {
        match category {
            TraitCategory::Willpower => self.willpower = value,
            TraitCategory::Humanity => self.humanity = value,
            TraitCategory::Merits | TraitCategory::Flaws if value == 0 => {
                if let Some(map) = self.traits_mut(category) {
                    map.remove(key);
                }
            }
            _ => {
                if let Some(map) = self.traits_mut(category) {
                    map.insert(key.to_string(), value);
                }
            }
        }
    }

    /// Sum of `max(0, value - floor)` across a category.
    pub fn dots_above(&self, category: TraitCategory, floor: i32) -> i32 {
        self.traits(category)
            .map(|map| map.values().map(|v| (v - floor).max(0)).sum())
            .unwrap_or(0)
    }

    /// Sum of `max(0, value - floor)` across the named keys.
    pub fn dots_above_in<'a>(
        &self,
        category: TraitCategory,
        keys: impl IntoIterator<Item = &'a str>,
        floor: i32,
    ) -> i32 {
        keys.into_iter()
            .map(|key| (self.trait_value(category, key) - floor).max(0))
            .sum()
    }

    /// Dots a priority group holds above its family floor.
    pub fn group_spend(&self, group: TraitGroup) -> i32 {
        let family = group.category();
        let category = match family {
            PriorityCategory::Attributes => TraitCategory::Attributes,
            PriorityCategory::Abilities => TraitCategory::Abilities,
        };
        self.dots_above_in(category, group.traits().iter().copied(), family.floor())
    }

    pub fn append_entry(&mut self, entry: LedgerEntry) -> Result<(), DomainError> {
        match entry.mode {
            PaidMode::Freebie => self.freebie_log.append(entry),
            PaidMode::Experience => self.experience.log.append(entry),
        }
    }

    /// Remaining points in a paid economy, recomputed from its log.
    pub fn remaining(&self, mode: PaidMode) -> i32 {
        match mode {
            PaidMode::Freebie => self.freebie_balance().remaining,
            PaidMode::Experience => self.experience_balance().remaining,
        }
    }

    pub fn freebie_balance(&self) -> FreebieBalance {
        FreebieBalance::from_ledger(&self.freebie_log)
    }

    pub fn experience_balance(&self) -> ExperienceBalance {
        ExperienceBalance::from_ledger(self.experience.total, &self.experience.log)
    }

    /// Award experience points earned in play.
    pub fn grant_experience(&mut self, amount: i32) -> Result<i32, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation(format!(
                "experience grants must be positive, got {}",
                amount
            )));
        }
        self.experience.total = self.experience.total.checked_add(amount).ok_or_else(|| {
            DomainError::validation(format!(
                "experience total would overflow: {} + {}",
                self.experience.total, amount
            ))
        })?;
        Ok(self.experience.total)
    }
}
