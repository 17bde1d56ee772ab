//! Ghoul template, including Revenant families.
//!
//! Ghouls share the mortal spreads but know Disciplines: every ghoul starts
//! with one dot of Potence and may take one more during creation. Revenants
//! are born into their condition and have a tighter virtue budget.

use crate::catalog::STARTING_DISCIPLINE;
use crate::entities::{ArchetypeKind, CharacterRecord, TraitDefaults};
use crate::error::DomainError;
use crate::priority::PrioritySpreads;
use crate::value_objects::{PaidMode, TraitCategory};

use super::rules::{
    price_change, validate_change, CreationLimits, DisciplineRate, FreebieRates, RuleBook,
    XpRates,
};
use super::traits::{ArchetypeTemplate, Cost, FeatureSet, ValidationInput, Verdict};

const RULES: RuleBook = RuleBook {
    spreads: PrioritySpreads {
        attributes: [6, 4, 3],
        abilities: [11, 7, 4],
    },
    ability_creation_cap: 3,
    background_cap: 5,
    xp: XpRates {
        attribute: 4,
        ability: 2,
        new_ability: 3,
        discipline: DisciplineRate::Split {
            physical: 10,
            other: 20,
        },
        background: 3,
        virtue: 2,
        humanity: 2,
    },
    freebie: FreebieRates {
        attribute: 5,
        ability: 2,
        discipline: 10,
        background: 1,
        virtue: 2,
        humanity: 1,
        willpower: 1,
    },
};

/// One free dot plus the starting Potence.
const DISCIPLINE_CREATION_TOTAL: i32 = 2;
const VIRTUE_LIMIT: i32 = 7;
const REVENANT_VIRTUE_LIMIT: i32 = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct GhoulTemplate;

impl GhoulTemplate {
    pub fn new() -> Self {
        Self
    }
}

impl ArchetypeTemplate for GhoulTemplate {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Ghoul
    }

    fn display_name(&self) -> &str {
        "Ghoul"
    }

    fn features(&self, _record: &CharacterRecord) -> FeatureSet {
        FeatureSet::new([
            TraitCategory::Attributes,
            TraitCategory::Abilities,
            TraitCategory::Disciplines,
            TraitCategory::Backgrounds,
            TraitCategory::Virtues,
            TraitCategory::Willpower,
            TraitCategory::Humanity,
            TraitCategory::Merits,
            TraitCategory::Flaws,
        ])
    }

    fn defaults(&self) -> TraitDefaults {
        TraitDefaults {
            attribute: 1,
            ability: 0,
            virtue: 1,
            willpower: 1,
            humanity: 2,
            blood_pool: 10,
            has_virtues: true,
        }
    }

    fn seed(&self, record: &mut CharacterRecord) {
        record.set_trait(TraitCategory::Disciplines, STARTING_DISCIPLINE, 1);
    }

    fn priority_spreads(&self) -> PrioritySpreads {
        RULES.spreads
    }

    fn virtue_limit(&self, record: &CharacterRecord) -> Option<i32> {
        let revenant = record
            .archetype
            .ghoul_type()
            .is_some_and(|t| t.is_revenant());
        Some(if revenant {
            REVENANT_VIRTUE_LIMIT
        } else {
            VIRTUE_LIMIT
        })
    }

    fn validate(&self, input: &ValidationInput<'_>) -> Result<Verdict, DomainError> {
        let limits = CreationLimits {
            discipline_total: Some(DISCIPLINE_CREATION_TOTAL),
            virtue_limit: self.virtue_limit(input.record),
        };
        validate_change(&RULES, &self.features(input.record), limits, input)
    }

    fn cost(
        &self,
        mode: PaidMode,
        category: TraitCategory,
        key: &str,
        current: i32,
        target: i32,
        record: &CharacterRecord,
    ) -> Result<Cost, DomainError> {
        price_change(
            &RULES,
            &self.features(record),
            mode,
            category,
            key,
            current,
            target,
            record,
        )
    }
}
