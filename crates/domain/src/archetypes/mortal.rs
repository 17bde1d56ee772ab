//! Mortal template.

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
        // Mortals never learn disciplines; the rate is unreachable behind the feature flag.
        discipline: DisciplineRate::Flat(0),
        background: 3,
        virtue: 2,
        humanity: 2,
    },
    freebie: FreebieRates {
        attribute: 5,
        ability: 2,
        discipline: 0,
        background: 1,
        virtue: 2,
        humanity: 1,
        willpower: 1,
    },
};

const VIRTUE_LIMIT: i32 = 7;

/// Plain humans.
#[derive(Debug, Clone, Copy, Default)]
pub struct MortalTemplate;

impl MortalTemplate {
    pub fn new() -> Self {
        Self
    }
}

impl ArchetypeTemplate for MortalTemplate {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Mortal
    }

    fn display_name(&self) -> &str {
        "Mortal"
    }

    fn features(&self, _record: &CharacterRecord) -> FeatureSet {
        FeatureSet::new([
            TraitCategory::Attributes,
            TraitCategory::Abilities,
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

    fn priority_spreads(&self) -> PrioritySpreads {
        RULES.spreads
    }

    fn virtue_limit(&self, _record: &CharacterRecord) -> Option<i32> {
        Some(VIRTUE_LIMIT)
    }

    fn validate(&self, input: &ValidationInput<'_>) -> Result<Verdict, DomainError> {
        let limits = CreationLimits {
            discipline_total: None,
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
