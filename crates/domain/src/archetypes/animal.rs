//! Animal template.
//!
//! Animals get wider spreads and may max out abilities at creation, but have
//! no virtues, backgrounds or Humanity. A ghouled animal gains Disciplines,
//! starting from the same single dot of Potence as any ghoul.

use crate::catalog::STARTING_DISCIPLINE;
use crate::entities::{ArchetypeKind, CharacterRecord, TraitDefaults};
use crate::error::DomainError;
use crate::priority::PrioritySpreads;
use crate::value_objects::{PaidMode, TraitCategory};

use super::rules::{
    price_change, validate_change, CreationLimits, DisciplineRate, FreebieRates, RuleBook,
    XpRates, DOT_MAX,
};
use super::traits::{ArchetypeTemplate, Cost, FeatureSet, ValidationInput, Verdict};

const RULES: RuleBook = RuleBook {
    spreads: PrioritySpreads {
        attributes: [7, 5, 3],
        abilities: [13, 9, 5],
    },
    ability_creation_cap: DOT_MAX,
    // Backgrounds are off for animals.
    background_cap: 0,
    xp: XpRates {
        attribute: 5,
        ability: 2,
        new_ability: 3,
        discipline: DisciplineRate::Flat(15),
        background: 0,
        virtue: 0,
        humanity: 0,
    },
    freebie: FreebieRates {
        attribute: 5,
        ability: 2,
        discipline: 10,
        background: 0,
        virtue: 0,
        humanity: 0,
        willpower: 1,
    },
};

/// Only the seeded Potence dot.
const GHOULED_DISCIPLINE_CREATION_TOTAL: i32 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnimalTemplate;

impl AnimalTemplate {
    pub fn new() -> Self {
        Self
    }
}

impl ArchetypeTemplate for AnimalTemplate {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Animal
    }

    fn display_name(&self) -> &str {
        "Animal"
    }

    fn features(&self, record: &CharacterRecord) -> FeatureSet {
        let features = FeatureSet::new([
            TraitCategory::Attributes,
            TraitCategory::Abilities,
            TraitCategory::Willpower,
            TraitCategory::Merits,
            TraitCategory::Flaws,
        ]);
        if record.archetype.is_ghouled_animal() {
            features.with(TraitCategory::Disciplines)
        } else {
            features
        }
    }

    fn defaults(&self) -> TraitDefaults {
        TraitDefaults {
            attribute: 1,
            ability: 0,
            virtue: 0,
            willpower: 1,
            humanity: 0,
            blood_pool: 5,
            has_virtues: false,
        }
    }

    fn seed(&self, record: &mut CharacterRecord) {
        if record.archetype.is_ghouled_animal() {
            record.set_trait(TraitCategory::Disciplines, STARTING_DISCIPLINE, 1);
        }
    }

    fn priority_spreads(&self) -> PrioritySpreads {
        RULES.spreads
    }

    fn virtue_limit(&self, _record: &CharacterRecord) -> Option<i32> {
        None
    }

    fn validate(&self, input: &ValidationInput<'_>) -> Result<Verdict, DomainError> {
        let limits = CreationLimits {
            discipline_total: input
                .record
                .archetype
                .is_ghouled_animal()
                .then_some(GHOULED_DISCIPLINE_CREATION_TOTAL),
            virtue_limit: None,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TraitGroup;
    use crate::entities::Archetype;
    use crate::priority::PriorityAssignment;
    use crate::value_objects::{EconomyMode, TraitChange};

    fn animal(ghouled: bool) -> CharacterRecord {
        AnimalTemplate
            .new_record(
                "Bosco",
                Archetype::Animal {
                    species: "Mastiff".into(),
                    ghouled,
                },
            )
            .unwrap()
    }

    #[test]
    fn animals_have_no_virtues_or_backgrounds() {
        let record = animal(false);
        assert!(record.virtues.is_empty());
        assert_eq!(AnimalTemplate.virtue_limit(&record), None);
        let features = AnimalTemplate.features(&record);
        assert!(!features.contains(TraitCategory::Virtues));
        assert!(!features.contains(TraitCategory::Backgrounds));
        assert!(!features.contains(TraitCategory::Disciplines));
    }

    #[test]
    fn ghouled_animals_unlock_disciplines() {
        let record = animal(true);
        assert!(AnimalTemplate.features(&record).contains(TraitCategory::Disciplines));
        assert_eq!(record.trait_value(TraitCategory::Disciplines, "Potence"), 1);

        let change = TraitChange::new(TraitCategory::Disciplines, "Celerity", 1);
        let verdict = AnimalTemplate
            .validate(&ValidationInput {
                change: &change,
                current: 0,
                record: &record,
                priorities: &PriorityAssignment::new(),
                mode: EconomyMode::Creation,
            })
            .unwrap();
        assert!(!verdict.is_accepted());
    }

    #[test]
    fn abilities_may_reach_five_at_creation() {
        let record = animal(false);
        let mut priorities = PriorityAssignment::new();
        priorities
            .assign(&AnimalTemplate.priority_spreads(), TraitGroup::Talents, 13)
            .unwrap();
        let change = TraitChange::new(TraitCategory::Abilities, "Brawl", 5);
        let verdict = AnimalTemplate
            .validate(&ValidationInput {
                change: &change,
                current: 0,
                record: &record,
                priorities: &priorities,
                mode: EconomyMode::Creation,
            })
            .unwrap();
        assert!(verdict.is_accepted());
    }

    #[test]
    fn animal_rates() {
        let record = animal(true);
        let xp_attr = AnimalTemplate
            .cost(PaidMode::Experience, TraitCategory::Attributes, "Dexterity", 2, 3, &record)
            .unwrap();
        assert_eq!(xp_attr, Cost::Points(15));

        let xp_disc = AnimalTemplate
            .cost(PaidMode::Experience, TraitCategory::Disciplines, "Potence", 1, 2, &record)
            .unwrap();
        assert_eq!(xp_disc, Cost::Points(30));

        let freebie_attr = AnimalTemplate
            .cost(PaidMode::Freebie, TraitCategory::Attributes, "Dexterity", 2, 4, &record)
            .unwrap();
        assert_eq!(freebie_attr, Cost::Points(10));
    }

    #[test]
    fn template_refuses_foreign_archetype() {
        let result = AnimalTemplate.new_record("Anna", Archetype::Mortal);
        assert!(matches!(result, Err(DomainError::InvalidConfiguration(_))));
    }
}
