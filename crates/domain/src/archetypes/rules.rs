//! Shared validation and pricing rules.
//!
//! Templates describe themselves as a [`RuleBook`] plus a few record-dependent
//! limits; the algorithms here are the same for every archetype.

use crate::catalog::{self, PriorityCategory};
use crate::entities::CharacterRecord;
use crate::error::DomainError;
use crate::priority::PrioritySpreads;
use crate::value_objects::{PaidMode, TraitCategory};

use super::traits::{Cost, FeatureSet, ValidationInput, Verdict};

/// Highest rating on the dot scale.
pub const DOT_MAX: i32 = 5;

/// Highest Willpower and Humanity rating.
pub const TRACK_MAX: i32 = 10;

/// Highest point value of a single merit or flaw.
pub const MERIT_FLAW_MAX: i32 = 7;

/// How experience prices disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisciplineRate {
    /// Physical disciplines (Celerity, Fortitude, Potence) at one rate, the rest at another.
    Split { physical: i32, other: i32 },
    Flat(i32),
}

/// Experience multipliers, charged per target rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpRates {
    pub attribute: i32,
    pub ability: i32,
    /// Flat fee for the first dot of an ability.
    pub new_ability: i32,
    pub discipline: DisciplineRate,
    pub background: i32,
    pub virtue: i32,
    pub humanity: i32,
}

/// Freebie multipliers, charged per dot bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreebieRates {
    pub attribute: i32,
    pub ability: i32,
    pub discipline: i32,
    pub background: i32,
    pub virtue: i32,
    pub humanity: i32,
    pub willpower: i32,
}

/// Static numbers that set one archetype apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleBook {
    pub spreads: PrioritySpreads,
    /// Highest ability rating allowed while creating.
    pub ability_creation_cap: i32,
    /// Total background dots allowed while creating.
    pub background_cap: i32,
    pub xp: XpRates,
    pub freebie: FreebieRates,
}

/// Creation limits that depend on the record rather than the archetype alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreationLimits {
    pub discipline_total: Option<i32>,
    pub virtue_limit: Option<i32>,
}

// =============================================================================
// Guards
// =============================================================================

fn ensure_enabled(
    features: &FeatureSet,
    category: TraitCategory,
    record: &CharacterRecord,
) -> Result<(), DomainError> {
    if features.contains(category) {
        Ok(())
    } else {
        Err(DomainError::invalid_configuration(format!(
            "{} sheets have no {} (record {})",
            record.archetype.kind(),
            category,
            record.id
        )))
    }
}

fn ensure_known_key(category: TraitCategory, key: &str) -> Result<(), DomainError> {
    let known = match category {
        TraitCategory::Attributes => catalog::group_of(key)
            .is_some_and(|g| g.category() == PriorityCategory::Attributes),
        TraitCategory::Abilities => catalog::group_of(key)
            .is_some_and(|g| g.category() == PriorityCategory::Abilities),
        TraitCategory::Virtues => catalog::is_virtue(key),
        TraitCategory::Willpower | TraitCategory::Humanity => key == category.as_str(),
        TraitCategory::Disciplines
        | TraitCategory::Backgrounds
        | TraitCategory::Merits
        | TraitCategory::Flaws => !key.trim().is_empty(),
    };
    if known {
        Ok(())
    } else {
        Err(DomainError::invalid_configuration(format!(
            "'{}' is not a known {} trait",
            key, category
        )))
    }
}

fn out_of_range(key: &str, value: i32, min: i32, max: i32) -> Option<Verdict> {
    if value < min {
        Some(Verdict::reject(format!("{} cannot drop below {}", key, min)))
    } else if value > max {
        Some(Verdict::reject(format!("{} cannot exceed {}", key, max)))
    } else {
        None
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a change against a rule book.
///
/// Creation mode enforces priority ceilings and creation caps. Paid modes only
/// enforce the rating scale; their budgets are enforced by cost.
pub fn validate_change(
    book: &RuleBook,
    features: &FeatureSet,
    limits: CreationLimits,
    input: &ValidationInput<'_>,
) -> Result<Verdict, DomainError> {
    let change = input.change;
    let record = input.record;
    let key = change.key.as_str();
    ensure_enabled(features, change.category, record)?;
    ensure_known_key(change.category, key)?;

    let target = change.new_value;
    if target < 0 {
        return Ok(Verdict::reject(format!("{} cannot be negative", key)));
    }
    let delta = target - input.current;
    let creating = input.mode.is_creation();

    // Multi-dot experience purchases are left to pricing, which marks them unpurchasable.
    if input.mode.paid() == Some(PaidMode::Experience) && delta > 1 {
        return Ok(Verdict::Accepted);
    }

    match change.category {
        TraitCategory::Attributes | TraitCategory::Abilities => {
            let Some(group) = catalog::group_of(key) else {
                return Err(DomainError::invalid_configuration(format!(
                    "'{}' has no trait group",
                    key
                )));
            };
            let family = group.category();
            let floor = family.floor();
            if let Some(verdict) = out_of_range(key, target, floor, DOT_MAX) {
                return Ok(verdict);
            }
            if !creating || delta <= 0 {
                return Ok(Verdict::Accepted);
            }
            if change.category == TraitCategory::Abilities && target > book.ability_creation_cap {
                return Ok(Verdict::reject(format!(
                    "{} cannot exceed {} dots during character creation",
                    key, book.ability_creation_cap
                )));
            }
            let Some(ceiling) = input.priorities.ceiling_for(group) else {
                return Ok(Verdict::reject(format!(
                    "Select a priority for {} {} first",
                    group, family
                )));
            };
            let spent = record.group_spend(group) + delta;
            if spent > ceiling {
                return Ok(Verdict::reject(format!(
                    "{} priority of {} exceeded: {} would need {} dots",
                    group, ceiling, key, spent
                )));
            }
            Ok(Verdict::Accepted)
        }
        TraitCategory::Disciplines => {
            if let Some(verdict) = out_of_range(key, target, 0, DOT_MAX) {
                return Ok(verdict);
            }
            if !creating || delta <= 0 {
                return Ok(Verdict::Accepted);
            }
            let Some(limit) = limits.discipline_total else {
                return Err(DomainError::invalid_configuration(format!(
                    "{} sheets have no discipline creation total",
                    record.archetype.kind()
                )));
            };
            let total = record.dots_above(TraitCategory::Disciplines, 0) + delta;
            if total > limit {
                return Ok(Verdict::reject(format!(
                    "Only {} discipline dots are allowed during character creation",
                    limit
                )));
            }
            Ok(Verdict::Accepted)
        }
        TraitCategory::Backgrounds => {
            if let Some(verdict) = out_of_range(key, target, 0, DOT_MAX) {
                return Ok(verdict);
            }
            if !creating || delta <= 0 {
                return Ok(Verdict::Accepted);
            }
            let total = record.dots_above(TraitCategory::Backgrounds, 0) + delta;
            if total > book.background_cap {
                return Ok(Verdict::reject(format!(
                    "Only {} background dots are allowed during character creation",
                    book.background_cap
                )));
            }
            Ok(Verdict::Accepted)
        }
        TraitCategory::Virtues => {
            if let Some(verdict) = out_of_range(key, target, 1, DOT_MAX) {
                return Ok(verdict);
            }
            if !creating || delta <= 0 {
                return Ok(Verdict::Accepted);
            }
            let Some(limit) = limits.virtue_limit else {
                return Err(DomainError::invalid_configuration(format!(
                    "{} sheets have no virtue limit",
                    record.archetype.kind()
                )));
            };
            let spent = record.dots_above_in(TraitCategory::Virtues, catalog::VIRTUES.iter().copied(), 1)
                + delta;
            if spent > limit {
                return Ok(Verdict::reject(format!(
                    "Only {} virtue dots may be assigned during character creation",
                    limit
                )));
            }
            Ok(Verdict::Accepted)
        }
        TraitCategory::Willpower => {
            Ok(out_of_range("Willpower", target, 1, TRACK_MAX).unwrap_or(Verdict::Accepted))
        }
        TraitCategory::Humanity => {
            Ok(out_of_range("Humanity", target, 0, TRACK_MAX).unwrap_or(Verdict::Accepted))
        }
        TraitCategory::Merits | TraitCategory::Flaws => {
            if creating && delta > 0 {
                return Ok(Verdict::reject(format!(
                    "{} are taken with freebie points, not during priority allocation",
                    change.category.display_name()
                )));
            }
            Ok(out_of_range(key, target, 0, MERIT_FLAW_MAX).unwrap_or(Verdict::Accepted))
        }
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Price a change from `current` to `target`.
pub fn price_change(
    book: &RuleBook,
    features: &FeatureSet,
    mode: PaidMode,
    category: TraitCategory,
    key: &str,
    current: i32,
    target: i32,
    record: &CharacterRecord,
) -> Result<Cost, DomainError> {
    ensure_enabled(features, category, record)?;

    let delta = target - current;
    if delta <= 0 {
        return Ok(Cost::Points(0));
    }

    let cost = match mode {
        PaidMode::Experience => {
            if delta > 1 {
                return Ok(Cost::Unpurchasable(format!(
                    "Experience buys one dot at a time ({} {} -> {})",
                    key, current, target
                )));
            }
            let xp = &book.xp;
            match category {
                TraitCategory::Attributes => target * xp.attribute,
                TraitCategory::Abilities if current == 0 => xp.new_ability,
                TraitCategory::Abilities => target * xp.ability,
                TraitCategory::Disciplines => match xp.discipline {
                    DisciplineRate::Split { physical, .. } if catalog::is_physical_discipline(key) => {
                        target * physical
                    }
                    DisciplineRate::Split { other, .. } => target * other,
                    DisciplineRate::Flat(rate) => target * rate,
                },
                TraitCategory::Backgrounds => target * xp.background,
                TraitCategory::Virtues => target * xp.virtue,
                TraitCategory::Humanity => target * xp.humanity,
                TraitCategory::Willpower => current.max(1),
                TraitCategory::Merits | TraitCategory::Flaws => {
                    return Ok(Cost::Unpurchasable(format!(
                        "{} cannot be bought with experience",
                        category.display_name()
                    )));
                }
            }
        }
        PaidMode::Freebie => {
            let fb = &book.freebie;
            match category {
                TraitCategory::Attributes => delta * fb.attribute,
                TraitCategory::Abilities => delta * fb.ability,
                TraitCategory::Disciplines => delta * fb.discipline,
                TraitCategory::Backgrounds => delta * fb.background,
                TraitCategory::Virtues => delta * fb.virtue,
                TraitCategory::Humanity => delta * fb.humanity,
                TraitCategory::Willpower => delta * fb.willpower,
                TraitCategory::Merits => delta,
                TraitCategory::Flaws => -delta,
            }
        }
    };
    Ok(Cost::Points(cost))
}
