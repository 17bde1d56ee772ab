//! Append-only point ledgers and balance recomputation.
//!
//! Every paid trait change lands here as a [`LedgerEntry`]. Balances are never
//! stored: [`FreebieBalance`] and [`ExperienceBalance`] are recomputed from the
//! full log each time they are asked for, so a displayed balance can always be
//! reproduced by replaying the entries.
//!
//! Entries are history, not transactions. Lowering a trait or deleting a merit
//! after it was bought leaves its entry (and its cost) in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::ids::LedgerEntryId;
use crate::value_objects::{PaidMode, TraitCategory, TraitChange};

/// Freebie points every character starts finishing with.
pub const FREEBIE_BASE: i32 = 15;

/// Most freebie points flaws can add to the pool.
pub const FLAW_BONUS_CAP: i32 = 7;

// =============================================================================
// Entries
// =============================================================================

/// One accepted, paid trait change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub category: TraitCategory,
    pub trait_key: String,
    pub from_value: i32,
    pub to_value: i32,
    /// Points charged. Negative only for flaw bonuses in the freebie ledger.
    pub cost: i32,
    pub timestamp: DateTime<Utc>,
    pub mode: PaidMode,
}

impl LedgerEntry {
    pub fn new(
        mode: PaidMode,
        change: &TraitChange,
        from_value: i32,
        cost: i32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            category: change.category,
            trait_key: change.key.clone(),
            from_value,
            to_value: change.new_value,
            cost,
            timestamp,
            mode,
        }
    }

    /// Flaw entries credit the bonus pool instead of counting as spend.
    pub fn is_flaw_bonus(&self) -> bool {
        self.category == TraitCategory::Flaws
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Ordered log of entries for one paid economy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    mode: PaidMode,
    #[serde(default)]
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new(mode: PaidMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    pub fn mode(&self) -> PaidMode {
        self.mode
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, enforcing the per-ledger cost invariants.
    pub fn append(&mut self, entry: LedgerEntry) -> Result<(), DomainError> {
        if entry.mode != self.mode {
            return Err(DomainError::invalid_configuration(format!(
                "{} entry appended to {} ledger",
                entry.mode, self.mode
            )));
        }
        if entry.cost < 0 && !(self.mode == PaidMode::Freebie && entry.is_flaw_bonus()) {
            return Err(DomainError::invalid_configuration(format!(
                "negative cost {} for {}:{} in {} ledger",
                entry.cost, entry.category, entry.trait_key, self.mode
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Total charged, excluding flaw bonuses.
    pub fn spent(&self) -> i32 {
        self.entries
            .iter()
            .filter(|e| !e.is_flaw_bonus())
            .map(|e| e.cost)
            .sum()
    }

    /// Points credited by flaws before the cap is applied.
    pub fn flaw_bonus(&self) -> i32 {
        self.entries
            .iter()
            .filter(|e| e.is_flaw_bonus())
            .map(|e| -e.cost)
            .sum()
    }

    /// Itemized spend per category. Flaws appear with their (negative) cost.
    pub fn breakdown(&self) -> BTreeMap<TraitCategory, i32> {
        let mut totals = BTreeMap::new();
        for entry in &self.entries {
            *totals.entry(entry.category).or_insert(0) += entry.cost;
        }
        totals
    }
}

// =============================================================================
// Balances
// =============================================================================

/// Freebie pool recomputed from the freebie log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreebieBalance {
    pub base: i32,
    /// Flaw bonus after the cap.
    pub bonus: i32,
    pub spent: i32,
    pub remaining: i32,
    pub breakdown: BTreeMap<TraitCategory, i32>,
}

impl FreebieBalance {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let bonus = ledger.flaw_bonus().clamp(0, FLAW_BONUS_CAP);
        let spent = ledger.spent();
        Self {
            base: FREEBIE_BASE,
            bonus,
            spent,
            remaining: FREEBIE_BASE + bonus - spent,
            breakdown: ledger.breakdown(),
        }
    }

    pub fn available(&self) -> i32 {
        self.base + self.bonus
    }
}

/// Experience pool recomputed from the experience log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceBalance {
    pub total: i32,
    pub spent: i32,
    pub remaining: i32,
    pub breakdown: BTreeMap<TraitCategory, i32>,
}

impl ExperienceBalance {
    pub fn from_ledger(total: i32, ledger: &Ledger) -> Self {
        let spent = ledger.spent();
        Self {
            total,
            spent,
            remaining: total - spent,
            breakdown: ledger.breakdown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mode: PaidMode, category: TraitCategory, key: &str, cost: i32) -> LedgerEntry {
        LedgerEntry::new(mode, &TraitChange::new(category, key, 1), 0, cost, Utc::now())
    }

    #[test]
    fn empty_freebie_ledger_has_base_pool() {
        let balance = FreebieBalance::from_ledger(&Ledger::new(PaidMode::Freebie));
        assert_eq!(balance.remaining, 15);
        assert_eq!(balance.bonus, 0);
        assert!(balance.breakdown.is_empty());
    }

    #[test]
    fn replay_is_idempotent() {
        let mut ledger = Ledger::new(PaidMode::Freebie);
        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Attributes, "Strength", 5))
            .unwrap();
        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Backgrounds, "Resources", 2))
            .unwrap();

        let first = FreebieBalance::from_ledger(&ledger);
        let second = FreebieBalance::from_ledger(&ledger);
        assert_eq!(first, second);
        assert_eq!(first.remaining, 8);
    }

    #[test]
    fn append_decreases_remaining_by_cost() {
        let mut ledger = Ledger::new(PaidMode::Experience);
        let before = ExperienceBalance::from_ledger(20, &ledger).remaining;
        ledger
            .append(entry(PaidMode::Experience, TraitCategory::Attributes, "Wits", 12))
            .unwrap();
        let after = ExperienceBalance::from_ledger(20, &ledger).remaining;
        assert_eq!(before - after, 12);
    }

    #[test]
    fn flaw_bonus_is_excluded_from_spend_and_capped() {
        let mut ledger = Ledger::new(PaidMode::Freebie);
        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Flaws, "Nightmares", -4))
            .unwrap();
        let balance = FreebieBalance::from_ledger(&ledger);
        assert_eq!(balance.spent, 0);
        assert_eq!(balance.bonus, 4);
        assert_eq!(balance.remaining, 19);

        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Flaws, "Phobia", -5))
            .unwrap();
        let balance = FreebieBalance::from_ledger(&ledger);
        assert_eq!(ledger.flaw_bonus(), 9);
        assert_eq!(balance.bonus, FLAW_BONUS_CAP);
        assert_eq!(balance.remaining, 22);
        assert_eq!(balance.available(), 22);
    }

    #[test]
    fn breakdown_groups_by_category_tag() {
        let mut ledger = Ledger::new(PaidMode::Freebie);
        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Abilities, "Brawl", 2))
            .unwrap();
        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Abilities, "Occult", 4))
            .unwrap();
        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Merits, "Iron Will", 3))
            .unwrap();

        let breakdown = ledger.breakdown();
        assert_eq!(breakdown.get(&TraitCategory::Abilities), Some(&6));
        assert_eq!(breakdown.get(&TraitCategory::Merits), Some(&3));
    }

    #[test]
    fn experience_ledger_refuses_negative_cost() {
        let mut ledger = Ledger::new(PaidMode::Experience);
        let err = ledger
            .append(entry(PaidMode::Experience, TraitCategory::Flaws, "Phobia", -2))
            .unwrap_err();
        assert!(err.is_fault());
        assert!(ledger.is_empty());
    }

    #[test]
    fn ledger_refuses_entries_from_other_mode() {
        let mut ledger = Ledger::new(PaidMode::Experience);
        let result = ledger.append(entry(PaidMode::Freebie, TraitCategory::Virtues, "Courage", 2));
        assert!(result.is_err());
    }

    #[test]
    fn ledger_serializes_with_mode_and_entries() {
        let mut ledger = Ledger::new(PaidMode::Freebie);
        ledger
            .append(entry(PaidMode::Freebie, TraitCategory::Willpower, "willpower", 1))
            .unwrap();
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["mode"], "freebie");
        assert_eq!(json["entries"][0]["traitKey"], "willpower");

        let parsed: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, ledger);
    }
}
