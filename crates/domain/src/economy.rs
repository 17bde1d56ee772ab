//! Change pipeline: validate, price, charge, apply.
//!
//! A proposed change is validated by the record's template. In creation mode
//! an accepted change is free. In a paid mode it is priced, checked against
//! the remaining balance recomputed from the ledger, and, when it costs
//! anything, recorded as a ledger entry before the record is touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archetypes::{ArchetypeTemplate, Cost, ValidationInput, Verdict};
use crate::entities::CharacterRecord;
use crate::error::DomainError;
use crate::ledger::LedgerEntry;
use crate::priority::PriorityAssignment;
use crate::value_objects::{EconomyMode, PaidMode, TraitChange};

/// What the pipeline decided about a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum Decision {
    Accept {
        from_value: i32,
        /// Charge to record; `None` for free changes.
        entry: Option<LedgerEntry>,
    },
    Reject {
        reason: String,
    },
}

impl Decision {
    fn reject(reason: impl Into<String>) -> Self {
        Self::Reject {
            reason: reason.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Accept { .. } => None,
            Self::Reject { reason } => Some(reason),
        }
    }

    pub fn cost(&self) -> i32 {
        match self {
            Self::Accept {
                entry: Some(entry), ..
            } => entry.cost,
            _ => 0,
        }
    }
}

fn currency(mode: PaidMode) -> &'static str {
    match mode {
        PaidMode::Freebie => "freebie points",
        PaidMode::Experience => "experience",
    }
}

/// Decide a change without touching the record.
pub fn evaluate_change(
    template: &dyn ArchetypeTemplate,
    record: &CharacterRecord,
    priorities: &PriorityAssignment,
    mode: EconomyMode,
    change: &TraitChange,
    now: DateTime<Utc>,
) -> Result<Decision, DomainError> {
    let current = record.trait_value(change.category, &change.key);
    let verdict = template.validate(&ValidationInput {
        change,
        current,
        record,
        priorities,
        mode,
    })?;
    if let Verdict::Rejected(reason) = verdict {
        return Ok(Decision::reject(reason));
    }

    let Some(paid) = mode.paid() else {
        return Ok(Decision::Accept {
            from_value: current,
            entry: None,
        });
    };

    let points = match template.cost(
        paid,
        change.category,
        &change.key,
        current,
        change.new_value,
        record,
    )? {
        Cost::Points(points) => points,
        Cost::Unpurchasable(reason) => return Ok(Decision::reject(reason)),
    };

    if points == 0 {
        return Ok(Decision::Accept {
            from_value: current,
            entry: None,
        });
    }

    let remaining = record.remaining(paid);
    if points > remaining {
        return Ok(Decision::reject(format!(
            "Not enough {}: {} costs {}, {} remaining",
            currency(paid),
            change.key,
            points,
            remaining
        )));
    }

    Ok(Decision::Accept {
        from_value: current,
        entry: Some(LedgerEntry::new(paid, change, current, points, now)),
    })
}

/// Apply an accepted decision. Rejections leave the record untouched.
pub fn apply_decision(
    record: &mut CharacterRecord,
    change: &TraitChange,
    decision: &Decision,
) -> Result<(), DomainError> {
    let Decision::Accept { entry, .. } = decision else {
        return Ok(());
    };
    if let Some(entry) = entry {
        record.append_entry(entry.clone())?;
    }
    record.set_trait(change.category, &change.key, change.new_value);
    Ok(())
}

/// Evaluate and, when accepted, apply a change.
pub fn propose_change(
    template: &dyn ArchetypeTemplate,
    record: &mut CharacterRecord,
    priorities: &PriorityAssignment,
    mode: EconomyMode,
    change: &TraitChange,
    now: DateTime<Utc>,
) -> Result<Decision, DomainError> {
    let decision = evaluate_change(template, record, priorities, mode, change, now)?;
    apply_decision(record, change, &decision)?;
    Ok(decision)
}
