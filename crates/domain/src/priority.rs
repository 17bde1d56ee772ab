//! Priority allocator.
//!
//! During creation each value of a template's spread (e.g. 6/4/3 for
//! Attributes) is bound to exactly one group of that category. The bound
//! value is the group's ceiling: the most dots above the floor its traits
//! may hold. Unbound groups have no ceiling, and nothing can be spent in them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::catalog::{PriorityCategory, TraitGroup};
use crate::entities::CharacterRecord;

/// The budget values a template allows per category, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritySpreads {
    pub attributes: [i32; 3],
    pub abilities: [i32; 3],
}

impl PrioritySpreads {
    pub fn for_category(&self, category: PriorityCategory) -> [i32; 3] {
        match category {
            PriorityCategory::Attributes => self.attributes,
            PriorityCategory::Abilities => self.abilities,
        }
    }

    pub fn allows(&self, category: PriorityCategory, value: i32) -> bool {
        self.for_category(category).contains(&value)
    }
}

/// Errors from priority assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriorityError {
    #[error("{value} is not a {category} priority (choose one of {spread:?})")]
    NotInSpread {
        category: PriorityCategory,
        value: i32,
        spread: [i32; 3],
    },

    #[error("{group} has no priority assigned")]
    NotPrioritized { group: TraitGroup },
}

/// Outcome of a successful [`PriorityAssignment::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub group: TraitGroup,
    pub value: i32,
    /// Group that held `value` before and is now unbound.
    pub displaced: Option<TraitGroup>,
    /// Value `group` held before, now free for another group.
    pub previous: Option<i32>,
}

/// A group whose spent dots no longer fit its binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overspend {
    pub group: TraitGroup,
    pub spent: i32,
    /// `None` when the group lost its priority.
    pub ceiling: Option<i32>,
}

/// Per-session binding of spread values to groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityAssignment {
    #[serde(default)]
    attributes: BTreeMap<TraitGroup, i32>,
    #[serde(default)]
    abilities: BTreeMap<TraitGroup, i32>,
}

impl PriorityAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    fn bindings(&self, category: PriorityCategory) -> &BTreeMap<TraitGroup, i32> {
        match category {
            PriorityCategory::Attributes => &self.attributes,
            PriorityCategory::Abilities => &self.abilities,
        }
    }

    fn bindings_mut(&mut self, category: PriorityCategory) -> &mut BTreeMap<TraitGroup, i32> {
        match category {
            PriorityCategory::Attributes => &mut self.attributes,
            PriorityCategory::Abilities => &mut self.abilities,
        }
    }

    /// Bind `value` to `group`.
    ///
    /// The group's previous value is released first. If another group of the
    /// same category held `value`, that group is unbound so no two groups
    /// ever share a ceiling.
    ///
    /// Dots already spent are left alone. Rebinding to a smaller value, or
    /// unbinding a group that holds dots, can leave spend above the ceiling;
    /// [`overspent`](Self::overspent) reports those groups.
    pub fn assign(
        &mut self,
        spreads: &PrioritySpreads,
        group: TraitGroup,
        value: i32,
    ) -> Result<Assignment, PriorityError> {
        let category = group.category();
        if !spreads.allows(category, value) {
            return Err(PriorityError::NotInSpread {
                category,
                value,
                spread: spreads.for_category(category),
            });
        }

        let bindings = self.bindings_mut(category);
        let previous = bindings.remove(&group);
        let displaced = bindings
            .iter()
            .find(|(_, bound)| **bound == value)
            .map(|(other, _)| *other);
        if let Some(other) = displaced {
            bindings.remove(&other);
        }
        bindings.insert(group, value);

        Ok(Assignment {
            group,
            value,
            displaced,
            previous,
        })
    }

    /// Unbind a group, returning the value it held.
    pub fn clear(&mut self, group: TraitGroup) -> Result<i32, PriorityError> {
        self.bindings_mut(group.category())
            .remove(&group)
            .ok_or(PriorityError::NotPrioritized { group })
    }

    /// Dots the group may hold above its floor, if a priority is bound.
    pub fn ceiling_for(&self, group: TraitGroup) -> Option<i32> {
        self.bindings(group.category()).get(&group).copied()
    }

    /// Group currently holding `value` in `category`.
    pub fn group_for_value(&self, category: PriorityCategory, value: i32) -> Option<TraitGroup> {
        self.bindings(category)
            .iter()
            .find(|(_, bound)| **bound == value)
            .map(|(group, _)| *group)
    }

    /// Groups of `category` holding more dots than their binding allows.
    pub fn overspent(&self, record: &CharacterRecord, category: PriorityCategory) -> Vec<Overspend> {
        category
            .groups()
            .into_iter()
            .filter_map(|group| {
                let spent = record.group_spend(group);
                let ceiling = self.ceiling_for(group);
                let over = match ceiling {
                    Some(ceiling) => spent > ceiling,
                    None => spent > 0,
                };
                over.then_some(Overspend {
                    group,
                    spent,
                    ceiling,
                })
            })
            .collect()
    }

    /// Whether every group in the category has a priority.
    pub fn is_complete(&self, category: PriorityCategory) -> bool {
        category
            .groups()
            .iter()
            .all(|group| self.bindings(category).contains_key(group))
    }
}
