//! Trait economy domain: character records, archetype rules, priority
//! allocation and the freebie/experience ledgers.
//!
//! Nothing in this crate performs I/O. Persistence, notifications and clocks
//! are ports owned by `nocturne-engine`.

pub mod archetypes;
pub mod catalog;
pub mod economy;
pub mod entities;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod priority;
pub mod value_objects;

pub use error::DomainError;

// Re-export ID types
pub use ids::{CharacterId, LedgerEntryId};

// Re-export the archetype registry and template contract
pub use archetypes::{
    AnimalTemplate, ArchetypeRegistry, ArchetypeTemplate, Cost, FeatureSet, GhoulTemplate,
    MortalTemplate, RuleBook, ValidationInput, Verdict,
};

pub use catalog::{PriorityCategory, TraitGroup};

pub use economy::{apply_decision, evaluate_change, propose_change, Decision};

pub use entities::{
    Archetype, ArchetypeKind, CharacterRecord, ExperiencePool, GhoulType, RevenantFamily,
    TraitDefaults, TraitMap,
};

pub use ledger::{
    ExperienceBalance, FreebieBalance, Ledger, LedgerEntry, FLAW_BONUS_CAP, FREEBIE_BASE,
};

pub use priority::{Assignment, Overspend, PriorityAssignment, PriorityError, PrioritySpreads};

pub use value_objects::{EconomyMode, ModeFlags, PaidMode, TraitCategory, TraitChange};
