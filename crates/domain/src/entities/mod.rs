//! Domain entities.

mod archetype;
mod character_record;

pub use archetype::{Archetype, ArchetypeKind, GhoulType, RevenantFamily};
pub use character_record::{CharacterRecord, ExperiencePool, TraitDefaults, TraitMap};
