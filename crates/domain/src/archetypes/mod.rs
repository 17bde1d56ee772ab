//! Archetype rule sets.
//!
//! Each archetype implements [`ArchetypeTemplate`]; the engine only ever sees
//! the trait object it gets back from [`ArchetypeRegistry`].
//!
//! # Supported Archetypes
//!
//! - Mortal (`mortal`)
//! - Ghoul, including Revenant families (`ghoul`)
//! - Animal, optionally ghouled (`animal`)

mod animal;
mod ghoul;
mod mortal;
mod rules;
mod traits;

pub use animal::AnimalTemplate;
pub use ghoul::GhoulTemplate;
pub use mortal::MortalTemplate;
pub use rules::{
    price_change, validate_change, CreationLimits, DisciplineRate, FreebieRates, RuleBook,
    XpRates, DOT_MAX, MERIT_FLAW_MAX, TRACK_MAX,
};
pub use traits::{ArchetypeTemplate, Cost, FeatureSet, ValidationInput, Verdict};

use std::sync::Arc;

use crate::entities::ArchetypeKind;
use crate::error::DomainError;

/// Registry of available archetype templates.
pub struct ArchetypeRegistry {
    templates: Vec<Arc<dyn ArchetypeTemplate>>,
}

impl Default for ArchetypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchetypeRegistry {
    /// Create a registry with all built-in templates.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(MortalTemplate::new()));
        registry.register(Arc::new(GhoulTemplate::new()));
        registry.register(Arc::new(AnimalTemplate::new()));
        registry
    }

    /// Create an empty registry without built-in templates.
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Register a template, replacing any previous one for the same archetype.
    pub fn register(&mut self, template: Arc<dyn ArchetypeTemplate>) {
        self.templates.retain(|t| t.kind() != template.kind());
        self.templates.push(template);
    }

    pub fn get(&self, kind: ArchetypeKind) -> Option<Arc<dyn ArchetypeTemplate>> {
        self.templates.iter().find(|t| t.kind() == kind).cloned()
    }

    /// Like [`get`](Self::get), but a missing template is a configuration fault.
    pub fn require(&self, kind: ArchetypeKind) -> Result<Arc<dyn ArchetypeTemplate>, DomainError> {
        self.get(kind).ok_or_else(|| {
            DomainError::invalid_configuration(format!("no template registered for {}", kind))
        })
    }

    pub fn list(&self) -> Vec<(ArchetypeKind, &str)> {
        self.templates
            .iter()
            .map(|t| (t.kind(), t.display_name()))
            .collect()
    }
}
