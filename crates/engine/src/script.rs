//! JSON edit scripts.
//!
//! A script names a character (an existing id, or a name and archetype to
//! create) and a list of steps replayed through the trait economy use cases:
//!
//! ```json
//! {
//!   "character": { "name": "Anna", "archetype": { "kind": "mortal" } },
//!   "steps": [
//!     { "step": "assignPriority", "group": "physical", "value": 6 },
//!     { "step": "change", "category": "attributes", "key": "Strength", "value": 3 },
//!     { "step": "grantExperience", "amount": 20 },
//!     { "step": "setMode", "xp": true },
//!     { "step": "change", "category": "willpower", "value": 2 }
//!   ]
//! }
//! ```
//!
//! Rejected changes are recorded and the script carries on. Malformed steps
//! (a value outside the priority spread, both mode flags) stop the run.

use nocturne_domain::{
    Archetype, CharacterId, ModeFlags, TraitCategory, TraitChange, TraitGroup,
};
use serde::{Deserialize, Serialize};

use crate::use_cases::{Balances, EditSession, TraitEconomyError, TraitEconomyUseCases};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Step {index}: {category} changes need a key")]
    MissingKey {
        index: usize,
        category: TraitCategory,
    },

    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: TraitEconomyError,
    },

    #[error(transparent)]
    Economy(#[from] TraitEconomyError),
}

/// Which character a script edits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CharacterSource {
    Open { id: CharacterId },
    Create { name: String, archetype: Archetype },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", tag = "step")]
pub enum ScriptStep {
    AssignPriority {
        group: TraitGroup,
        value: i32,
    },
    SetMode {
        #[serde(default)]
        xp: bool,
        #[serde(default)]
        freebie: bool,
    },
    Change {
        category: TraitCategory,
        /// Omitted for willpower and humanity.
        #[serde(default)]
        key: Option<String>,
        value: i32,
    },
    GrantExperience {
        amount: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    pub character: CharacterSource,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(raw: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    pub summary: String,
    pub accepted: bool,
    /// Rejection reason, or a save failure note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReport {
    pub character_id: CharacterId,
    pub name: String,
    pub steps: Vec<StepReport>,
    pub balances: Balances,
}

fn unsaved_note(persisted: bool) -> Option<String> {
    (!persisted).then(|| "not saved".to_string())
}

async fn run_step(
    use_cases: &TraitEconomyUseCases,
    session: &mut EditSession,
    index: usize,
    step: &ScriptStep,
) -> Result<StepReport, ScriptError> {
    let wrap = |source| ScriptError::Step { index, source };

    let report = match step {
        ScriptStep::AssignPriority { group, value } => {
            let assignment = use_cases
                .assign_priority(session, *group, *value)
                .map_err(wrap)?;
            StepReport {
                index,
                summary: format!("{} priority {}", group, value),
                accepted: true,
                note: assignment
                    .displaced
                    .map(|displaced| format!("{} lost its priority", displaced)),
            }
        }
        ScriptStep::SetMode { xp, freebie } => {
            let mode = use_cases
                .set_mode(
                    session,
                    ModeFlags {
                        xp: *xp,
                        freebie: *freebie,
                    },
                )
                .map_err(wrap)?;
            StepReport {
                index,
                summary: format!("mode {}", mode),
                accepted: true,
                note: None,
            }
        }
        ScriptStep::Change {
            category,
            key,
            value,
        } => {
            let change = match (category.is_scalar(), key) {
                (true, _) => TraitChange::scalar(*category, *value),
                (false, Some(key)) => TraitChange::new(*category, key.as_str(), *value),
                (false, None) => {
                    return Err(ScriptError::MissingKey {
                        index,
                        category: *category,
                    })
                }
            };
            let summary = change.to_string();
            let outcome = use_cases
                .propose_change(session, change)
                .await
                .map_err(wrap)?;
            let accepted = outcome.decision.is_accepted();
            let note = match outcome.decision.reason() {
                Some(reason) => Some(reason.to_string()),
                None => unsaved_note(outcome.persisted),
            };
            StepReport {
                index,
                summary,
                accepted,
                note,
            }
        }
        ScriptStep::GrantExperience { amount } => {
            let grant = use_cases
                .grant_experience(session, *amount)
                .await
                .map_err(wrap)?;
            StepReport {
                index,
                summary: format!("+{} experience (total {})", amount, grant.total),
                accepted: true,
                note: unsaved_note(grant.persisted),
            }
        }
    };
    Ok(report)
}

/// Replay a script and report every step plus the final balances.
pub async fn run_script(
    use_cases: &TraitEconomyUseCases,
    script: &Script,
) -> Result<ScriptReport, ScriptError> {
    let mut session = match &script.character {
        CharacterSource::Open { id } => use_cases.open(*id).await?,
        CharacterSource::Create { name, archetype } => {
            use_cases.start(name, archetype.clone()).await?
        }
    };

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let report = run_step(use_cases, &mut session, index, step).await?;
        tracing::debug!(
            index,
            summary = %report.summary,
            accepted = report.accepted,
            "Script step"
        );
        steps.push(report);
    }

    Ok(ScriptReport {
        character_id: session.record.id,
        name: session.record.name.clone(),
        steps,
        balances: use_cases.balances(&session),
    })
}
