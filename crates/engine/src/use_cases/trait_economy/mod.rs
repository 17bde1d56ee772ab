//! Trait economy use cases.
//!
//! An [`EditSession`] is the explicit state of one open character sheet: the
//! record, the priority assignment and the active economy mode. Use cases
//! take the session by reference instead of keeping it in the service, so a
//! caller can hold as many sessions as it has open sheets.
//!
//! Persistence is the only async step. A change is applied in memory first,
//! then saved; a failed save is reported but never undoes the change.

mod error;

pub use error::TraitEconomyError;

use std::sync::Arc;

use nocturne_domain::{
    economy, Archetype, ArchetypeRegistry, ArchetypeTemplate, Assignment, CharacterId,
    CharacterRecord, Decision, EconomyMode, ExperienceBalance, FreebieBalance, ModeFlags,
    PriorityAssignment, TraitChange, TraitGroup,
};
use serde::Serialize;

use crate::infrastructure::ports::{
    CharacterRecordRepo, ClockPort, Notification, NotificationPort,
};

// =============================================================================
// Session and Result Types
// =============================================================================

/// State of one open character sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub record: CharacterRecord,
    pub priorities: PriorityAssignment,
    pub mode: EconomyMode,
}

impl EditSession {
    pub fn new(record: CharacterRecord) -> Self {
        Self {
            record,
            priorities: PriorityAssignment::new(),
            mode: EconomyMode::Creation,
        }
    }
}

/// Result of proposing a trait change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutcome {
    pub decision: Decision,
    /// Whether the resulting snapshot reached the store. Always false for rejections.
    pub persisted: bool,
}

/// Result of granting experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantOutcome {
    pub total: i32,
    pub persisted: bool,
}

/// Both point pools, recomputed from the ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub freebie: FreebieBalance,
    pub experience: ExperienceBalance,
}

// =============================================================================
// Use Cases
// =============================================================================

/// Container for trait economy use cases.
pub struct TraitEconomyUseCases {
    registry: Arc<ArchetypeRegistry>,
    repo: Arc<dyn CharacterRecordRepo>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
}

impl TraitEconomyUseCases {
    pub fn new(
        registry: Arc<ArchetypeRegistry>,
        repo: Arc<dyn CharacterRecordRepo>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            registry,
            repo,
            notifier,
            clock,
        }
    }

    fn template_for(
        &self,
        record: &CharacterRecord,
    ) -> Result<Arc<dyn ArchetypeTemplate>, TraitEconomyError> {
        Ok(self.registry.require(record.archetype.kind())?)
    }

    /// Save a snapshot. Failures are logged and notified, never returned.
    async fn persist(&self, record: &CharacterRecord) -> bool {
        match self.repo.save(record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    character_id = %record.id,
                    error = %e,
                    "Failed to save character record"
                );
                self.notifier.notify(Notification::error(format!(
                    "Could not save {}: {}",
                    record.name, e
                )));
                false
            }
        }
    }

    /// Create a character from its archetype template and open a session on it.
    pub async fn start(
        &self,
        name: &str,
        archetype: Archetype,
    ) -> Result<EditSession, TraitEconomyError> {
        let template = self.registry.require(archetype.kind())?;
        let record = template.new_record(name, archetype)?;
        tracing::info!(
            character_id = %record.id,
            archetype = %record.archetype.kind(),
            "Created character record"
        );
        self.persist(&record).await;
        Ok(EditSession::new(record))
    }

    /// Open a session on a stored character.
    pub async fn open(&self, id: CharacterId) -> Result<EditSession, TraitEconomyError> {
        let record = self
            .repo
            .get(id)
            .await?
            .ok_or(TraitEconomyError::CharacterNotFound(id))?;
        self.template_for(&record)?;
        Ok(EditSession::new(record))
    }

    pub async fn list(&self) -> Result<Vec<CharacterRecord>, TraitEconomyError> {
        Ok(self.repo.list().await?)
    }

    pub async fn delete(&self, id: CharacterId) -> Result<(), TraitEconomyError> {
        match self.repo.delete(id).await {
            Ok(()) => {
                tracing::info!(character_id = %id, "Deleted character record");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(TraitEconomyError::CharacterNotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Bind a spread value to a trait group.
    ///
    /// A group that held the value before loses its priority; the caller is
    /// told through an info notification.
    pub fn assign_priority(
        &self,
        session: &mut EditSession,
        group: TraitGroup,
        value: i32,
    ) -> Result<Assignment, TraitEconomyError> {
        let spreads = self.template_for(&session.record)?.priority_spreads();
        let assignment = session.priorities.assign(&spreads, group, value)?;
        tracing::debug!(
            character_id = %session.record.id,
            group = %group,
            value,
            "Assigned priority"
        );
        if let Some(displaced) = assignment.displaced {
            self.notifier.notify(Notification::info(format!(
                "{} took priority {} from {}",
                group, value, displaced
            )));
        }
        for over in session
            .priorities
            .overspent(&session.record, group.category())
        {
            let message = match over.ceiling {
                Some(ceiling) => format!(
                    "{} holds {} dots but its priority is now {}",
                    over.group, over.spent, ceiling
                ),
                None => format!(
                    "{} holds {} dots but has no priority",
                    over.group, over.spent
                ),
            };
            tracing::warn!(
                character_id = %session.record.id,
                group = %over.group,
                spent = over.spent,
                ceiling = ?over.ceiling,
                "Priority ceiling below current spend"
            );
            self.notifier.notify(Notification::warning(message));
        }
        Ok(assignment)
    }

    /// Switch economy using checkbox-style flags.
    pub fn set_mode(
        &self,
        session: &mut EditSession,
        flags: ModeFlags,
    ) -> Result<EconomyMode, TraitEconomyError> {
        let mode = EconomyMode::try_from(flags)?;
        if mode != session.mode {
            tracing::debug!(
                character_id = %session.record.id,
                from = %session.mode,
                to = %mode,
                "Economy mode changed"
            );
        }
        session.mode = mode;
        Ok(mode)
    }

    /// Run a change through the pipeline and save the record when accepted.
    pub async fn propose_change(
        &self,
        session: &mut EditSession,
        change: TraitChange,
    ) -> Result<ChangeOutcome, TraitEconomyError> {
        let template = self.template_for(&session.record)?;
        let decision = economy::propose_change(
            template.as_ref(),
            &mut session.record,
            &session.priorities,
            session.mode,
            &change,
            self.clock.now(),
        )
        .map_err(|e| {
            tracing::error!(
                character_id = %session.record.id,
                category = %change.category,
                key = %change.key,
                error = %e,
                "Trait change refused by template"
            );
            e
        })?;

        match &decision {
            Decision::Reject { reason } => {
                tracing::debug!(
                    character_id = %session.record.id,
                    category = %change.category,
                    key = %change.key,
                    reason = %reason,
                    "Trait change rejected"
                );
                self.notifier.notify(Notification::warning(reason.clone()));
                Ok(ChangeOutcome {
                    decision,
                    persisted: false,
                })
            }
            Decision::Accept { from_value, .. } => {
                tracing::info!(
                    character_id = %session.record.id,
                    category = %change.category,
                    key = %change.key,
                    from = *from_value,
                    to = change.new_value,
                    cost = decision.cost(),
                    mode = %session.mode,
                    "Trait change accepted"
                );
                let persisted = self.persist(&session.record).await;
                Ok(ChangeOutcome {
                    decision,
                    persisted,
                })
            }
        }
    }

    /// Add experience earned in play.
    pub async fn grant_experience(
        &self,
        session: &mut EditSession,
        amount: i32,
    ) -> Result<GrantOutcome, TraitEconomyError> {
        let total = session.record.grant_experience(amount)?;
        tracing::info!(
            character_id = %session.record.id,
            amount,
            total,
            "Granted experience"
        );
        let persisted = self.persist(&session.record).await;
        Ok(GrantOutcome { total, persisted })
    }

    pub fn balances(&self, session: &EditSession) -> Balances {
        Balances {
            freebie: session.record.freebie_balance(),
            experience: session.record.experience_balance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nocturne_domain::{
        DomainError, GhoulType, MortalTemplate, PriorityError, RevenantFamily, TraitCategory,
    };

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockCharacterRecordRepo, MockNotificationPort, RepoError, Severity};

    fn use_cases(
        repo: MockCharacterRecordRepo,
        notifier: MockNotificationPort,
    ) -> TraitEconomyUseCases {
        TraitEconomyUseCases::new(
            Arc::new(ArchetypeRegistry::new()),
            Arc::new(repo),
            Arc::new(notifier),
            Arc::new(FixedClock(Utc::now())),
        )
    }

    fn saving_repo() -> MockCharacterRecordRepo {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_save().returning(|_| Ok(()));
        repo
    }

    fn silent() -> MockNotificationPort {
        let mut notifier = MockNotificationPort::new();
        notifier.expect_notify().never();
        notifier
    }

    fn mortal_session() -> EditSession {
        EditSession::new(
            MortalTemplate::new()
                .new_record("Anna", Archetype::Mortal)
                .unwrap(),
        )
    }

    fn attr(key: &str, value: i32) -> TraitChange {
        TraitChange::new(TraitCategory::Attributes, key, value)
    }

    #[tokio::test]
    async fn start_seeds_and_saves_the_record() {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_save()
            .withf(|record| record.disciplines.get("Potence") == Some(&1))
            .times(1)
            .returning(|_| Ok(()));
        let use_cases = use_cases(repo, silent());

        let session = use_cases
            .start(
                "Renfield",
                Archetype::Ghoul {
                    ghoul_type: GhoulType::Revenant(RevenantFamily::Zantosa),
                },
            )
            .await
            .unwrap();
        assert_eq!(session.mode, EconomyMode::Creation);
        assert_eq!(session.record.blood_pool, 10);
    }

    #[tokio::test]
    async fn open_missing_character_is_not_found() {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        let use_cases = use_cases(repo, silent());

        let id = CharacterId::new();
        let err = use_cases.open(id).await.unwrap_err();
        assert!(matches!(err, TraitEconomyError::CharacterNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn open_returns_stored_record_in_creation_mode() {
        let mut stored = mortal_session().record;
        stored.grant_experience(5).unwrap();
        let id = stored.id;
        let expected = stored.clone();
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_get()
            .withf(move |requested| *requested == id)
            .returning(move |_| Ok(Some(stored.clone())));
        let use_cases = use_cases(repo, silent());

        let session = use_cases.open(id).await.unwrap();
        assert_eq!(session.record, expected);
        assert_eq!(session.mode, EconomyMode::Creation);
        assert!(!session.priorities.is_complete(nocturne_domain::PriorityCategory::Attributes));
    }

    #[tokio::test]
    async fn rejected_change_notifies_and_does_not_save() {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_save().never();
        let mut notifier = MockNotificationPort::new();
        notifier
            .expect_notify()
            .withf(|n| {
                n.severity == Severity::Warning && n.message == "Select a priority for Physical attributes first"
            })
            .times(1)
            .return_const(());
        let use_cases = use_cases(repo, notifier);
        let mut session = mortal_session();

        let outcome = use_cases
            .propose_change(&mut session, attr("Strength", 2))
            .await
            .unwrap();
        assert!(!outcome.decision.is_accepted());
        assert!(!outcome.persisted);
        assert_eq!(session.record.trait_value(TraitCategory::Attributes, "Strength"), 1);
    }

    #[tokio::test]
    async fn accepted_change_is_saved() {
        let use_cases = use_cases(saving_repo(), silent());
        let mut session = mortal_session();
        use_cases
            .assign_priority(&mut session, TraitGroup::Physical, 6)
            .unwrap();

        let outcome = use_cases
            .propose_change(&mut session, attr("Strength", 3))
            .await
            .unwrap();
        assert!(outcome.decision.is_accepted());
        assert!(outcome.persisted);
        assert_eq!(session.record.trait_value(TraitCategory::Attributes, "Strength"), 3);
    }

    #[tokio::test]
    async fn save_failure_keeps_the_change_and_reports_an_error() {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_save()
            .times(1)
            .returning(|_| Err(RepoError::database("save", "database is locked")));
        let mut notifier = MockNotificationPort::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Error && n.message.starts_with("Could not save Anna"))
            .times(1)
            .return_const(());
        let use_cases = use_cases(repo, notifier);
        let mut session = mortal_session();
        session.mode = EconomyMode::Freebie;

        let outcome = use_cases
            .propose_change(&mut session, attr("Wits", 2))
            .await
            .unwrap();
        assert!(outcome.decision.is_accepted());
        assert!(!outcome.persisted);
        assert_eq!(session.record.trait_value(TraitCategory::Attributes, "Wits"), 2);
        assert_eq!(use_cases.balances(&session).freebie.remaining, 10);
    }

    #[tokio::test]
    async fn taking_a_held_priority_notifies_the_displacement() {
        let mut notifier = MockNotificationPort::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Info && n.message == "Physical took priority 6 from Mental")
            .times(1)
            .return_const(());
        let use_cases = use_cases(MockCharacterRecordRepo::new(), notifier);
        let mut session = mortal_session();

        use_cases
            .assign_priority(&mut session, TraitGroup::Mental, 6)
            .unwrap();
        let assignment = use_cases
            .assign_priority(&mut session, TraitGroup::Physical, 6)
            .unwrap();
        assert_eq!(assignment.displaced, Some(TraitGroup::Mental));
        assert_eq!(session.priorities.ceiling_for(TraitGroup::Mental), None);
    }

    #[test]
    fn lowering_a_spent_priority_warns() {
        let mut notifier = MockNotificationPort::new();
        notifier
            .expect_notify()
            .withf(|n| {
                n.severity == Severity::Warning
                    && n.message == "Physical holds 6 dots but its priority is now 3"
            })
            .times(1)
            .return_const(());
        let use_cases = use_cases(MockCharacterRecordRepo::new(), notifier);
        let mut session = mortal_session();

        use_cases
            .assign_priority(&mut session, TraitGroup::Physical, 6)
            .unwrap();
        session.record.set_trait(TraitCategory::Attributes, "Strength", 4);
        session.record.set_trait(TraitCategory::Attributes, "Dexterity", 4);

        let assignment = use_cases
            .assign_priority(&mut session, TraitGroup::Physical, 3)
            .unwrap();
        assert_eq!(assignment.previous, Some(6));
        assert_eq!(session.priorities.ceiling_for(TraitGroup::Physical), Some(3));
        assert_eq!(session.record.group_spend(TraitGroup::Physical), 6);
    }

    #[test]
    fn priority_outside_spread_is_an_error() {
        let use_cases = use_cases(MockCharacterRecordRepo::new(), silent());
        let mut session = mortal_session();
        let err = use_cases
            .assign_priority(&mut session, TraitGroup::Skills, 6)
            .unwrap_err();
        assert!(matches!(
            err,
            TraitEconomyError::Priority(PriorityError::NotInSpread { value: 6, .. })
        ));
    }

    #[test]
    fn both_mode_flags_is_an_error() {
        let use_cases = use_cases(MockCharacterRecordRepo::new(), silent());
        let mut session = mortal_session();
        let err = use_cases
            .set_mode(
                &mut session,
                ModeFlags {
                    xp: true,
                    freebie: true,
                },
            )
            .unwrap_err();
        assert!(matches!(err, TraitEconomyError::Domain(DomainError::Validation(_))));
        assert_eq!(session.mode, EconomyMode::Creation);

        let mode = use_cases
            .set_mode(
                &mut session,
                ModeFlags {
                    xp: true,
                    freebie: false,
                },
            )
            .unwrap();
        assert_eq!(mode, EconomyMode::Experience);
    }

    #[tokio::test]
    async fn experience_purchase_after_grant() {
        let use_cases = use_cases(saving_repo(), silent());
        let mut session = mortal_session();

        let grant = use_cases.grant_experience(&mut session, 20).await.unwrap();
        assert_eq!(grant.total, 20);
        assert!(grant.persisted);

        session.mode = EconomyMode::Experience;
        let outcome = use_cases
            .propose_change(&mut session, attr("Charisma", 2))
            .await
            .unwrap();
        assert_eq!(outcome.decision.cost(), 8);

        let balances = use_cases.balances(&session);
        assert_eq!(balances.experience.spent, 8);
        assert_eq!(balances.experience.remaining, 12);
        assert_eq!(balances.freebie.remaining, 15);
    }

    #[tokio::test]
    async fn non_positive_grant_is_an_error() {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_save().never();
        let use_cases = use_cases(repo, silent());
        let mut session = mortal_session();

        let err = use_cases.grant_experience(&mut session, 0).await.unwrap_err();
        assert!(matches!(err, TraitEconomyError::Domain(_)));
        assert_eq!(session.record.experience.total, 0);
    }

    #[tokio::test]
    async fn category_outside_template_is_a_fault() {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_save().never();
        let use_cases = use_cases(repo, silent());
        let mut session = mortal_session();
        session.mode = EconomyMode::Freebie;

        let err = use_cases
            .propose_change(
                &mut session,
                TraitChange::new(TraitCategory::Disciplines, "Dominate", 1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TraitEconomyError::Domain(e) if e.is_fault()));
        assert!(session.record.disciplines.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_character_is_not_found() {
        let mut repo = MockCharacterRecordRepo::new();
        repo.expect_delete()
            .returning(|id| Err(RepoError::not_found("CharacterRecord", id)));
        let use_cases = use_cases(repo, silent());

        let err = use_cases.delete(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, TraitEconomyError::CharacterNotFound(_)));
    }
}
