//! Use cases - user story orchestration.

pub mod trait_economy;

pub use trait_economy::{
    Balances, ChangeOutcome, EditSession, GrantOutcome, TraitEconomyError, TraitEconomyUseCases,
};
