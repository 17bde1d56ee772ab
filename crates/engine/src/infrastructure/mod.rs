//! Infrastructure layer - external dependency implementations.
//!
//! Contains port traits and their implementations (adapters).

pub mod character_store;
pub mod clock;
pub mod config;
pub mod notifier;
pub mod ports;
pub mod resilient_store;
