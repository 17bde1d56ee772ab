//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character storage (SQLite today, anything document-shaped later)
//! - Notifications (tracing today, a UI toast sink later)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::CharacterRecordRepo;
#[cfg(test)]
pub use repos::MockCharacterRecordRepo;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{Notification, NotificationPort, Severity};
#[cfg(test)]
pub use external::MockNotificationPort;

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
