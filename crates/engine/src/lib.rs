//! Nocturne Engine library.
//!
//! Runs edit sessions over the trait economy domain and persists the results.
//!
//! ## Structure
//!
//! - `use_cases/` - Edit session orchestration (priorities, modes, changes)
//! - `infrastructure/` - Ports plus the SQLite, tracing and clock adapters
//! - `script` - JSON script runner used by the binary
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod script;
pub mod use_cases;

pub use app::App;
