//! Value objects shared across the trait economy.

mod economy_mode;
mod trait_category;
mod trait_change;

pub use economy_mode::{EconomyMode, ModeFlags, PaidMode};
pub use trait_category::TraitCategory;
pub use trait_change::TraitChange;
