//! Economy mode value objects.
//!
//! A session is always in exactly one mode. Sheets historically carried two
//! independent checkboxes (`xp`, `freebie`); [`ModeFlags`] accepts that shape
//! and refuses the combination where both are ticked.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Which point economy governs trait changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomyMode {
    /// Priority allocation; changes are free but bounded by ceilings and creation caps.
    #[default]
    Creation,
    /// Flat-rate bonus points spent while finishing a character.
    Freebie,
    /// Post-creation advancement, one dot per purchase.
    Experience,
}

impl EconomyMode {
    /// The paid economy for this mode, if any.
    pub fn paid(&self) -> Option<PaidMode> {
        match self {
            Self::Creation => None,
            Self::Freebie => Some(PaidMode::Freebie),
            Self::Experience => Some(PaidMode::Experience),
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(self, Self::Creation)
    }
}

impl fmt::Display for EconomyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creation => write!(f, "creation"),
            Self::Freebie => write!(f, "freebie"),
            Self::Experience => write!(f, "experience"),
        }
    }
}

/// A mode in which changes are charged against a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaidMode {
    Freebie,
    Experience,
}

impl From<PaidMode> for EconomyMode {
    fn from(mode: PaidMode) -> Self {
        match mode {
            PaidMode::Freebie => EconomyMode::Freebie,
            PaidMode::Experience => EconomyMode::Experience,
        }
    }
}

impl fmt::Display for PaidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        EconomyMode::from(*self).fmt(f)
    }
}

/// Checkbox-style mode flags as sent by a sheet form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeFlags {
    #[serde(default)]
    pub xp: bool,
    #[serde(default)]
    pub freebie: bool,
}

impl TryFrom<ModeFlags> for EconomyMode {
    type Error = DomainError;

    fn try_from(flags: ModeFlags) -> Result<Self, Self::Error> {
        match (flags.xp, flags.freebie) {
            (false, false) => Ok(EconomyMode::Creation),
            (true, false) => Ok(EconomyMode::Experience),
            (false, true) => Ok(EconomyMode::Freebie),
            (true, true) => Err(DomainError::validation(
                "experience and freebie modes cannot both be active",
            )),
        }
    }
}

impl From<EconomyMode> for ModeFlags {
    fn from(mode: EconomyMode) -> Self {
        Self {
            xp: mode == EconomyMode::Experience,
            freebie: mode == EconomyMode::Freebie,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_modes() {
        let none = ModeFlags::default();
        assert_eq!(EconomyMode::try_from(none), Ok(EconomyMode::Creation));

        let xp = ModeFlags { xp: true, freebie: false };
        assert_eq!(EconomyMode::try_from(xp), Ok(EconomyMode::Experience));

        let freebie = ModeFlags { xp: false, freebie: true };
        assert_eq!(EconomyMode::try_from(freebie), Ok(EconomyMode::Freebie));
    }

    #[test]
    fn both_flags_rejected() {
        let both = ModeFlags { xp: true, freebie: true };
        assert!(EconomyMode::try_from(both).is_err());
    }

    #[test]
    fn paid_mode_projection() {
        assert_eq!(EconomyMode::Creation.paid(), None);
        assert_eq!(EconomyMode::Freebie.paid(), Some(PaidMode::Freebie));
        assert_eq!(EconomyMode::Experience.paid(), Some(PaidMode::Experience));
        assert_eq!(ModeFlags::from(EconomyMode::Experience), ModeFlags { xp: true, freebie: false });
    }
}
