//! Access levels and the tiers that grant them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TierError;

/// Coarse access band for one module. Ordered: `None < View < Manage < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    None,
    View,
    Manage,
    Admin,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::None, Level::View, Level::Manage, Level::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::None => "none",
            Level::View => "view",
            Level::Manage => "manage",
            Level::Admin => "admin",
        }
    }

    /// Tiers enabled by this level, lowest first
    pub fn tiers(self) -> &'static [Tier] {
        match self {
            Level::None => &[],
            Level::View => &[Tier::View],
            Level::Manage => &[Tier::View, Tier::Manage],
            Level::Admin => &[Tier::View, Tier::Manage, Tier::Admin],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Level::None),
            "view" => Ok(Level::View),
            "manage" => Ok(Level::Manage),
            "admin" => Ok(Level::Admin),
            _ => Err(TierError::UnknownLevel(s.to_string())),
        }
    }
}

/// One of the three key lists of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    View,
    Manage,
    Admin,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::View, Tier::Manage, Tier::Admin];
}

impl From<Tier> for Level {
    fn from(t: Tier) -> Self {
        match t {
            Tier::View => Level::View,
            Tier::Manage => Level::Manage,
            Tier::Admin => Level::Admin,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Level::from(*self), f)
    }
}
