//! Enumeration types for constrained API values.

use serde::{Deserialize, Serialize};

/// Whether a campaign is currently serving.
///
/// The form renders this as a single checkbox: checked means
/// [`CampaignStatus::Active`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// Campaign is running.
    #[default]
    Active,
    /// Campaign is on hold.
    Paused,
}

impl CampaignStatus {
    /// Maps a checkbox state onto a status.
    #[inline]
    #[must_use]
    pub const fn from_checked(checked: bool) -> Self {
        if checked { Self::Active } else { Self::Paused }
    }

    /// Returns `true` for [`CampaignStatus::Active`].
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns the opposite status.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self::from_checked(!self.is_active())
    }

    /// Returns the wire literal.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

impl core::fmt::Display for CampaignStatus {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for CampaignStatus {
    type Err = ();

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            _ => Err(()),
        }
    }
}
