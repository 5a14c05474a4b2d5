//! Advertising campaign model.

use serde::{Deserialize, Deserializer, Serialize};

use super::{CampaignId, CampaignStatus};

/// A single advertising campaign as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Server-assigned identifier.
    pub id: CampaignId,
    /// Display name.
    pub name: String,
    /// Comma-separated keywords, kept verbatim.
    pub keywords: String,
    /// Bid per impression (at least 1).
    pub bid_amount: f64,
    /// Funds allocated to the campaign (at least 1).
    pub campaign_fund: f64,
    /// Serving status.
    pub status: CampaignStatus,
    /// Target town, if any.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub town: Option<String>,
    /// Targeting radius in kilometers (at least 1).
    pub radius: f64,
}

/// Treats both `null` and `""` as an absent value.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}
