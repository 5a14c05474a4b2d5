//! Response envelopes returned by the campaign endpoints.

use serde::{Deserialize, Serialize};

use super::Campaign;

/// Body of `GET /campaigns`: the full collection plus the account
/// balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignList {
    /// Every campaign known to the server.
    pub campaigns: Vec<Campaign>,
    /// Spendable Emerald balance of the account.
    pub emerald_account_balance: f64,
}

/// Body of a successful `POST /campaigns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignResponse {
    /// The stored campaign, with its assigned id.
    pub campaign: Campaign,
    /// Balance after the campaign fund was deducted.
    pub new_balance: f64,
}

/// Body of a successful `DELETE /campaigns/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCampaignResponse {
    /// Confirmation text.
    pub message: String,
    /// Balance after the deletion.
    pub new_balance: f64,
}

/// Error body returned when a create or update is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable reason.
    pub message: String,
}
