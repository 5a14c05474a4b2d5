//! Request body sent on create and update.

use serde::{Deserialize, Serialize};

use super::CampaignStatus;

/// Full campaign record as sent to `POST /campaigns` and
/// `PUT /campaigns/{id}`.
///
/// Updates always resend every field. `town` is an empty string when no
/// town is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPayload {
    /// Display name.
    pub name: String,
    /// Comma-separated keywords.
    pub keywords: String,
    /// Bid per impression.
    pub bid_amount: f64,
    /// Funds allocated to the campaign.
    pub campaign_fund: f64,
    /// Serving status.
    pub status: CampaignStatus,
    /// Target town, or `""`.
    pub town: String,
    /// Targeting radius in kilometers.
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_serialize_as_numbers() {
        let payload = CampaignPayload {
            name: "Spring Sale".to_owned(),
            keywords: "sale,spring".to_owned(),
            bid_amount: 5.0,
            campaign_fund: 100.0,
            status: CampaignStatus::Active,
            town: "Krakow".to_owned(),
            radius: 10.0,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["bidAmount"].is_number());
        assert!(value["campaignFund"].is_number());
        assert!(value["radius"].is_number());
        assert_eq!(value["bidAmount"].as_f64(), Some(5.0));
        assert_eq!(value["status"], "active");
        assert_eq!(value["town"], "Krakow");
    }
}
