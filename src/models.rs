//! Data models for the campaign API.
//!
//! Strongly-typed representations of campaigns, their identifiers and
//! status, the request body, and the response envelopes.

mod campaign;
mod enums;
mod envelope;
mod ids;
mod payload;

pub use campaign::Campaign;
pub use enums::CampaignStatus;
pub use envelope::{ApiErrorBody, CampaignList, CreateCampaignResponse, DeleteCampaignResponse};
pub use ids::CampaignId;
pub use payload::CampaignPayload;
