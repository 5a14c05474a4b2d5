//! Editable campaign draft and the form state around it.
//!
//! The draft keeps numeric fields as raw text until submission; see
//! [`Draft::to_payload`] for the coercion rules.

use crate::error::{CampaignError, Result};
use crate::models::{Campaign, CampaignId, CampaignPayload, CampaignStatus};

/// Smallest accepted value for bid, fund and radius.
const MIN_NUMERIC: f64 = 1.0;

/// One field of the campaign form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Campaign name.
    Name,
    /// Comma-separated keywords.
    Keywords,
    /// Bid amount.
    BidAmount,
    /// Campaign fund.
    CampaignFund,
    /// Active/paused checkbox.
    Status,
    /// Town selector.
    Town,
    /// Radius in kilometers.
    Radius,
}

impl FormField {
    /// Every field, in form order.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Keywords,
        Self::BidAmount,
        Self::CampaignFund,
        Self::Status,
        Self::Town,
        Self::Radius,
    ];

    /// Returns the wire (JSON) name of the field.
    #[inline]
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Keywords => "keywords",
            Self::BidAmount => "bidAmount",
            Self::CampaignFund => "campaignFund",
            Self::Status => "status",
            Self::Town => "town",
            Self::Radius => "radius",
        }
    }
}

impl core::fmt::Display for FormField {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl core::str::FromStr for FormField {
    type Err = CampaignError;

    #[inline]
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| CampaignError::UnknownField(s.to_owned()))
    }
}

/// A value coming from a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Text typed or selected by the user.
    Text(String),
    /// Checkbox state.
    Checkbox(bool),
}

/// A native-control constraint the draft does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Offending field.
    pub field: FormField,
    /// Explanation suitable for inline display.
    pub message: String,
}

impl core::fmt::Display for ConstraintViolation {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The locally held, not-yet-submitted text form of a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Campaign name.
    pub name: String,
    /// Comma-separated keywords.
    pub keywords: String,
    /// Bid amount as typed.
    pub bid_amount: String,
    /// Campaign fund as typed.
    pub campaign_fund: String,
    /// Checkbox-backed status.
    pub status: CampaignStatus,
    /// Selected town, or empty.
    pub town: String,
    /// Radius as typed.
    pub radius: String,
}

impl Draft {
    /// Copies every field of an existing campaign into a draft.
    #[inline]
    #[must_use]
    pub fn from_campaign(campaign: &Campaign) -> Self {
        Self {
            name: campaign.name.clone(),
            keywords: campaign.keywords.clone(),
            bid_amount: campaign.bid_amount.to_string(),
            campaign_fund: campaign.campaign_fund.to_string(),
            status: campaign.status,
            town: campaign.town.clone().unwrap_or_default(),
            radius: campaign.radius.to_string(),
        }
    }

    /// Merges one field into the draft.
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::FieldInput`] for a checkbox input on a text
    /// field, or a text input on `status` that is neither `active` nor
    /// `paused`.
    #[inline]
    pub fn set_field(&mut self, field: FormField, input: FieldInput) -> Result<()> {
        let invalid = || CampaignError::FieldInput {
            field: field.wire_name(),
        };
        match (field, input) {
            (FormField::Status, FieldInput::Checkbox(checked)) => {
                self.status = CampaignStatus::from_checked(checked);
            }
            (FormField::Status, FieldInput::Text(text)) => {
                self.status = text.parse().map_err(|()| invalid())?;
            }
            (_, FieldInput::Checkbox(_)) => return Err(invalid()),
            (FormField::Name, FieldInput::Text(text)) => self.name = text,
            (FormField::Keywords, FieldInput::Text(text)) => self.keywords = text,
            (FormField::BidAmount, FieldInput::Text(text)) => self.bid_amount = text,
            (FormField::CampaignFund, FieldInput::Text(text)) => self.campaign_fund = text,
            (FormField::Town, FieldInput::Text(text)) => self.town = text,
            (FormField::Radius, FieldInput::Text(text)) => self.radius = text,
        }
        Ok(())
    }

    /// Flips the status checkbox.
    #[inline]
    pub const fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    /// Coerces the draft into a request body.
    ///
    /// Numeric fields are trimmed and parsed; text fields are sent
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::InvalidNumber`] if a numeric field is not a
    /// finite number.
    #[inline]
    pub fn to_payload(&self) -> Result<CampaignPayload> {
        Ok(CampaignPayload {
            name: self.name.clone(),
            keywords: self.keywords.clone(),
            bid_amount: coerce_number(FormField::BidAmount, &self.bid_amount)?,
            campaign_fund: coerce_number(FormField::CampaignFund, &self.campaign_fund)?,
            status: self.status,
            town: self.town.clone(),
            radius: coerce_number(FormField::Radius, &self.radius)?,
        })
    }

    /// Checks the constraints the native form controls enforce: required
    /// fields, numeric minimum of 1, and town membership.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint in form order.
    #[inline]
    pub fn check_constraints<T: AsRef<str>>(
        &self,
        towns: &[T],
    ) -> core::result::Result<(), ConstraintViolation> {
        require_text(FormField::Name, &self.name)?;
        require_text(FormField::Keywords, &self.keywords)?;
        require_min(FormField::BidAmount, &self.bid_amount)?;
        require_min(FormField::CampaignFund, &self.campaign_fund)?;
        if !self.town.is_empty() && !towns.iter().any(|town| town.as_ref() == self.town) {
            return Err(ConstraintViolation {
                field: FormField::Town,
                message: format!("{:?} is not one of the available towns", self.town),
            });
        }
        require_min(FormField::Radius, &self.radius)
    }
}

/// Parses a numeric field.
fn coerce_number(field: FormField, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CampaignError::InvalidNumber {
            field: field.wire_name(),
            value: raw.to_owned(),
        })
}

/// Fails when a required text field is blank.
fn require_text(field: FormField, value: &str) -> core::result::Result<(), ConstraintViolation> {
    if value.trim().is_empty() {
        return Err(ConstraintViolation {
            field,
            message: "this field is required".to_owned(),
        });
    }
    Ok(())
}

/// Fails when a numeric field is blank, not a number, or below 1.
fn require_min(field: FormField, value: &str) -> core::result::Result<(), ConstraintViolation> {
    require_text(field, value)?;
    match coerce_number(field, value) {
        Ok(number) if number >= MIN_NUMERIC => Ok(()),
        Ok(_) => Err(ConstraintViolation {
            field,
            message: "value must be greater than or equal to 1".to_owned(),
        }),
        Err(_) => Err(ConstraintViolation {
            field,
            message: "please enter a number".to_owned(),
        }),
    }
}

/// The form: a draft plus the campaign it edits, if any.
///
/// When `editing` is set the draft was loaded from that campaign; a submit
/// then updates instead of creating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// Current draft.
    pub draft: Draft,
    /// Campaign being edited, if any.
    pub editing: Option<Campaign>,
}

impl FormState {
    /// Loads an existing campaign into the draft and marks it as the edit
    /// target.
    #[inline]
    pub fn load_for_edit(&mut self, campaign: &Campaign) {
        self.draft = Draft::from_campaign(campaign);
        self.editing = Some(campaign.clone());
    }

    /// Clears the draft and the edit target.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns the id of the campaign being edited.
    #[inline]
    #[must_use]
    pub fn editing_id(&self) -> Option<CampaignId> {
        self.editing.as_ref().map(|campaign| campaign.id)
    }

    /// Returns `true` while an existing campaign is being edited.
    #[inline]
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}
