//! Observable client state: the campaign list, the balance and the form.
//!
//! [`BoardStore`] is a plain data holder. Every transition goes through a
//! `watch` channel so a presentation layer can [`BoardStore::subscribe`]
//! and re-render when something changes.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::error::{CampaignError, ErrorKind, Result};
use crate::form::{FieldInput, FormField, FormState};
use crate::models::{Campaign, CampaignId, CampaignList, CampaignPayload};

/// Shown when the list cannot be fetched.
pub const FETCH_FAILED: &str = "Failed to fetch campaigns";
/// Shown when a delete is refused or cannot be sent.
pub const DELETE_FAILED: &str = "Failed to delete campaign";
/// Shown when a save fails without a server message.
pub const SAVE_FAILED: &str = "An error occurred while saving the campaign";
/// Shown after a successful create.
pub const CREATED: &str = "Campaign created successfully";
/// Shown after a successful update.
pub const UPDATED: &str = "Campaign updated successfully";
/// Shown after a successful delete.
pub const DELETED: &str = "Campaign deleted successfully";

/// Where the board is in its mutation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A create, update or delete request is in flight.
    Submitting,
    /// The list is being refetched.
    Refreshing,
}

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

/// A transient notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text to display.
    pub message: String,
}

impl Notice {
    /// Creates a success notice.
    #[inline]
    #[must_use]
    pub fn success<T: Into<String>>(message: T) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[inline]
    #[must_use]
    pub fn error<T: Into<String>>(message: T) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// Campaigns as last returned by the server.
    pub campaigns: Vec<Campaign>,
    /// Emerald balance as last returned by the server.
    pub balance: f64,
    /// The editable form.
    pub form: FormState,
    /// Mutation cycle phase.
    pub phase: Phase,
    /// Inline error shown under the form.
    pub error: Option<String>,
    /// Most recent transient notice.
    pub notice: Option<Notice>,
    /// When the list was last replaced from the server.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl BoardState {
    /// Looks up a listed campaign by id.
    #[inline]
    #[must_use]
    pub fn campaign(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.iter().find(|campaign| campaign.id == id)
    }
}

/// A submit captured from the form: what to send, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmit {
    /// Campaign being updated, or `None` for a create.
    pub target: Option<CampaignId>,
    /// Coerced request body.
    pub payload: CampaignPayload,
}

/// Maps a failed save onto the text shown to the user.
#[must_use]
pub fn save_failure_message(err: &CampaignError) -> String {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::Input => err.to_string(),
        ErrorKind::Network | ErrorKind::Delete | ErrorKind::NotFound => SAVE_FAILED.to_owned(),
    }
}

/// Holder of [`BoardState`] with change notification.
#[derive(Debug)]
pub struct BoardStore {
    /// Current state; receivers are notified on every modification.
    state: watch::Sender<BoardState>,
}

impl Default for BoardStore {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    /// Creates a store with an empty list and a default draft.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(BoardState::default());
        Self { state }
    }

    /// Subscribes to state changes.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.state.subscribe()
    }

    /// Returns a copy of the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        self.state.borrow().clone()
    }

    /// Merges one field into the draft.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::form::Draft::set_field`] errors; the draft is
    /// left untouched on failure.
    #[inline]
    pub fn set_field(&self, field: FormField, input: FieldInput) -> Result<()> {
        let mut outcome = Ok(());
        let _changed = self
            .state
            .send_if_modified(|state| match state.form.draft.set_field(field, input) {
                Ok(()) => true,
                Err(err) => {
                    outcome = Err(err);
                    false
                }
            });
        outcome
    }

    /// Flips the status checkbox.
    #[inline]
    pub fn toggle_status(&self) {
        self.state.send_modify(|state| state.form.draft.toggle_status());
    }

    /// Loads a listed campaign into the form for editing.
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::NotFound`] if the id is not in the current
    /// list.
    #[inline]
    pub fn edit(&self, id: CampaignId) -> Result<()> {
        let mut outcome = Err(CampaignError::NotFound(id));
        let _changed = self.state.send_if_modified(|state| {
            let Some(campaign) = state.campaign(id).cloned() else {
                return false;
            };
            state.form.load_for_edit(&campaign);
            outcome = Ok(());
            true
        });
        outcome
    }

    /// Clears the draft and the edit target.
    #[inline]
    pub fn reset_form(&self) {
        self.state.send_modify(|state| state.form.reset());
    }

    /// Starts a submit: clears the inline error, coerces the draft, and
    /// enters [`Phase::Submitting`].
    ///
    /// # Errors
    ///
    /// Returns [`CampaignError::InvalidNumber`] if the draft cannot be
    /// coerced; the failure is surfaced and the draft is kept.
    #[inline]
    pub fn begin_submit(&self) -> Result<PendingSubmit> {
        let (coerced, target) = {
            let state = self.state.borrow();
            (state.form.draft.to_payload(), state.form.editing_id())
        };
        match coerced {
            Ok(payload) => {
                self.state.send_modify(|state| {
                    state.error = None;
                    state.phase = Phase::Submitting;
                });
                Ok(PendingSubmit { target, payload })
            }
            Err(err) => {
                self.fail(&save_failure_message(&err));
                Err(err)
            }
        }
    }

    /// Records a successful create or update and enters
    /// [`Phase::Refreshing`].
    #[inline]
    pub fn submit_succeeded(&self, target: Option<CampaignId>) {
        let message = if target.is_some() { UPDATED } else { CREATED };
        self.state.send_modify(|state| {
            state.notice = Some(Notice::success(message));
            state.phase = Phase::Refreshing;
        });
    }

    /// Enters [`Phase::Submitting`] for a delete.
    #[inline]
    pub fn begin_delete(&self) {
        self.state.send_modify(|state| state.phase = Phase::Submitting);
    }

    /// Records a successful delete and enters [`Phase::Refreshing`].
    #[inline]
    pub fn delete_succeeded(&self) {
        self.state.send_modify(|state| {
            state.notice = Some(Notice::success(DELETED));
            state.phase = Phase::Refreshing;
        });
    }

    /// Enters [`Phase::Refreshing`].
    #[inline]
    pub fn begin_refresh(&self) {
        self.state.send_modify(|state| state.phase = Phase::Refreshing);
    }

    /// Replaces the list and balance wholesale with the server's answer.
    #[inline]
    pub fn apply_refresh(&self, list: CampaignList) {
        self.state.send_modify(|state| {
            state.campaigns = list.campaigns;
            state.balance = list.emerald_account_balance;
            state.refreshed_at = Some(Utc::now());
            state.phase = Phase::Idle;
        });
    }

    /// Surfaces a failure as inline error and error notice, and returns to
    /// [`Phase::Idle`]. The list and draft are left as they are.
    #[inline]
    pub fn fail(&self, message: &str) {
        self.state.send_modify(|state| surface_failure(state, message));
    }
}

/// Writes a failure into the state.
fn surface_failure(state: &mut BoardState, message: &str) {
    state.phase = Phase::Idle;
    state.error = Some(message.to_owned());
    state.notice = Some(Notice::error(message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CampaignStatus;

    fn campaign(id: i64, name: &str) -> Campaign {
        Campaign {
            id: CampaignId::new(id),
            name: name.to_owned(),
            keywords: "k".to_owned(),
            bid_amount: 1.0,
            campaign_fund: 10.0,
            status: CampaignStatus::Active,
            town: Some("Gdansk".to_owned()),
            radius: 3.0,
        }
    }

    fn list(campaigns: Vec<Campaign>, balance: f64) -> CampaignList {
        CampaignList {
            campaigns,
            emerald_account_balance: balance,
        }
    }

    #[test]
    fn new_store_is_empty_and_idle() {
        let state = BoardStore::new().snapshot();
        assert!(state.campaigns.is_empty());
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.error.is_none());
        assert!(state.refreshed_at.is_none());
        assert!(!state.form.is_editing());
    }

    #[test]
    fn refresh_replaces_list_wholesale() {
        let store = BoardStore::new();
        store.apply_refresh(list(vec![campaign(1, "A"), campaign(2, "B")], 500.0));
        store.apply_refresh(list(vec![campaign(3, "C")], 420.0));

        let state = store.snapshot();
        assert_eq!(state.campaigns, vec![campaign(3, "C")]);
        assert!((state.balance - 420.0).abs() < f64::EPSILON);
        assert!(state.refreshed_at.is_some());
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn refresh_keeps_pending_edit() {
        let store = BoardStore::new();
        store.apply_refresh(list(vec![campaign(1, "A")], 10.0));
        store.edit(CampaignId::new(1)).unwrap();
        store
            .set_field(FormField::Name, FieldInput::Text("A2".to_owned()))
            .unwrap();
        store.apply_refresh(list(vec![campaign(1, "A")], 10.0));

        let state = store.snapshot();
        assert_eq!(state.form.draft.name, "A2");
        assert_eq!(state.form.editing_id(), Some(CampaignId::new(1)));
    }

    #[test]
    fn edit_unknown_campaign_fails() {
        let store = BoardStore::new();
        assert!(matches!(
            store.edit(CampaignId::new(99)),
            Err(CampaignError::NotFound(id)) if id == CampaignId::new(99)
        ));
        assert!(!store.snapshot().form.is_editing());
    }

    #[test]
    fn set_field_error_leaves_draft() {
        let store = BoardStore::new();
        let mut rx = store.subscribe();
        assert!(
            store
                .set_field(FormField::Town, FieldInput::Checkbox(true))
                .is_err()
        );
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().form, FormState::default());
    }

    #[test]
    fn subscribers_see_changes() {
        let store = BoardStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.toggle_status();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().form.draft.status,
            CampaignStatus::Paused
        );
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn begin_submit_clears_error_and_captures_target() {
        let store = BoardStore::new();
        store.fail("old failure");
        store.apply_refresh(list(vec![campaign(5, "E")], 1.0));
        store.edit(CampaignId::new(5)).unwrap();

        let pending = store.begin_submit().unwrap();
        assert_eq!(pending.target, Some(CampaignId::new(5)));
        assert_eq!(pending.payload.town, "Gdansk");

        let state = store.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.phase, Phase::Submitting);
    }

    #[test]
    fn begin_submit_with_bad_number_surfaces_error() {
        let store = BoardStore::new();
        store
            .set_field(FormField::BidAmount, FieldInput::Text("abc".to_owned()))
            .unwrap();

        assert!(store.begin_submit().is_err());
        let state = store.snapshot();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.error.as_deref().unwrap().contains("bidAmount"));
        assert_eq!(state.form.draft.bid_amount, "abc");
        assert_eq!(state.notice.unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn success_notices() {
        let store = BoardStore::new();
        store.submit_succeeded(None);
        assert_eq!(store.snapshot().notice, Some(Notice::success(CREATED)));
        store.submit_succeeded(Some(CampaignId::new(1)));
        assert_eq!(store.snapshot().notice, Some(Notice::success(UPDATED)));
        store.delete_succeeded();
        let state = store.snapshot();
        assert_eq!(state.notice, Some(Notice::success(DELETED)));
        assert_eq!(state.phase, Phase::Refreshing);
    }

    #[test]
    fn save_failure_messages() {
        let api = CampaignError::Api {
            status: 400,
            message: "Name taken".to_owned(),
        };
        assert_eq!(save_failure_message(&api), "Name taken");
        let network = CampaignError::UnexpectedStatus { status: 502 };
        assert_eq!(save_failure_message(&network), SAVE_FAILED);
    }
}
