//! High-level campaign manager: form, list and remote client together.
//!
//! Combines a [`crate::api::CampaignApi`] /
//! [`crate::api::BlockingCampaignApi`] implementation with a [`BoardStore`]. Every successful mutation is followed by a full
//! refetch; local state is never patched incrementally.

use crate::board::BoardStore;

/// Generates a campaign manager (async or blocking).
macro_rules! define_manager {
    (
        manager_name: $manager:ident,
        api_trait: $api_trait:ident,
        manager_doc: $manager_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $manager_doc]
        #[derive(Debug)]
        pub struct $manager<A: $api_trait> {
            /// Remote campaign service.
            api: A,
            /// Observable client state.
            store: BoardStore,
        }

        impl<A: $api_trait> $manager<A> {
            /// Creates a manager with an empty list and a default draft.
            ///
            /// Nothing is fetched until [`Self::refresh`] is called.
            #[inline]
            #[must_use]
            pub fn new(api: A) -> Self {
                Self {
                    api,
                    store: BoardStore::new(),
                }
            }

            /// Returns the remote API.
            #[inline]
            #[must_use]
            pub const fn api(&self) -> &A {
                &self.api
            }

            /// Returns the state store.
            #[inline]
            #[must_use]
            pub const fn store(&self) -> &BoardStore {
                &self.store
            }

            /// Subscribes to state changes.
            #[inline]
            #[must_use]
            pub fn subscribe(&self) -> watch::Receiver<BoardState> {
                self.store.subscribe()
            }

            /// Returns a copy of the current state.
            #[inline]
            #[must_use]
            pub fn state(&self) -> BoardState {
                self.store.snapshot()
            }

            /// Merges one field into the draft.
            ///
            /// # Errors
            ///
            /// Returns an error if the input does not fit the field.
            #[inline]
            pub fn set_field(&self, field: FormField, input: FieldInput) -> Result<()> {
                self.store.set_field(field, input)
            }

            /// Flips the status checkbox.
            #[inline]
            pub fn toggle_status(&self) {
                self.store.toggle_status();
            }

            /// Loads a listed campaign into the form for editing.
            ///
            /// # Errors
            ///
            /// Returns [`crate::error::CampaignError::NotFound`] if the id is
            /// not listed.
            #[inline]
            pub fn edit(&self, id: CampaignId) -> Result<()> {
                self.store.edit(id)
            }

            /// Abandons the current draft and edit target.
            #[inline]
            pub fn cancel(&self) {
                self.store.reset_form();
            }

            /// Fetches the full collection and balance and replaces local
            /// state with it.
            ///
            /// # Errors
            ///
            /// Returns the fetch error; the list is left as it was and the
            /// failure is surfaced in the state.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn refresh(&self) -> Result<()> {
                self.store.begin_refresh();
                match self.api.list() $( .$await_ext )? {
                    Ok(list) => {
                        tracing::debug!(
                            campaigns = list.campaigns.len(),
                            balance = list.emerald_account_balance,
                            "campaign list refreshed"
                        );
                        self.store.apply_refresh(list);
                        Ok(())
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to fetch campaigns");
                        self.store.fail(FETCH_FAILED);
                        Err(err)
                    }
                }
            }

            /// Submits the draft: updates the edited campaign, or creates a
            /// new one. On success the list is refetched and the form reset.
            ///
            /// A failing refetch after a successful save is surfaced in the
            /// state but does not fail the submit.
            ///
            /// # Errors
            ///
            /// Returns the coercion or save error; the draft is kept so the
            /// user can retry.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn submit(&self) -> Result<()> {
                let pending = self.store.begin_submit()?;
                let saved = match pending.target {
                    Some(id) => self.api.update(id, &pending.payload) $( .$await_ext )?,
                    None => self.api.create(&pending.payload) $( .$await_ext )?,
                };
                if let Err(err) = saved {
                    tracing::warn!(error = %err, campaign = ?pending.target, "failed to save campaign");
                    self.store.fail(&save_failure_message(&err));
                    return Err(err);
                }

                self.store.submit_succeeded(pending.target);
                if self.refresh() $( .$await_ext )? .is_err() {
                    tracing::debug!("refresh after save failed");
                }
                self.store.reset_form();
                Ok(())
            }

            /// Deletes a campaign and refetches the list.
            ///
            /// # Errors
            ///
            /// Returns the delete error; the list is left stale until the
            /// next successful refresh.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn remove(&self, id: CampaignId) -> Result<()> {
                self.store.begin_delete();
                if let Err(err) = self.api.delete(id) $( .$await_ext )? {
                    tracing::warn!(error = %err, "failed to delete campaign");
                    self.store.fail(DELETE_FAILED);
                    return Err(err);
                }

                self.store.delete_succeeded();
                if self.refresh() $( .$await_ext )? .is_err() {
                    tracing::debug!("refresh after delete failed");
                }
                Ok(())
            }
        }
    };
}

// ── Async variant ───────────────────────────────────────────────────────

mod async_manager {
    //! Async campaign manager.

    use tokio::sync::watch;

    use crate::api::CampaignApi;
    use crate::board::{BoardState, DELETE_FAILED, FETCH_FAILED, save_failure_message};
    use crate::error::Result;
    use crate::form::{FieldInput, FormField};
    use crate::models::CampaignId;

    use super::BoardStore;

    define_manager! {
        manager_name: CampaignManager,
        api_trait: CampaignApi,
        manager_doc: "Async campaign manager.\n\nConcurrent calls are not serialized: completions apply in network order and the last refresh wins.",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

mod blocking_manager {
    //! Blocking campaign manager.

    use tokio::sync::watch;

    use crate::api::BlockingCampaignApi;
    use crate::board::{BoardState, DELETE_FAILED, FETCH_FAILED, save_failure_message};
    use crate::error::Result;
    use crate::form::{FieldInput, FormField};
    use crate::models::CampaignId;

    use super::BoardStore;

    define_manager! {
        manager_name: CampaignManagerBlocking,
        api_trait: BlockingCampaignApi,
        manager_doc: "Blocking campaign manager, used by the CLI.",
    }
}

pub use async_manager::CampaignManager;
pub use blocking_manager::CampaignManagerBlocking;

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::api::{BlockingCampaignApi, CampaignApi};
    use crate::board::{CREATED, DELETE_FAILED, DELETED, FETCH_FAILED, NoticeLevel, Phase, UPDATED};
    use crate::error::{CampaignError, ErrorKind, Result};
    use crate::form::{FieldInput, FormField};
    use crate::models::{Campaign, CampaignId, CampaignList, CampaignPayload, CampaignStatus};

    /// A request seen by the fake service.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        /// `list`.
        List,
        /// `create`.
        Create(CampaignPayload),
        /// `update`.
        Update(CampaignId, CampaignPayload),
        /// `delete`.
        Delete(CampaignId),
    }

    /// Scripted in-memory stand-in for the campaign service.
    #[derive(Debug, Default)]
    struct FakeApi {
        /// Recorded calls and queued answers.
        inner: Mutex<FakeInner>,
    }

    /// Mutable part of [`FakeApi`].
    #[derive(Debug, Default)]
    struct FakeInner {
        /// Every call, in order.
        calls: Vec<Call>,
        /// Answers for `list`, consumed front to back.
        lists: VecDeque<Result<CampaignList>>,
        /// Answers for `create`/`update`/`delete`, consumed front to back.
        mutations: VecDeque<Result<()>>,
    }

    impl FakeApi {
        fn with_lists(lists: Vec<Result<CampaignList>>) -> Self {
            let fake = Self::default();
            fake.inner.lock().unwrap().lists = lists.into();
            fake
        }

        fn push_mutation(&self, outcome: Result<()>) {
            self.inner.lock().unwrap().mutations.push_back(outcome);
        }

        fn calls(&self) -> Vec<Call> {
            self.inner.lock().unwrap().calls.clone()
        }

        fn record_list(&self) -> Result<CampaignList> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(Call::List);
            inner
                .lists
                .pop_front()
                .unwrap_or(Err(CampaignError::UnexpectedStatus { status: 503 }))
        }

        fn record_mutation(&self, call: Call) -> Result<()> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(call);
            inner.mutations.pop_front().unwrap_or(Ok(()))
        }
    }

    impl CampaignApi for FakeApi {
        async fn list(&self) -> Result<CampaignList> {
            self.record_list()
        }

        async fn create(&self, payload: &CampaignPayload) -> Result<()> {
            self.record_mutation(Call::Create(payload.clone()))
        }

        async fn update(&self, id: CampaignId, payload: &CampaignPayload) -> Result<()> {
            self.record_mutation(Call::Update(id, payload.clone()))
        }

        async fn delete(&self, id: CampaignId) -> Result<()> {
            self.record_mutation(Call::Delete(id))
        }
    }

    impl BlockingCampaignApi for FakeApi {
        fn list(&self) -> Result<CampaignList> {
            self.record_list()
        }

        fn create(&self, payload: &CampaignPayload) -> Result<()> {
            self.record_mutation(Call::Create(payload.clone()))
        }

        fn update(&self, id: CampaignId, payload: &CampaignPayload) -> Result<()> {
            self.record_mutation(Call::Update(id, payload.clone()))
        }

        fn delete(&self, id: CampaignId) -> Result<()> {
            self.record_mutation(Call::Delete(id))
        }
    }

    fn campaign(id: i64, name: &str) -> Campaign {
        Campaign {
            id: CampaignId::new(id),
            name: name.to_owned(),
            keywords: "sale,spring".to_owned(),
            bid_amount: 5.0,
            campaign_fund: 100.0,
            status: CampaignStatus::Active,
            town: Some("Krakow".to_owned()),
            radius: 10.0,
        }
    }

    fn listing(campaigns: Vec<Campaign>, balance: f64) -> CampaignList {
        CampaignList {
            campaigns,
            emerald_account_balance: balance,
        }
    }

    fn fill_spring_sale<A: CampaignApi>(manager: &CampaignManager<A>) {
        let fields = [
            ("name", "Spring Sale"),
            ("keywords", "sale,spring"),
            ("bidAmount", "5"),
            ("campaignFund", "100"),
            ("town", "Krakow"),
            ("radius", "10"),
        ];
        for (name, value) in fields {
            let field: FormField = name.parse().unwrap();
            manager
                .set_field(field, FieldInput::Text(value.to_owned()))
                .unwrap();
        }
        manager
            .set_field(FormField::Status, FieldInput::Checkbox(true))
            .unwrap();
    }

    #[tokio::test]
    async fn refresh_replaces_state() {
        let api = FakeApi::with_lists(vec![Ok(listing(vec![campaign(1, "A")], 900.0))]);
        let manager = CampaignManager::new(api);

        manager.refresh().await.unwrap();

        let state = manager.state();
        assert_eq!(state.campaigns, vec![campaign(1, "A")]);
        assert!((state.balance - 900.0).abs() < f64::EPSILON);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn refresh_failure_keeps_list_and_surfaces_error() {
        let api = FakeApi::with_lists(vec![
            Ok(listing(vec![campaign(1, "A")], 900.0)),
            Err(CampaignError::UnexpectedStatus { status: 500 }),
        ]);
        let manager = CampaignManager::new(api);
        manager.refresh().await.unwrap();

        let err = manager.refresh().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);

        let state = manager.state();
        assert_eq!(state.campaigns, vec![campaign(1, "A")]);
        assert_eq!(state.error.as_deref(), Some(FETCH_FAILED));
        assert_eq!(state.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn submit_without_target_creates_with_numbers_and_resets() {
        let after = listing(vec![campaign(7, "Spring Sale")], 900.0);
        let api = FakeApi::with_lists(vec![Ok(after.clone())]);
        let manager = CampaignManager::new(api);
        fill_spring_sale(&manager);

        manager.submit().await.unwrap();

        let calls = manager.api().calls();
        assert_eq!(calls.len(), 2);
        let Call::Create(payload) = &calls[0] else {
            panic!("expected create, got {:?}", calls[0]);
        };
        assert!((payload.bid_amount - 5.0).abs() < f64::EPSILON);
        assert!((payload.campaign_fund - 100.0).abs() < f64::EPSILON);
        assert!((payload.radius - 10.0).abs() < f64::EPSILON);
        assert_eq!(payload.status, CampaignStatus::Active);
        assert_eq!(calls[1], Call::List);

        let state = manager.state();
        assert_eq!(state.campaigns, after.campaigns);
        assert!((state.balance - after.emerald_account_balance).abs() < f64::EPSILON);
        assert_eq!(state.form, crate::form::FormState::default());
        assert_eq!(state.notice.unwrap().message, CREATED);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn submit_with_target_updates_full_record() {
        let before = listing(vec![campaign(3, "Old")], 500.0);
        let mut renamed = campaign(3, "New");
        renamed.status = CampaignStatus::Paused;
        let after = listing(vec![renamed], 500.0);
        let api = FakeApi::with_lists(vec![Ok(before), Ok(after.clone())]);
        let manager = CampaignManager::new(api);
        manager.refresh().await.unwrap();

        manager.edit(CampaignId::new(3)).unwrap();
        manager
            .set_field(FormField::Name, FieldInput::Text("New".to_owned()))
            .unwrap();
        manager.toggle_status();
        manager.submit().await.unwrap();

        let calls = manager.api().calls();
        let Call::Update(id, payload) = &calls[1] else {
            panic!("expected update, got {:?}", calls[1]);
        };
        assert_eq!(*id, CampaignId::new(3));
        assert_eq!(payload.name, "New");
        assert_eq!(payload.keywords, "sale,spring");
        assert_eq!(payload.town, "Krakow");
        assert_eq!(payload.status, CampaignStatus::Paused);

        let state = manager.state();
        assert_eq!(state.campaigns, after.campaigns);
        assert!(!state.form.is_editing());
        assert_eq!(state.notice.unwrap().message, UPDATED);
    }

    #[tokio::test]
    async fn rejected_submit_keeps_draft_and_shows_message() {
        let api = FakeApi::default();
        api.push_mutation(Err(CampaignError::Api {
            status: 400,
            message: "Insufficient emerald balance".to_owned(),
        }));
        let manager = CampaignManager::new(api);
        fill_spring_sale(&manager);
        let draft_before = manager.state().form.draft;

        let err = manager.submit().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let state = manager.state();
        assert_eq!(state.form.draft, draft_before);
        assert_eq!(state.error.as_deref(), Some("Insufficient emerald balance"));
        assert_eq!(state.notice.unwrap().level, NoticeLevel::Error);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(manager.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn unparseable_number_sends_nothing() {
        let manager = CampaignManager::new(FakeApi::default());
        fill_spring_sale(&manager);
        manager
            .set_field(FormField::CampaignFund, FieldInput::Text("lots".to_owned()))
            .unwrap();

        let err = manager.submit().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(manager.api().calls().is_empty());
        assert_eq!(manager.state().form.draft.campaign_fund, "lots");
    }

    #[tokio::test]
    async fn save_succeeds_even_if_refetch_fails() {
        let api = FakeApi::with_lists(vec![Err(CampaignError::UnexpectedStatus { status: 502 })]);
        let manager = CampaignManager::new(api);
        fill_spring_sale(&manager);

        manager.submit().await.unwrap();

        let state = manager.state();
        assert_eq!(state.error.as_deref(), Some(FETCH_FAILED));
        assert_eq!(state.form, crate::form::FormState::default());
    }

    #[tokio::test]
    async fn failed_delete_leaves_list() {
        let api = FakeApi::with_lists(vec![Ok(listing(vec![campaign(1, "A")], 10.0))]);
        api.push_mutation(Err(CampaignError::Delete { status: 500 }));
        let manager = CampaignManager::new(api);
        manager.refresh().await.unwrap();

        let err = manager.remove(CampaignId::new(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Delete);

        let state = manager.state();
        assert_eq!(state.campaigns, vec![campaign(1, "A")]);
        assert_eq!(state.error.as_deref(), Some(DELETE_FAILED));
        assert_eq!(
            manager.api().calls(),
            vec![Call::List, Call::Delete(CampaignId::new(1))]
        );
    }

    #[tokio::test]
    async fn successful_delete_refetches() {
        let api = FakeApi::with_lists(vec![
            Ok(listing(vec![campaign(1, "A"), campaign(2, "B")], 10.0)),
            Ok(listing(vec![campaign(2, "B")], 110.0)),
        ]);
        let manager = CampaignManager::new(api);
        manager.refresh().await.unwrap();

        manager.remove(CampaignId::new(1)).await.unwrap();

        let state = manager.state();
        assert_eq!(state.campaigns, vec![campaign(2, "B")]);
        assert!((state.balance - 110.0).abs() < f64::EPSILON);
        assert_eq!(state.notice.unwrap().message, DELETED);
    }

    #[tokio::test]
    async fn cancel_clears_edit() {
        let api = FakeApi::with_lists(vec![Ok(listing(vec![campaign(1, "A")], 10.0))]);
        let manager = CampaignManager::new(api);
        manager.refresh().await.unwrap();
        manager.edit(CampaignId::new(1)).unwrap();
        assert!(manager.state().form.is_editing());

        manager.cancel();
        assert_eq!(manager.state().form, crate::form::FormState::default());
    }

    #[tokio::test]
    async fn observer_is_notified_of_refresh() {
        let api = FakeApi::with_lists(vec![Ok(listing(vec![campaign(1, "A")], 10.0))]);
        let manager = CampaignManager::new(api);
        let mut rx = manager.subscribe();

        manager.refresh().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().campaigns.len(), 1);
    }

    #[test]
    fn blocking_manager_create_flow() {
        let api = FakeApi::with_lists(vec![
            Ok(listing(Vec::new(), 1000.0)),
            Ok(listing(vec![campaign(1, "Spring Sale")], 900.0)),
        ]);
        let manager = CampaignManagerBlocking::new(api);
        manager.refresh().unwrap();
        assert!(manager.state().campaigns.is_empty());

        for (field, value) in [
            (FormField::Name, "Spring Sale"),
            (FormField::Keywords, "sale,spring"),
            (FormField::BidAmount, "5"),
            (FormField::CampaignFund, "100"),
            (FormField::Radius, "10"),
        ] {
            manager
                .set_field(field, FieldInput::Text(value.to_owned()))
                .unwrap();
        }
        manager.submit().unwrap();

        let state = manager.state();
        assert_eq!(state.campaigns.len(), 1);
        assert!((state.balance - 900.0).abs() < f64::EPSILON);
        assert_eq!(state.form.draft, crate::form::Draft::default());
        let calls = manager.api().calls();
        assert!(matches!(&calls[1], Call::Create(payload) if payload.town.is_empty()));
    }

    #[test]
    fn blocking_manager_edit_unknown_id() {
        let manager = CampaignManagerBlocking::new(FakeApi::default());
        assert!(matches!(
            manager.edit(CampaignId::new(5)),
            Err(CampaignError::NotFound(_))
        ));
    }
}
