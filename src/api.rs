//! Remote operation traits for the campaign service.
//!
//! This module defines the [`CampaignApi`] (async) and
//! [`BlockingCampaignApi`] (blocking) traits via a shared macro, mirroring
//! the client generation pattern in [`crate::client`]. The HTTP clients
//! implement them; controllers are generic over them so tests can swap in
//! an in-memory double.

/// Generates a remote API trait (async or blocking).
///
/// Uses `@methods` to define the operation list once, and `@method` to
/// render each one in async (`impl Future + Send`) or blocking (`fn`)
/// style.
macro_rules! define_api {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_api!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_api!(@methods blocking);
        }
    };

    // ── Single operation list (shared between both variants) ────────
    (@methods $mode:ident) => {
        define_api!(@method $mode, list,
            "Fetches every campaign together with the account balance.\n\n# Errors\n\nReturns a network-kind error if the request fails, the server answers with a non-success status, or the body cannot be parsed.",
            -> Result<CampaignList>);
        define_api!(@method $mode, create,
            "Creates a campaign from a full payload.\n\n# Errors\n\nReturns [`CampaignError::Api`](crate::error::CampaignError::Api) with the server's message on a non-success status, or a network-kind error if the request fails.",
            payload: &CampaignPayload, -> Result<()>);
        define_api!(@method $mode, update,
            "Replaces the campaign with the given id by a full payload.\n\n# Errors\n\nSame failure contract as `create`.",
            id: CampaignId, payload: &CampaignPayload, -> Result<()>);
        define_api!(@method $mode, delete,
            "Deletes the campaign with the given id.\n\n# Errors\n\nReturns [`CampaignError::Delete`](crate::error::CampaignError::Delete) on a non-success status, or a network-kind error if the request fails.",
            id: CampaignId, -> Result<()>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

mod async_api {
    //! Async API trait definition.

    use crate::error::Result;
    use crate::models::{CampaignId, CampaignList, CampaignPayload};

    define_api! {
        trait_name: CampaignApi,
        trait_doc: "Async access to the campaign service.\n\nEach operation is a single round-trip: no retries, no caching.",
        mode: async_mode,
    }
}

mod blocking_api {
    //! Blocking API trait definition.

    use crate::error::Result;
    use crate::models::{CampaignId, CampaignList, CampaignPayload};

    define_api! {
        trait_name: BlockingCampaignApi,
        trait_doc: "Blocking access to the campaign service.\n\nEach operation is a single round-trip: no retries, no caching.",
        mode: blocking,
    }
}

pub use async_api::CampaignApi;
pub use blocking_api::BlockingCampaignApi;
