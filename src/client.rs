//! HTTP client for the campaign service.
//!
//! Provides both async and blocking client variants behind feature flags.

/// Collection endpoint path.
const CAMPAIGNS_PATH: &str = "/campaigns";

/// Message used when a rejected mutation carries no readable body.
const UNKNOWN_ERROR: &str = "unknown error";

/// Extracts the user-facing message from a rejected create/update body.
///
/// Prefers the JSON `message` field, then the raw text, then a fixed
/// fallback.
fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<crate::models::ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_owned(),
        Err(_) => UNKNOWN_ERROR.to_owned(),
    }
}

/// Generates a campaign client (async or blocking) with builder, methods,
/// and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override (for testing).
            base_url: Option<String>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Takes the base URL from a [`Config`].
            #[inline]
            #[must_use]
            pub fn config(self, config: &Config) -> Self {
                self.base_url(config.base_url())
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`CampaignError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .map_or_else(
                        || DEFAULT_BASE_URL.to_owned(),
                        |url| url.trim_end_matches('/').to_owned(),
                    );
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client { http, base_url })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder { base_url: None }
            }

            /// Returns the base URL requests are sent to.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Fetches all campaigns and the account balance via
            /// `GET /campaigns`.
            ///
            /// # Errors
            ///
            /// Returns [`CampaignError::Http`] if the request fails,
            /// [`CampaignError::UnexpectedStatus`] on a non-success status, or
            /// [`CampaignError::Serialization`] if the body is malformed.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_campaigns(&self) -> Result<CampaignList> {
                let url = self.collection_url();
                tracing::trace!(url = %url, "sending GET request");
                let response: $resp_type = self.http.get(&url).send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if !status.is_success() {
                    return Err(CampaignError::UnexpectedStatus {
                        status: status.as_u16(),
                    });
                }
                let body = response.text() $( .$await_ext )? ?;
                tracing::trace!(body_len = body.len(), "parsing response body");
                serde_json::from_str(&body).map_err(CampaignError::from)
            }

            /// Creates a campaign via `POST /campaigns`.
            ///
            /// # Errors
            ///
            /// Returns [`CampaignError::Api`] with the server's message on a
            /// non-success status, or [`CampaignError::Http`] if the request
            /// fails.
            #[tracing::instrument(skip_all, fields(name = %payload.name))]
            pub $($async_kw)? fn create_campaign(&self, payload: &CampaignPayload) -> Result<()> {
                let url = self.collection_url();
                tracing::trace!(url = %url, "sending POST request");
                let response: $resp_type = self
                    .http
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(payload)
                    .send()
                    $( .$await_ext )?
                    ?;

                let body = Self::accept_mutation(response) $( .$await_ext )? ?;
                if let Ok(created) = serde_json::from_str::<CreateCampaignResponse>(&body) {
                    tracing::debug!(
                        id = %created.campaign.id,
                        new_balance = created.new_balance,
                        "campaign created"
                    );
                }
                Ok(())
            }

            /// Replaces a campaign via `PUT /campaigns/{id}`.
            ///
            /// # Errors
            ///
            /// Returns [`CampaignError::Api`] with the server's message on a
            /// non-success status, or [`CampaignError::Http`] if the request
            /// fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn update_campaign(
                &self,
                id: CampaignId,
                payload: &CampaignPayload,
            ) -> Result<()> {
                let url = self.item_url(id);
                tracing::trace!(url = %url, "sending PUT request");
                let response: $resp_type = self
                    .http
                    .put(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(payload)
                    .send()
                    $( .$await_ext )?
                    ?;

                let _body = Self::accept_mutation(response) $( .$await_ext )? ?;
                tracing::debug!("campaign updated");
                Ok(())
            }

            /// Deletes a campaign via `DELETE /campaigns/{id}`.
            ///
            /// # Errors
            ///
            /// Returns [`CampaignError::Delete`] on a non-success status (the
            /// body is not inspected), or [`CampaignError::Http`] if the
            /// request fails.
            #[tracing::instrument(skip_all, fields(id = %id))]
            pub $($async_kw)? fn delete_campaign(&self, id: CampaignId) -> Result<()> {
                let url = self.item_url(id);
                tracing::trace!(url = %url, "sending DELETE request");
                let response: $resp_type = self.http.delete(&url).send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if !status.is_success() {
                    return Err(CampaignError::Delete {
                        status: status.as_u16(),
                    });
                }
                let body = response.text() $( .$await_ext )? .unwrap_or_default();
                if let Ok(deleted) = serde_json::from_str::<DeleteCampaignResponse>(&body) {
                    tracing::debug!(new_balance = deleted.new_balance, message = %deleted.message, "campaign deleted");
                }
                Ok(())
            }

            /// Returns the collection URL.
            fn collection_url(&self) -> String {
                format!("{}{CAMPAIGNS_PATH}", self.base_url)
            }

            /// Returns the URL of a single campaign.
            fn item_url(&self, id: CampaignId) -> String {
                format!("{}{CAMPAIGNS_PATH}/{id}", self.base_url)
            }

            /// Checks the status of a create/update response and returns the
            /// body text, or the server's rejection as [`CampaignError::Api`].
            $($async_kw)? fn accept_mutation(response: $resp_type) -> Result<String> {
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                let body = response.text() $( .$await_ext )? .unwrap_or_default();
                if status.is_success() {
                    Ok(body)
                } else {
                    let message = super::rejection_message(&body);
                    tracing::debug!(status = status.as_u16(), message = %message, "campaign rejected");
                    Err(CampaignError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the campaign service.

    use core::future::Future;

    use reqwest::header::CONTENT_TYPE;

    use super::CAMPAIGNS_PATH;
    use crate::api::CampaignApi;
    use crate::config::{Config, DEFAULT_BASE_URL};
    use crate::error::{CampaignError, Result};
    use crate::models::{
        CampaignId, CampaignList, CampaignPayload, CreateCampaignResponse, DeleteCampaignResponse,
    };

    define_client! {
        client_name: CampaignClient,
        builder_name: CampaignClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the campaign service.\n\nUse [`CampaignClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`CampaignClient`].",
        async_kw: async,
        await_kw: await,
    }

    impl CampaignApi for CampaignClient {
        #[inline]
        fn list(&self) -> impl Future<Output = Result<CampaignList>> + Send {
            self.list_campaigns()
        }

        #[inline]
        fn create(&self, payload: &CampaignPayload) -> impl Future<Output = Result<()>> + Send {
            self.create_campaign(payload)
        }

        #[inline]
        fn update(
            &self,
            id: CampaignId,
            payload: &CampaignPayload,
        ) -> impl Future<Output = Result<()>> + Send {
            self.update_campaign(id, payload)
        }

        #[inline]
        fn delete(&self, id: CampaignId) -> impl Future<Output = Result<()>> + Send {
            self.delete_campaign(id)
        }
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the campaign service.

    use reqwest::header::CONTENT_TYPE;

    use super::CAMPAIGNS_PATH;
    use crate::api::BlockingCampaignApi;
    use crate::config::{Config, DEFAULT_BASE_URL};
    use crate::error::{CampaignError, Result};
    use crate::models::{
        CampaignId, CampaignList, CampaignPayload, CreateCampaignResponse, DeleteCampaignResponse,
    };

    define_client! {
        client_name: CampaignBlockingClient,
        builder_name: CampaignBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the campaign service.\n\nUse [`CampaignBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`CampaignBlockingClient`].",
    }

    impl BlockingCampaignApi for CampaignBlockingClient {
        #[inline]
        fn list(&self) -> Result<CampaignList> {
            self.list_campaigns()
        }

        #[inline]
        fn create(&self, payload: &CampaignPayload) -> Result<()> {
            self.create_campaign(payload)
        }

        #[inline]
        fn update(&self, id: CampaignId, payload: &CampaignPayload) -> Result<()> {
            self.update_campaign(id, payload)
        }

        #[inline]
        fn delete(&self, id: CampaignId) -> Result<()> {
            self.delete_campaign(id)
        }
    }
}

#[cfg(feature = "async")]
pub use async_client::{CampaignClient, CampaignClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{CampaignBlockingClient, CampaignBlockingClientBuilder};
