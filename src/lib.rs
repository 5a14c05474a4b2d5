//! Rust client library for the Emerald campaign API.
//!
//! This crate provides a typed client for creating, listing, updating and
//! deleting advertising campaigns, plus the client-side state model that
//! keeps an editable draft, the campaign list and the account balance in
//! step with the server.

pub mod api;
pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod manager;
pub mod models;
