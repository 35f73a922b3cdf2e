//! Wardrobe API server library.
//!
//! The binary entrypoint and the integration tests both assemble the app
//! from these pieces: configuration, shared state, the route tree, and
//! the upload/transaction coordination in [`engine`].

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
