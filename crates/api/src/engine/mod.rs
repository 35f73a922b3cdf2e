//! Mutation coordination across the relational store and object storage.
//!
//! Contains the coordinator that sequences blob uploads against relational
//! transactions: upload first, then commit, with a compensating delete when
//! the transaction fails after the upload succeeded.

pub mod coordinator;

pub use coordinator::{commit_then_cleanup, upload_then_commit, PendingUpload};
