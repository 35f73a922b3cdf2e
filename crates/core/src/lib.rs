//! Domain logic for the wardrobe platform.
//!
//! Everything in this crate is pure: no I/O, no database access. The `db`
//! and `api` crates build on the types and rules defined here.

pub mod calendar;
pub mod composition;
pub mod error;
pub mod tag;
pub mod types;
