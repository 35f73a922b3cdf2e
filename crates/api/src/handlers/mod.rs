//! Request handlers, one module per resource.

pub mod calendar;
pub mod items;
pub mod outfits;
pub mod tags;
pub mod uploads;
pub mod users;
