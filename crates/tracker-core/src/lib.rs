//! Core types and trait definitions for the team tracker.
//!
//! Locations, teams, visits, plans and assignments, plus the
//! [`store::TrackerStore`] trait every backend implements. No HTTP or
//! database code lives here.

#![allow(async_fn_in_trait)]

pub mod error;
pub mod lifecycle;
pub mod location;
pub mod stats;
pub mod store;
pub mod team;
pub mod visit;

pub use error::{Error, Result};
