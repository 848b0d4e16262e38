//! View state for the storefront's interactive surfaces.
//!
//! Each view is an immutable state snapshot plus a pure `reduce` function
//! from (state, event) to new state, so the logic is testable without a
//! rendering surface. Views that own timers or talk to the store add a
//! thin async controller on top; every pending timer is cancelled when
//! its controller is dropped.
//!
//! # Views
//!
//! - [`catalog`] - Product browsing with category filter and likes
//! - [`stylist`] - The chat transcript with the delayed canned reply
//! - [`tryon`] - Single-select try-on studio with the processing timer
//! - [`analysis`] - The upload/analyze/persist pipeline state machine

pub mod analysis;
pub mod catalog;
pub mod stylist;
pub mod tryon;
