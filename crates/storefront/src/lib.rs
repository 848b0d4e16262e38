//! Velvet Muse Storefront - headless client layer.
//!
//! This crate is the presentation layer of the Velvet Muse storefront with
//! the rendering shell stripped away: every view is an immutable state
//! snapshot plus a pure reducer, with a thin async controller on top where
//! a view owns timers or talks to the backing store. A UI embeds these
//! types and draws whatever the snapshots say.
//!
//! # Architecture
//!
//! - [`store`] - REST client for the backing store (object storage plus
//!   row insert/select/update/delete, scoped to the signed-in identity)
//! - [`views`] - Catalog, stylist chat, virtual try-on, and skin analysis
//!   view state with reducers and controllers
//! - [`services`] - The mocked analysis engine and checkout orchestration
//! - [`auth`] - The signed-in identity handle (authentication itself is
//!   delegated to the backing store's auth service)
//!
//! # Concurrency
//!
//! Reducers are pure and synchronous. The only suspension points are the
//! fixed-delay timers simulating stylist/try-on latency - always cancelled
//! when their view is dropped - and sequentially awaited store round-trips.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod notify;
pub mod services;
pub mod state;
pub mod store;
pub mod views;
