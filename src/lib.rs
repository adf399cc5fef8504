//! Salon-booking platform client core.
//!
//! This library implements the client side of a salon-booking web
//! application: a typed REST client over the platform backend plus the
//! view-model flows the page components need:
//! - Session/role resolution (cookie-based credentials)
//! - Catalog fetchers (services, workers, categories)
//! - Appointment booking flow (slot selection, stale-response guarding)
//! - Checkout discount summary (display-only, no discount math)
//! - Reward-ring progress computation
//! - Payment methods and card-number classification
//! - Admin analytics fetchers
//!
//! All entities are owned by the backend; this crate holds only transient,
//! in-memory copies for the duration of a view. Nothing is cached, queued,
//! or retried automatically.

#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod backend;
pub mod config;
pub mod error;
pub mod flows;
pub mod model;
pub mod view;

pub use backend::Backend;
pub use config::ClientConfig;
pub use error::ApiError;
