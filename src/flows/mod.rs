//! View-model flows backing the page components.

pub mod booking;
pub mod checkout;
pub mod signup;
