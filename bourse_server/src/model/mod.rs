//! Domain models of the payment flow.
//!
//! - `plans`: the fixed challenge plans and their terms.
//! - `challenge`: records written when a payment is verified.

pub mod challenge;
pub mod plans;
