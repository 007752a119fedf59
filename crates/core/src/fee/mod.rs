//! Student fee payment state machine.
//!
//! A fee record moves `unpaid -> partial -> paid` as payments
//! accumulate against its fee structure's amount. There is no reverse
//! transition; refunds and chargebacks are not modeled.

mod error;
mod service;
mod status;

pub use error::FeeError;
pub use service::{FeeService, PaymentOutcome};
pub use status::FeeStatus;

#[cfg(test)]
#[path = "service_props.rs"]
mod service_props;
