//! Shared newtype wrappers and enums.
//!
//! These types exist to prevent entire classes of bugs at compile time:
//! mixing up entity IDs, passing unvalidated email strings around, or
//! treating a major-unit price as a minor-unit amount.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId, UserId};
pub use money::{CurrencyCode, to_minor_units};
pub use status::OrderStatus;
