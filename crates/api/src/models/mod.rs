//! Domain types for the API.
//!
//! These are validated domain objects, separate from database row types and
//! from the request/response structs declared next to each route handler.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::Cart;
pub use order::{Order, OrderItem};
pub use product::Product;
pub use user::User;
