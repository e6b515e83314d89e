//! Pomelo Core - Shared types and cart pricing logic.
//!
//! This crate provides the types and pure logic used across all Pomelo
//! components:
//! - `api` - Public JSON API (users, catalog, carts, orders, checkout)
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. In particular the cart join/pricing
//! logic in [`cart`] operates on plain data so it can be tested without a
//! storage engine: the API layer fetches cart lines and the referenced
//! products, and this crate joins and prices them in memory.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, money, and statuses
//! - [`cart`] - Cart resolution, pricing, and checkout line-item assembly

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
