//! WebSale Core - Shared domain types and rules.
//!
//! This crate provides the domain model used across all WebSale components:
//! - `api` - The HTTP backend (catalog, cart, orders, customers, inventory)
//! - `cli` - Command-line tools for migrations and data management
//!
//! # Architecture
//!
//! The core crate contains only types and pure business rules - no I/O, no
//! database access, no HTTP. Repositories load rows into these types, apply
//! the rules here, and persist the result.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`cart`] - Cart line merging and totals
//! - [`pricing`] - Order subtotal, tax, and shipping computation
//! - [`inventory`] - Stock reservation bookkeeping
//! - [`events`] - Domain events emitted by services

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod events;
pub mod inventory;
pub mod pricing;
pub mod types;

pub use types::*;
