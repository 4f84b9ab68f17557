//! RocketShoes cart library.
//!
//! Client-side shopping cart state: add, remove and re-quantify products,
//! validated against live stock and persisted to a local key/value store.
//!
//! # Modules
//!
//! - [`store`] - [`CartStore`], the cart state container and its operations
//! - [`model`] - Products, stock records, cart entries
//! - [`api`] - Stock and catalog traits, HTTP and in-memory implementations
//! - [`storage`] - Durable key/value storage for the cart snapshot
//! - [`notify`] - User-facing success/error notifications
//! - [`config`] - Environment-based configuration
//! - [`error`] - Operation errors and their user-facing messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod storage;
pub mod store;

pub use error::{CartError, Operation};
pub use model::{Cart, CartEntry, Product, Stock, UpdateProductAmount};
pub use store::{CartStore, Collaborators};
