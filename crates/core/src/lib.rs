//! SmoothGen Core - Shared catalog types.
//!
//! This crate provides the types shared by the SmoothGen components:
//! - `generator` - Random product generation and catalog stores
//! - `cli` - Command-line entry point
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no randomness, no HTTP
//! clients. Generated records are plain data that any store can persist.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, status enums, product records, terms and slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
