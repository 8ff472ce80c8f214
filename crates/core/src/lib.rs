//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All validation rules and balance calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Request validation and balance arithmetic

pub mod ledger;
