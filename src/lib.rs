//! Pallet Calculator Library
//!
//! Unit conversion, pallet packing math, and a SQLite-backed catalog and
//! manifest for estimating shipments.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod packing;
pub mod tools;
pub mod units;
