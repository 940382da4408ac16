//! Pallet Calculator Tools module
//!
//! MCP tool implementations for the pallet calculator.

pub mod calculator;
pub mod catalog;
pub mod import;
pub mod manifest;
pub mod settings;
pub mod status;
