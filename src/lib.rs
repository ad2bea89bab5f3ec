//! AccessRecon Library
//!
//! Reconciles functionality lists against a reference catalog and extracts
//! SoD risks introduced by newly added functionalities.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod risk;
pub mod sources;
pub mod utils;
