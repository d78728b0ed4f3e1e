//! Route tables

pub mod api;
pub mod public;
