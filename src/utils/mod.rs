//! Utility functions and helpers.

pub mod command;
pub mod http;
