//! Muse library exports for testing

pub mod cli;
pub mod core;
pub mod gateway;
pub mod tui;

#[cfg(test)]
pub mod test_support;

pub use crate::core::feature::Feature;
