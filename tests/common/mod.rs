//! Common test utilities and helpers
//!
//! Shared between the integration test crates; not every crate uses every
//! helper.

#![allow(dead_code)]

pub mod assertion_helpers;
pub mod mock_services;
pub mod test_fixtures;
