//! Shared helpers for unit and integration testing

pub mod test_utils;
