//! Seedgate Common: types shared by the crypto core and its adapters.

pub mod encoding;
pub mod error;
pub mod paths;
pub mod persist;
