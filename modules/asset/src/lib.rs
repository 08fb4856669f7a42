//! The asset register: assets, and the locations they are kept at.

pub mod endpoints;
pub mod model;
pub mod service;

mod error;

pub use error::Error;
