//! Bounded, index-addressed channel history.

pub mod log;

pub use log::BoundedIndexedLog;
