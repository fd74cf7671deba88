//! Guitar Quote - String Instrument Valuation Library
//!
//! Estimates the resale value of a string instrument from its category,
//! wood, string count, age and condition, and drives the terminal form
//! that collects those attributes.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
