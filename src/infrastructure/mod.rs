//! Infrastructure layer providing external service integrations.
//!
//! This module contains the file exports and the system clipboard, the
//! only places where the application touches the outside world.

pub mod clipboard;
pub mod persistence;

pub use clipboard::*;
pub use persistence::*;
