//! Application layer managing form state and result presentation.
//!
//! This module coordinates between the pricing domain and the terminal
//! front end: it tracks which fields are enabled, turns submit attempts
//! into display-ready outcomes, and holds the interactive session state.

pub mod form;
pub mod presenter;
pub mod state;

pub use form::*;
pub use presenter::*;
pub use state::*;
