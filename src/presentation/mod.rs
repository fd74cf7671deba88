//! Presentation layer handling the terminal UI and user input.
//!
//! This module draws the valuation form with ratatui and translates
//! keyboard input into form events.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
