//! UI rendering module for Chefify
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod results;

pub use help_overlay::render as render_help_overlay;
pub use results::render as render_results;
