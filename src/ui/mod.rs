//! UI rendering module for the user table
//!
//! Maps application and controller state onto ratatui widgets.

pub mod help_overlay;
pub mod user_table;

pub use help_overlay::render as render_help_overlay;
pub use user_table::render_user_table;
