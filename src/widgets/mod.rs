//! UI widgets for the TUI application
//!
//! This module contains all reusable UI components/widgets
//! used by the TUI for rendering different parts of the interface.

pub mod confirm_dialog;
pub mod contact_cards;
pub mod debounced_input;
pub mod log_panel;
pub mod submit_button;
