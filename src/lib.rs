pub mod api_client;
pub mod app;
pub mod config;
pub mod contact;
pub mod debouncer;
pub mod error;
pub mod message;
pub mod search;
pub mod selection;
pub mod state;
pub mod tui;
pub mod utils;
pub mod widgets;
