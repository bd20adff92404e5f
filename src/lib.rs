// Public API for integration tests and potential library usage

pub mod api;
pub mod app;
pub mod config;
pub mod dataset;
pub mod protocol;
pub mod session;
pub mod share;
pub mod state;
pub mod timer;
pub mod types;
pub mod ws;
