//! HTTP server for the vidshare account and engagement core.
//!
//! The binary in `main.rs` wires configuration, logging and metrics together;
//! everything it serves is built from [`api::create_router`].

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
