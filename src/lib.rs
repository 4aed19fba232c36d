// src/lib.rs

pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sanitizer;
pub mod state;

pub use routes::create_router;
pub use sanitizer::{Policy, Preset, SanitizeError, sanitize, sanitize_bytes};
