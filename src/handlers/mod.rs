// src/handlers/mod.rs

pub mod fields;
pub mod health;
pub mod sanitize;
