// src/models/mod.rs

pub mod field;
pub mod sanitize;
