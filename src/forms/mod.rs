// src/forms/mod.rs

pub mod field;
pub mod widget;

pub use field::{Field, FieldError, FieldKind};
pub use widget::WysiwygWidget;
