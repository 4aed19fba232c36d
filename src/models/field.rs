use serde::{Deserialize, Serialize};

/// Query parameters shared by the field endpoints.
#[derive(Debug, Deserialize)]
pub struct FieldParams {
    /// Form field name (default: `text`).
    pub name: Option<String>,
}

impl FieldParams {
    pub fn field_name(&self) -> &str {
        self.name.as_deref().unwrap_or("text")
    }
}

/// Result of cleaning a submitted field value.
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanedFieldResponse {
    pub field: String,
    pub cleaned: String,
}
