use serde::{Deserialize, Serialize};
use std::fmt;

/// CPF/CNPJ document number, stored digits-only.
///
/// The raw value must never appear in logs; `Display` and `masked()` show at
/// most the last 4 digits. Use `raw()` only when building an outbound wire
/// payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document(String);

impl Document {
    /// Strip every non-digit character from the input.
    pub fn new(value: &str) -> Self {
        Self(value.chars().filter(|c| c.is_ascii_digit()).collect())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// `"***"` followed by the last 4 digits.
    pub fn masked(&self) -> String {
        let start = self.0.len().saturating_sub(4);
        format!("***{}", &self.0[start..])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Masks the raw value; safe to embed in log statements.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({})", self.masked())
    }
}
