//! The fixed domain of substitutable text fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Name of a text field. The domain is shared by every template so callers
/// can always supply the same value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldName {
    Name,
    Account,
    Expiration,
}

impl FieldName {
    /// All field names in canonical order.
    pub const ALL: [FieldName; 3] = [FieldName::Name, FieldName::Account, FieldName::Expiration];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "NAME",
            FieldName::Account => "ACCOUNT",
            FieldName::Expiration => "EXPIRATION",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field name '{}'", s))
    }
}

/// Literal text per field, as supplied by the caller.
pub type FieldValues = HashMap<FieldName, String>;
