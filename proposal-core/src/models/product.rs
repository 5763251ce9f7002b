use serde::{Deserialize, Serialize};

/// Coating product line a proposal is priced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Gaco,
    Uniflex,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gaco => "Gaco",
            Self::Uniflex => "Uniflex",
        }
    }

    /// Parses the product name as it appears on the form and in the
    /// spreadsheet. Surrounding whitespace is ignored; anything else must
    /// match exactly.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Gaco" => Some(Self::Gaco),
            "Uniflex" => Some(Self::Uniflex),
            _ => None,
        }
    }

    /// Display text for an optional product, empty when unrecognised.
    pub fn label(product: Option<Self>) -> &'static str {
        product.map_or("", |p| p.as_str())
    }
}
