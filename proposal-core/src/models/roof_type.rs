use std::fmt;

use serde::{Deserialize, Serialize};

/// Existing roof surface the coating goes over.
///
/// Unrecognised text is kept verbatim in [`RoofType::Other`] so that a change
/// between two unknown values is still detected, while every base lookup for
/// it falls back to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofType {
    TpoEpdm,
    Metal,
    ModBit,
    Ballasted60Mil,
    Ballasted45Mil,
    RockFoamCoat,
    Other(String),
}

impl RoofType {
    /// Every recognised roof type, in price-table order.
    pub const KNOWN: [RoofType; 6] = [
        RoofType::TpoEpdm,
        RoofType::Metal,
        RoofType::ModBit,
        RoofType::Ballasted60Mil,
        RoofType::Ballasted45Mil,
        RoofType::RockFoamCoat,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::TpoEpdm => "TPO/EPDM",
            Self::Metal => "Metal",
            Self::ModBit => "Mod Bit",
            Self::Ballasted60Mil => "Ballasted 60 mil",
            Self::Ballasted45Mil => "Ballasted 45 mil",
            Self::RockFoamCoat => "Rock/Foam/Coat",
            Self::Other(raw) => raw,
        }
    }

    /// Parses form or spreadsheet text. Never fails: unknown values become
    /// [`RoofType::Other`] with the trimmed input.
    ///
    /// Both `"Ballasted 60 mil"` and `"Ballasted 60mil"` spellings are accepted.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed {
            "TPO/EPDM" => Self::TpoEpdm,
            "Metal" => Self::Metal,
            "Mod Bit" => Self::ModBit,
            "Ballasted 60 mil" | "Ballasted 60mil" => Self::Ballasted60Mil,
            "Ballasted 45 mil" | "Ballasted 45mil" => Self::Ballasted45Mil,
            "Rock/Foam/Coat" => Self::RockFoamCoat,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn is_ballasted(&self) -> bool {
        matches!(self, Self::Ballasted60Mil | Self::Ballasted45Mil)
    }
}

impl Default for RoofType {
    /// A blank template has no roof type chosen yet.
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for RoofType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
