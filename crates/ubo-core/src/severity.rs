//! # Ordinal Status Codes and Colour Bucketing
//!
//! Every raw status value in the dataset maps to one of five ordinal codes.
//! The code alone decides the colour a country is painted with. Both
//! mappings are closed: there are exactly five codes and exactly five
//! colours, and every `match` here is exhaustive.
//!
//! | Code | Meaning                     | Colour    |
//! |------|-----------------------------|-----------|
//! | 0    | Not applicable / no data    | `#9AC0D8` |
//! | 1    | Good (green)                | `#0BCEAB` |
//! | 2    | Fair (yellow)               | `#F6FF7A` |
//! | 3    | Poor (orange)               | `#FFD17A` |
//! | 4    | Bad (red)                   | `#FF4E4E` |

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// An ordinal status code in `0..=4`.
///
/// Serialises as its bare integer so it can sit directly in a Plotly `z`
/// array or a YAML registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    /// Code 0: not applicable.
    NotApplicable,
    /// Code 1: the transparent/compliant outcome.
    Good,
    /// Code 2.
    Fair,
    /// Code 3.
    Poor,
    /// Code 4: the least transparent outcome.
    Bad,
}

impl Severity {
    /// All codes in ascending order.
    pub const ALL: [Severity; 5] = [
        Self::NotApplicable,
        Self::Good,
        Self::Fair,
        Self::Poor,
        Self::Bad,
    ];

    /// The integer code.
    pub fn code(self) -> u8 {
        match self {
            Self::NotApplicable => 0,
            Self::Good => 1,
            Self::Fair => 2,
            Self::Poor => 3,
            Self::Bad => 4,
        }
    }

    /// The display colour for this code.
    pub fn color(self) -> &'static str {
        match self {
            Self::NotApplicable => "#9AC0D8",
            Self::Good => "#0BCEAB",
            Self::Fair => "#F6FF7A",
            Self::Poor => "#FFD17A",
            Self::Bad => "#FF4E4E",
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = LoadError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NotApplicable),
            1 => Ok(Self::Good),
            2 => Ok(Self::Fair),
            3 => Ok(Self::Poor),
            4 => Ok(Self::Bad),
            other => Err(LoadError::OrdinalOutOfRange(other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.code()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Colour bucketing as a free function.
pub fn color_for(severity: Severity) -> &'static str {
    severity.color()
}
