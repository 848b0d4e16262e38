//! Skin tone and undertone enumerations for the analysis feature.
//!
//! The wire representation is the capitalized English name ("Fair",
//! "Cool", ...) to match what the store's `skin_analysis` table holds.

use serde::{Deserialize, Serialize};

/// Skin tone classification produced by an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkinTone {
    Fair,
    Light,
    Medium,
    Tan,
    Deep,
}

impl SkinTone {
    /// Every tone the analysis can produce, in display order.
    pub const ALL: [Self; 5] = [Self::Fair, Self::Light, Self::Medium, Self::Tan, Self::Deep];

    /// The wire representation stored in the `skin_tone` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fair => "Fair",
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Tan => "Tan",
            Self::Deep => "Deep",
        }
    }
}

impl std::fmt::Display for SkinTone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Skin undertone classification produced by an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Undertone {
    Cool,
    Warm,
    Neutral,
}

impl Undertone {
    /// Every undertone the analysis can produce, in display order.
    pub const ALL: [Self; 3] = [Self::Cool, Self::Warm, Self::Neutral];

    /// The wire representation stored in the `undertone` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cool => "Cool",
            Self::Warm => "Warm",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Undertone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
