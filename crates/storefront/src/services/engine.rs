//! Analysis engine seam.
//!
//! The view layer only sees [`AnalysisEngine`]; today's implementation is
//! [`ShadeSampler`], which fakes a vision model by uniform sampling over
//! fixed enumerations. A real model slots in behind the same trait without
//! touching the views.

use rand::prelude::*;

use velvet_muse_core::{SkinTone, Undertone};

use crate::media::LocalImage;
use crate::store::rows::{AnalysisResults, Recommendations};

/// Foundation shades attached to every analysis result.
pub const FOUNDATION_SHADES: [&str; 3] = ["Ivory 110", "Natural Beige 220", "Warm Sand 320"];

/// Wardrobe colors attached to every analysis result.
pub const COLORS_TO_WEAR: [&str; 4] = ["Navy Blue", "Coral Pink", "Forest Green", "Burgundy"];

/// Skincare tips attached to every analysis result.
pub const SKINCARE_TIPS: [&str; 4] = [
    "Use a gentle cleanser twice daily",
    "Apply moisturizer with SPF in the morning",
    "Consider adding a vitamin C serum",
    "Use a hydrating night cream",
];

/// The outcome of analyzing one image, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnalysis {
    pub skin_tone: SkinTone,
    pub undertone: Undertone,
    pub analysis_results: AnalysisResults,
    pub recommendations: Recommendations,
}

/// Produces an analysis result for an uploaded image.
pub trait AnalysisEngine {
    /// Analyze one image.
    fn analyze(&self, image: &LocalImage) -> GeneratedAnalysis;
}

/// Samples a plausible-looking result instead of running a model.
///
/// Percentages land in `[0, 100)`, age appearance in `[20, 30)`, tone and
/// undertone uniformly over their enumerations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadeSampler;

impl AnalysisEngine for ShadeSampler {
    fn analyze(&self, _image: &LocalImage) -> GeneratedAnalysis {
        let mut rng = rand::rng();

        GeneratedAnalysis {
            skin_tone: SkinTone::ALL
                .choose(&mut rng)
                .copied()
                .unwrap_or(SkinTone::Medium),
            undertone: Undertone::ALL
                .choose(&mut rng)
                .copied()
                .unwrap_or(Undertone::Neutral),
            analysis_results: AnalysisResults {
                hydration_level: rng.random_range(0..100),
                oiliness: rng.random_range(0..100),
                sensitivity: rng.random_range(0..100),
                age_appearance: rng.random_range(20..30),
            },
            recommendations: Recommendations {
                foundation_shades: FOUNDATION_SHADES.map(String::from).to_vec(),
                colors_to_wear: COLORS_TO_WEAR.map(String::from).to_vec(),
                skincare_tips: SKINCARE_TIPS.map(String::from).to_vec(),
            },
        }
    }
}
