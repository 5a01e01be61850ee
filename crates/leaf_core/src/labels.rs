//! The class label table.
//!
//! Index `i` of the model output corresponds to `DiseaseClass::ALL[i]`. The
//! order is the one the classifier was trained with and must not be changed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::LeafError;

/// Number of classes the model distinguishes.
pub const LABEL_COUNT: usize = 28;

/// Plant species plus disease state, one per model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum DiseaseClass {
    AppleScab,
    AppleBlackRot,
    AppleCedarRust,
    AppleHealthy,
    CornGrayLeafSpot,
    CornCommonRust,
    CornNorthernLeafBlight,
    CornHealthy,
    GrapeBlackRot,
    GrapeEsca,
    GrapeLeafBlight,
    GrapeHealthy,
    OrangeCitrusCanker,
    OrangeNutrientDeficiency,
    OrangeHealthy,
    OrangeHuanglongbing,
    PotatoEarlyBlight,
    PotatoLateBlight,
    PotatoHealthy,
    SugarcaneHealthy,
    SugarcaneMosaic,
    SugarcaneRedRot,
    SugarcaneRust,
    SugarcaneYellow,
    TomatoBacterialSpot,
    TomatoEarlyBlight,
    TomatoLateBlight,
    TomatoHealthy,
}

impl DiseaseClass {
    /// All classes in model output order.
    pub const ALL: [DiseaseClass; LABEL_COUNT] = [
        Self::AppleScab,
        Self::AppleBlackRot,
        Self::AppleCedarRust,
        Self::AppleHealthy,
        Self::CornGrayLeafSpot,
        Self::CornCommonRust,
        Self::CornNorthernLeafBlight,
        Self::CornHealthy,
        Self::GrapeBlackRot,
        Self::GrapeEsca,
        Self::GrapeLeafBlight,
        Self::GrapeHealthy,
        Self::OrangeCitrusCanker,
        Self::OrangeNutrientDeficiency,
        Self::OrangeHealthy,
        Self::OrangeHuanglongbing,
        Self::PotatoEarlyBlight,
        Self::PotatoLateBlight,
        Self::PotatoHealthy,
        Self::SugarcaneHealthy,
        Self::SugarcaneMosaic,
        Self::SugarcaneRedRot,
        Self::SugarcaneRust,
        Self::SugarcaneYellow,
        Self::TomatoBacterialSpot,
        Self::TomatoEarlyBlight,
        Self::TomatoLateBlight,
        Self::TomatoHealthy,
    ];

    /// The label string exactly as it appeared in the training set.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppleScab => "Apple___Apple_scab",
            Self::AppleBlackRot => "Apple___Black_rot",
            Self::AppleCedarRust => "Apple___Cedar_apple_rust",
            Self::AppleHealthy => "Apple___healthy",
            Self::CornGrayLeafSpot => "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
            Self::CornCommonRust => "Corn_(maize)___Common_rust_",
            Self::CornNorthernLeafBlight => "Corn_(maize)___Northern_Leaf_Blight",
            Self::CornHealthy => "Corn_(maize)___healthy",
            Self::GrapeBlackRot => "Grape___Black_rot",
            Self::GrapeEsca => "Grape___Esca_(Black_Measles)",
            Self::GrapeLeafBlight => "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
            Self::GrapeHealthy => "Grape___healthy",
            Self::OrangeCitrusCanker => "Orange_Citrus_Canker_Diseases_Leaf",
            Self::OrangeNutrientDeficiency => {
                "Orange_Citrus_Nutrient_Deficiency_Yellow_Leaf_Orange"
            }
            Self::OrangeHealthy => "Orange_Healthy_Leaf",
            Self::OrangeHuanglongbing => "Orange___Haunglongbing_(Citrus_greening)",
            Self::PotatoEarlyBlight => "Potato___Early_blight",
            Self::PotatoLateBlight => "Potato___Late_blight",
            Self::PotatoHealthy => "Potato___healthy",
            Self::SugarcaneHealthy => "Sugarcane__Healthy",
            Self::SugarcaneMosaic => "Sugarcane__Mosaic",
            Self::SugarcaneRedRot => "Sugarcane__RedRot",
            Self::SugarcaneRust => "Sugarcane__Rust",
            Self::SugarcaneYellow => "Sugarcane__Yellow",
            Self::TomatoBacterialSpot => "Tomato___Bacterial_spot",
            Self::TomatoEarlyBlight => "Tomato___Early_blight",
            Self::TomatoLateBlight => "Tomato___Late_blight",
            Self::TomatoHealthy => "Tomato___healthy",
        }
    }

    /// Position of this class in the model output vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_healthy(self) -> bool {
        matches!(
            self,
            Self::AppleHealthy
                | Self::CornHealthy
                | Self::GrapeHealthy
                | Self::OrangeHealthy
                | Self::PotatoHealthy
                | Self::SugarcaneHealthy
                | Self::TomatoHealthy
        )
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label string that is not part of the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown class label `{0}`")]
pub struct UnknownLabel(pub String);

impl FromStr for DiseaseClass {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl From<DiseaseClass> for &'static str {
    fn from(class: DiseaseClass) -> Self {
        class.as_str()
    }
}

impl TryFrom<String> for DiseaseClass {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Check that a labels file shipped next to a model lists exactly the
/// built-in classes, in the same order.
pub fn verify_label_file(path: impl AsRef<Path>) -> Result<(), LeafError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| LeafError::model_load(path, format!("cannot read labels file: {e}")))?;
    let labels: Vec<&str> = raw
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if labels.len() != LABEL_COUNT {
        return Err(LeafError::model_load(
            path,
            format!(
                "labels file lists {} classes, expected {LABEL_COUNT}",
                labels.len()
            ),
        ));
    }
    for (class, found) in DiseaseClass::ALL.iter().zip(&labels) {
        if class.as_str() != *found {
            return Err(LeafError::model_load(
                path,
                format!(
                    "label {} is `{found}`, expected `{}`",
                    class.index(),
                    class.as_str()
                ),
            ));
        }
    }
    Ok(())
}
