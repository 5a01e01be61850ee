//! Rendering of diagnoses for the terminal.

use leaf_core::{Diagnosis, format_numbered};
use serde::Serialize;
use std::path::Path;

/// One JSON line per image.
#[derive(Debug, Serialize)]
pub struct ReportRow<'a> {
    pub file: &'a Path,
    #[serde(flatten)]
    pub outcome: Outcome<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome<'a> {
    Diagnosed {
        label: &'static str,
        confidence: f32,
        suggestions: &'a [&'static str],
    },
    Failed {
        error: String,
    },
}

impl<'a> Outcome<'a> {
    pub fn from_diagnosis(diagnosis: &'a Diagnosis) -> Self {
        Outcome::Diagnosed {
            label: diagnosis.label(),
            confidence: diagnosis.confidence,
            suggestions: diagnosis.suggestions,
        }
    }
}

pub fn render_text(file: &Path, diagnosis: &Diagnosis) -> String {
    format!(
        "{}\n  Detected disease: {} ({:.1}%)\n  Pesticide suggestions:\n{}",
        file.display(),
        diagnosis.label(),
        diagnosis.confidence * 100.0,
        indent(&format_numbered(diagnosis.suggestions), "    ")
    )
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaf_core::{DiseaseClass, suggest_for};

    fn diagnosis(class: DiseaseClass) -> Diagnosis {
        Diagnosis {
            class,
            confidence: 0.875,
            suggestions: suggest_for(class),
        }
    }

    #[test]
    fn text_lists_numbered_suggestions() {
        let out = render_text(
            Path::new("leaf.jpg"),
            &diagnosis(DiseaseClass::TomatoBacterialSpot),
        );
        assert_eq!(
            out,
            "leaf.jpg\n  Detected disease: Tomato___Bacterial_spot (87.5%)\n  Pesticide suggestions:\n    1. Copper-based fungicides\n    2. Streptomycin sulfate"
        );
    }

    #[test]
    fn json_row_flattens_outcome() -> anyhow::Result<()> {
        let d = diagnosis(DiseaseClass::AppleHealthy);
        let row = ReportRow {
            file: Path::new("a.png"),
            outcome: Outcome::from_diagnosis(&d),
        };
        let value: serde_json::Value = serde_json::to_value(&row)?;
        assert_eq!(value["file"], "a.png");
        assert_eq!(value["label"], "Apple___healthy");
        assert_eq!(value["suggestions"][0], "No pesticide needed. Leaf is Healthy!");

        let failed = ReportRow {
            file: Path::new("b.png"),
            outcome: Outcome::Failed {
                error: "input is not a decodable image".into(),
            },
        };
        let value = serde_json::to_value(&failed)?;
        assert_eq!(value["error"], "input is not a decodable image");
        assert!(value.get("label").is_none());
        Ok(())
    }
}
