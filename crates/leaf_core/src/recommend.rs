//! Static pesticide recommendations per class.

use crate::labels::DiseaseClass;

/// Returned for healthy leaves and for any label without an entry.
pub const NO_PESTICIDE_NEEDED: &str = "No pesticide needed. Leaf is Healthy!";

const DEFAULT_SUGGESTION: &[&str] = &[NO_PESTICIDE_NEEDED];

/// Interventions authored for `class`, in presentation order.
///
/// Only 17 classes carry an entry. Healthy classes and a handful of diseases
/// (citrus greening, sugarcane mosaic, rust and yellow leaf) have none.
pub fn recommendations(class: DiseaseClass) -> Option<&'static [&'static str]> {
    use DiseaseClass::*;

    let list: &'static [&'static str] = match class {
        AppleScab => &["Captan", "Mancozeb", "Thiophanate-methyl"],
        AppleBlackRot => &["Bordeaux mixture", "Captan", "Ziram"],
        AppleCedarRust => &["Captan", "Mancozeb", "Thiophanate-methyl"],
        CornGrayLeafSpot => &["Chlorothalonil", "Azoxystrobin", "Propiconazole"],
        CornCommonRust => &["Chlorothalonil", "Triazole fungicides"],
        CornNorthernLeafBlight => &["Azoxystrobin", "Pyraclostrobin", "Propiconazole"],
        GrapeBlackRot => &["Bordeaux mixture", "Mancozeb", "Captan"],
        GrapeEsca => &["Propiconazole", "Trifloxystrobin", "Boscalid"],
        GrapeLeafBlight => &["Mancozeb", "Captan", "Thiophanate-methyl"],
        OrangeCitrusCanker => &["Copper-based fungicides", "Streptomycin sulfate"],
        OrangeNutrientDeficiency => &["Nitrogen", "Potassium", "Magnesium fertilizers"],
        PotatoEarlyBlight => &["Chlorothalonil", "Mancozeb", "Copper-based fungicides"],
        PotatoLateBlight => &["Chlorothalonil", "Mancozeb", "Metalaxyl"],
        TomatoBacterialSpot => &["Copper-based fungicides", "Streptomycin sulfate"],
        TomatoEarlyBlight => &["Chlorothalonil", "Mancozeb", "Copper-based fungicides"],
        TomatoLateBlight => &["Chlorothalonil", "Mancozeb", "Metalaxyl"],
        SugarcaneRedRot => &["Chlorothalonil", "Mancozeb", "Copper-based fungicides"],
        _ => return None,
    };
    Some(list)
}

/// Suggestions for an already-resolved class. Never empty.
pub fn suggest_for(class: DiseaseClass) -> &'static [&'static str] {
    recommendations(class).unwrap_or(DEFAULT_SUGGESTION)
}

/// Suggestions for a raw label string. Never fails and never returns an
/// empty list: labels outside the table get the default message.
pub fn suggest(class_label: &str) -> &'static [&'static str] {
    match class_label.parse::<DiseaseClass>() {
        Ok(class) => suggest_for(class),
        Err(_) => DEFAULT_SUGGESTION,
    }
}

/// Render suggestions as a numbered list, one per line, starting at 1.
pub fn format_numbered<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn every_known_label_gets_a_non_empty_list() {
        for class in DiseaseClass::ALL {
            assert!(!suggest(class.as_str()).is_empty(), "{class}");
        }
    }

    #[test]
    fn seventeen_classes_have_entries() {
        let populated = DiseaseClass::ALL
            .iter()
            .filter(|c| recommendations(**c).is_some())
            .count();
        assert_eq!(populated, 17);
    }

    #[test]
    fn healthy_classes_have_no_entry() {
        for class in DiseaseClass::ALL.into_iter().filter(|c| c.is_healthy()) {
            assert_eq!(recommendations(class), None, "{class}");
            assert_eq!(suggest_for(class), &[NO_PESTICIDE_NEEDED]);
        }
    }

    #[rstest]
    #[case("Sugarcane__Healthy")]
    #[case("Sugarcane__Mosaic")]
    #[case("Orange___Haunglongbing_(Citrus_greening)")]
    #[case("unknown_label")]
    #[case("")]
    #[case("tomato___late_blight")]
    fn labels_without_entry_fall_back_to_default(#[case] label: &str) {
        assert_eq!(suggest(label), &[NO_PESTICIDE_NEEDED]);
    }

    #[rstest]
    #[case("Apple___Black_rot", &["Bordeaux mixture", "Captan", "Ziram"])]
    #[case("Corn_(maize)___Common_rust_", &["Chlorothalonil", "Triazole fungicides"])]
    #[case(
        "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
        &["Chlorothalonil", "Azoxystrobin", "Propiconazole"]
    )]
    #[case(
        "Orange_Citrus_Nutrient_Deficiency_Yellow_Leaf_Orange",
        &["Nitrogen", "Potassium", "Magnesium fertilizers"]
    )]
    #[case(
        "Sugarcane__RedRot",
        &["Chlorothalonil", "Mancozeb", "Copper-based fungicides"]
    )]
    fn known_entries_are_returned_in_order(#[case] label: &str, #[case] expected: &[&str]) {
        assert_eq!(suggest(label), expected);
    }

    #[test]
    fn suggest_is_deterministic() {
        for class in DiseaseClass::ALL {
            let first = suggest(class.as_str()).join("\n");
            let second = suggest(class.as_str()).join("\n");
            assert_eq!(first.as_bytes(), second.as_bytes());
        }
    }

    #[test]
    fn format_numbered_starts_at_one() {
        let text = format_numbered(suggest("Potato___Late_blight"));
        assert_eq!(text, "1. Chlorothalonil\n2. Mancozeb\n3. Metalaxyl");
        assert_eq!(
            format_numbered(suggest("Apple___healthy")),
            "1. No pesticide needed. Leaf is Healthy!"
        );
        assert_eq!(format_numbered::<&str>(&[]), "");
    }
}
