//! Biomarker key normalisation.

/// Map a free-text biomarker name ("C-peptide", "Total cholesterol") onto
/// the snake_case key vocabulary used by readings and reference ranges.
///
/// Only case, spaces and hyphens are normalised. Names such as "Apo A1" or
/// "ATP/ADP ratio" have no counterpart key and never match.
pub fn canonical_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("C-peptide"), "c_peptide");
        assert_eq!(canonical_key("Total cholesterol"), "total_cholesterol");
        assert_eq!(canonical_key("Vitamin D"), "vitamin_d");
        assert_eq!(canonical_key("LDL"), "ldl");
        assert_eq!(canonical_key("FGF-23"), "fgf_23");
        assert_eq!(canonical_key("Apo B"), "apo_b");
    }

    #[test]
    fn test_unmatched_names_stay_distinct() {
        assert_eq!(canonical_key("Apo A1"), "apo_a1");
        assert_eq!(canonical_key("ATP/ADP ratio"), "atp/adp_ratio");
    }
}
