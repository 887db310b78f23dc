use std::collections::BTreeMap;

/// URL-safe identifier for an asset folder: "Helia 44 Catamaran" → "helia-44".
pub fn vessel_id(folder: &str) -> String {
    let mut tokens = folder
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>();
    if tokens.len() > 1 && tokens.last().is_some_and(|token| token == "catamaran") {
        tokens.pop();
    }

    let joined = tokens
        .join("-")
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-')
        .collect::<String>();

    joined
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && vessel_id(id) == id
}

pub fn display_name(folder: &str, table: &BTreeMap<String, String>) -> String {
    if let Some(name) = table.get(folder) {
        return name.clone();
    }

    let trimmed = folder.trim();
    let stem = match trimmed.len().checked_sub(" catamaran".len()) {
        Some(cut)
            if trimmed.is_char_boundary(cut)
                && trimmed[cut..].eq_ignore_ascii_case(" catamaran") =>
        {
            &trimmed[..cut]
        }
        _ => trimmed,
    };
    stem.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_drop_the_catamaran_suffix() {
        assert_eq!(vessel_id("Helia 44 Catamaran"), "helia-44");
        assert_eq!(vessel_id("Misbehaviour catamaran"), "misbehaviour");
        assert_eq!(vessel_id("Black Bird Heli"), "black-bird-heli");
        assert_eq!(vessel_id("Catamaran"), "catamaran");
    }

    #[test]
    fn ids_stay_url_safe() {
        assert_eq!(vessel_id("Queen  of Zanzibar"), "queen-of-zanzibar");
        assert_eq!(vessel_id("Sea & Sun's"), "sea-suns");
        assert!(is_valid_id("sunday-kinga"));
        assert!(!is_valid_id("Sunday Kinga"));
        assert!(!is_valid_id(""));
    }

    #[test]
    fn display_name_prefers_the_table() {
        let mut table = BTreeMap::new();
        table.insert("Amani Luxury".to_string(), "AMANI LUXURY CATAMARAN".to_string());
        assert_eq!(display_name("Amani Luxury", &table), "AMANI LUXURY CATAMARAN");
        assert_eq!(display_name("Ocean Pearl Catamaran", &table), "OCEAN PEARL");
        assert_eq!(display_name("Ocean Pearl", &table), "OCEAN PEARL");
    }
}
