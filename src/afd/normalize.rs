use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold a Pokemon name for lookup: lowercase, accents stripped, compatibility characters
/// composed.  `"Flabébé"` and `"FLABEBE"` fold to the same key.
pub fn normalize(text: &str) -> String {
    let folded = text.trim().to_lowercase();
    let stripped: String = folded.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.nfkc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_and_accents() {
        assert_eq!(normalize("Flabébé"), "flabebe");
        assert_eq!(normalize("  FLABEBE "), "flabebe");
        assert_eq!(normalize("Pokémon"), normalize("pokemon"));
    }

    #[test]
    fn composes_compatibility_characters() {
        // Fullwidth letters fold to ASCII
        assert_eq!(normalize("Ｅｅｖｅｅ"), "eevee");
    }
}
