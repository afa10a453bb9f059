use std::collections::BTreeSet;

/// Normalizes a chemical symbol to its conventional capitalization: `"he"` and `"HE"` become
/// `"He"`. Surrounding whitespace is dropped.
pub fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Normalizes every symbol of a requested element set, dropping blanks.
pub fn normalize_symbols<I, S>(symbols: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    symbols
        .into_iter()
        .map(|s| normalize_symbol(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_symbol_capitalizes_the_first_letter_only() {
        assert_eq!(normalize_symbol("he"), "He");
        assert_eq!(normalize_symbol("HE"), "He");
        assert_eq!(normalize_symbol("h"), "H");
        assert_eq!(normalize_symbol("Li"), "Li");
    }

    #[test]
    fn normalize_symbol_trims_whitespace() {
        assert_eq!(normalize_symbol("  o "), "O");
        assert_eq!(normalize_symbol("   "), "");
    }

    #[test]
    fn normalize_symbols_deduplicates_after_normalization() {
        let set = normalize_symbols(["H", "h", " he", "", "HE"]);
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec!["H".to_string(), "He".to_string()]
        );
    }
}
