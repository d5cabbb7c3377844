use super::palette::BASE_COLOURS;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Highlighted look of each built-in colour while under the cursor
pub const DEFAULT_CURSOR: [(&str, &str); 9] = [
    ("🟥", "🔴"),
    ("🟧", "🟠"),
    ("🟨", "🟡"),
    ("🟩", "🟢"),
    ("🟦", "🔵"),
    ("🟪", "🟣"),
    ("🟫", "🟤"),
    ("⬛", "⚫"),
    ("⬜", "⚪"),
];

/// Two-way mapping between a cell value and its look under the cursor.
///
/// Values without a mapping are drawn as-is under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorMap {
    highlight: HashMap<String, String>,
    base: HashMap<String, String>,
}

impl Default for CursorMap {
    fn default() -> Self {
        let pairs = DEFAULT_CURSOR
            .iter()
            .map(|(base, highlight)| ((*base).to_owned(), (*highlight).to_owned()));
        Self::from_pairs_unchecked(pairs)
    }
}

impl CursorMap {
    /// Build a mapping, rejecting one that is ambiguous in either direction or does not cover
    /// every built-in colour.
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let mut highlight = HashMap::new();
        let mut base = HashMap::new();

        for (b, h) in pairs {
            if b == h {
                return Err(Error::InvalidArgument(format!(
                    "Cursor for {} must differ from the value itself",
                    b
                )));
            }
            if highlight.insert(b.clone(), h.clone()).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "{} has more than one cursor",
                    b
                )));
            }
            if base.insert(h.clone(), b.clone()).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "Cursor {} is used by more than one value",
                    h
                )));
            }
        }

        if let Some(h) = base.keys().find(|h| highlight.contains_key(*h)) {
            return Err(Error::InvalidArgument(format!(
                "{} is both a value and a cursor",
                h
            )));
        }

        if let Some((_, missing, _)) = BASE_COLOURS
            .iter()
            .find(|(_, value, _)| !highlight.contains_key(*value))
        {
            return Err(Error::InvalidArgument(format!(
                "No cursor configured for {}",
                missing
            )));
        }

        Ok(Self { highlight, base })
    }

    /// The defaults with some entries replaced
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self> {
        let mut merged: HashMap<String, String> = DEFAULT_CURSOR
            .iter()
            .map(|(b, h)| ((*b).to_owned(), (*h).to_owned()))
            .collect();
        merged.extend(overrides.iter().map(|(b, h)| (b.clone(), h.clone())));
        Self::new(merged)
    }

    fn from_pairs_unchecked(pairs: impl Iterator<Item = (String, String)>) -> Self {
        let mut highlight = HashMap::new();
        let mut base = HashMap::new();
        for (b, h) in pairs {
            base.insert(h.clone(), b.clone());
            highlight.insert(b, h);
        }
        Self { highlight, base }
    }

    pub fn highlight<'a>(&'a self, value: &'a str) -> &'a str {
        self.highlight.get(value).map(String::as_str).unwrap_or(value)
    }

    pub fn unhighlight<'a>(&'a self, value: &'a str) -> &'a str {
        self.base.get(value).map(String::as_str).unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(b, h)| ((*b).to_owned(), (*h).to_owned()))
            .collect()
    }

    #[test]
    fn default_passes_validation() {
        assert_eq!(CursorMap::new(pairs(&DEFAULT_CURSOR)), Ok(CursorMap::default()));
    }

    #[test]
    fn maps_both_ways() {
        let map = CursorMap::default();
        assert_eq!(map.highlight("🟥"), "🔴");
        assert_eq!(map.unhighlight("🔴"), "🟥");
        // Unmapped values pass through
        assert_eq!(map.highlight("🐢"), "🐢");
        assert_eq!(map.unhighlight("🐢"), "🐢");
    }

    #[test]
    fn rejects_incomplete_mapping() {
        let err = CursorMap::new(pairs(&DEFAULT_CURSOR[..8])).unwrap_err();
        assert_eq!(err, Error::InvalidArgument("No cursor configured for ⬜".to_owned()));
    }

    #[test]
    fn rejects_shared_cursor() {
        let mut list = DEFAULT_CURSOR.to_vec();
        list[1] = ("🟧", "🔴");
        assert!(CursorMap::new(pairs(&list)).is_err());
    }

    #[test]
    fn rejects_value_that_is_also_a_cursor() {
        let mut list = DEFAULT_CURSOR.to_vec();
        list.push(("🔴", "❤️"));
        assert!(CursorMap::new(pairs(&list)).is_err());
    }

    #[test]
    fn overrides_replace_defaults() {
        let overrides = HashMap::from([("🟥".to_owned(), "❤️".to_owned())]);
        let map = CursorMap::with_overrides(&overrides).unwrap();
        assert_eq!(map.highlight("🟥"), "❤️");
        assert_eq!(map.unhighlight("🔴"), "🔴");
    }
}
