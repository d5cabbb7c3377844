use super::colour::Rgba;

/// Select-menu value of the entry that asks for custom emojis.  Never painted.
pub const ADD_EMOJI_VALUE: &str = "emoji";

/// Discord allows at most 25 options in a select menu
pub const MAX_ENTRIES: usize = 25;

/// The built-in colours, in menu order
pub const BASE_COLOURS: [(&str, &str, Rgba); 9] = [
    ("Red", "🟥", Rgba::rgb(221, 46, 68)),
    ("Orange", "🟧", Rgba::rgb(244, 144, 12)),
    ("Yellow", "🟨", Rgba::rgb(253, 203, 88)),
    ("Green", "🟩", Rgba::rgb(120, 177, 89)),
    ("Blue", "🟦", Rgba::rgb(85, 172, 238)),
    ("Purple", "🟪", Rgba::rgb(170, 142, 214)),
    ("Brown", "🟫", Rgba::rgb(193, 105, 79)),
    ("Black", "⬛", Rgba::rgb(49, 55, 61)),
    ("White", "⬜", Rgba::rgb(230, 231, 232)),
];

// Built-in colours plus the "Add Emoji(s)" entry.  Custom entries start after these.
const FIRST_CUSTOM: usize = BASE_COLOURS.len() + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub label: String,
    /// What gets painted into cells
    pub value: String,
    /// Known colour, for mixing
    pub colour: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
    /// The palette was full; the oldest custom entry made room
    Replaced(PaletteEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

pub fn is_base_colour(value: &str) -> bool {
    BASE_COLOURS.iter().any(|(_, v, _)| *v == value)
}

impl Palette {
    pub fn new(background: &str) -> Self {
        let mut entries: Vec<PaletteEntry> = BASE_COLOURS
            .iter()
            .map(|(label, value, colour)| PaletteEntry {
                label: (*label).to_owned(),
                value: (*value).to_owned(),
                colour: Some(*colour),
            })
            .collect();
        entries.push(PaletteEntry {
            label: "Add Emoji(s)".to_owned(),
            value: ADD_EMOJI_VALUE.to_owned(),
            colour: None,
        });

        for entry in entries.iter_mut() {
            if entry.value == background {
                entry.label.push_str(" (base)");
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, value: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|entry| entry.value == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.get(value).is_some()
    }

    /// The entry the next addition would replace, if the palette is full
    pub fn next_eviction(&self) -> Option<&PaletteEntry> {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.get(FIRST_CUSTOM)
        } else {
            None
        }
    }

    pub fn add(&mut self, entry: PaletteEntry) -> AddOutcome {
        if self.contains(&entry.value) {
            return AddOutcome::AlreadyExists;
        }

        if self.entries.len() >= MAX_ENTRIES {
            let replaced = self.entries.remove(FIRST_CUSTOM);
            self.entries.push(entry);
            return AddOutcome::Replaced(replaced);
        }

        self.entries.push(entry);
        AddOutcome::Added
    }

    /// Colours of every built-in entry, in menu order
    pub fn base_colours() -> Vec<Rgba> {
        BASE_COLOURS.iter().map(|(_, _, colour)| *colour).collect()
    }
}

impl PaletteEntry {
    /// Entry for an emoji someone sent.  Custom emojis are labelled by name.
    pub fn emoji(value: &str) -> Self {
        let label = custom_emoji_name(value).unwrap_or(value);
        Self {
            label: label.to_owned(),
            value: value.to_owned(),
            colour: None,
        }
    }

    /// Entry for a mixed colour.  Without a matching guild emoji the nearest built-in square
    /// stands in for it.
    pub fn mixed(colour: Rgba, emoji: Option<String>) -> Self {
        let value = emoji.unwrap_or_else(|| {
            let nearest = colour.nearest(&Palette::base_colours()).unwrap_or(0);
            BASE_COLOURS[nearest].1.to_owned()
        });

        Self {
            label: colour.to_string(),
            value,
            colour: Some(colour),
        }
    }
}

/// Name of a `<:name:id>` or `<a:name:id>` custom emoji
fn custom_emoji_name(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('<')?.strip_suffix('>')?;
    let inner = inner.strip_prefix('a').unwrap_or(inner);
    let mut parts = inner.strip_prefix(':')?.split(':');
    let name = parts.next()?;
    let id = parts.next()?;

    let valid_name = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let valid_id = !id.is_empty() && id.chars().all(|c| c.is_ascii_digit());
    (valid_name && valid_id && parts.next().is_none()).then_some(name)
}

fn is_regional_indicator(c: char) -> bool {
    (0x1F1E6..=0x1F1FF).contains(&(c as u32))
}

// Longest emoji sequence in code points (kiss with two skin tones), with headroom
const LONGEST_EMOJI: usize = 12;

/// The fully-qualified unicode emoji at the start of `chars`, and how many chars it covers.
/// Bare symbols like `©` or `→` do not count; Discord does not accept them as emojis.
fn unicode_emoji_at(chars: &[char]) -> Option<(String, usize)> {
    (1..=chars.len().min(LONGEST_EMOJI)).rev().find_map(|len| {
        let candidate: String = chars[..len].iter().collect();
        emojis::get(&candidate)
            .filter(|emoji| emoji.as_str() == candidate)
            .map(|_| (candidate, len))
    })
}

/// Whether `value` can be shown as a select menu emoji
pub fn is_emoji(value: &str) -> bool {
    if custom_emoji_name(value).is_some() {
        return true;
    }
    let chars: Vec<char> = value.chars().collect();
    match chars.as_slice() {
        [c] if is_regional_indicator(*c) => true,
        _ => unicode_emoji_at(&chars).is_some_and(|(_, len)| len == chars.len()),
    }
}

/// Every emoji in `text`, in order.  Custom emojis are kept whole, unicode emojis are matched
/// longest first, and regional indicators count one letter at a time.
pub fn parse_emojis(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut found = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '<' {
            if let Some(len) = chars[i..].iter().position(|&c| c == '>') {
                let candidate: String = chars[i..=i + len].iter().collect();
                if custom_emoji_name(&candidate).is_some() {
                    found.push(candidate);
                    i += len + 1;
                    continue;
                }
            }
        }

        if is_regional_indicator(c) {
            found.push(c.to_string());
            i += 1;
            continue;
        }

        match unicode_emoji_at(&chars[i..]) {
            Some((emoji, len)) => {
                found.push(emoji);
                i += len;
            }
            None => i += 1,
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(n: usize) -> PaletteEntry {
        PaletteEntry {
            label: format!("custom{}", n),
            value: format!("<:custom{}:{}>", n, 1000 + n),
            colour: None,
        }
    }

    #[test]
    fn background_is_labelled_base() {
        let palette = Palette::new("⬜");
        assert_eq!(palette.get("⬜").unwrap().label, "White (base)");
        assert_eq!(palette.get("🟥").unwrap().label, "Red");
        assert_eq!(palette.entries().len(), FIRST_CUSTOM);
        assert!(palette.contains(ADD_EMOJI_VALUE));
    }

    #[test]
    fn duplicates_are_not_added() {
        let mut palette = Palette::new("⬜");
        assert_eq!(palette.add(custom(0)), AddOutcome::Added);
        assert_eq!(palette.add(custom(0)), AddOutcome::AlreadyExists);
        let red = palette.get("🟥").unwrap().clone();
        assert_eq!(palette.add(red), AddOutcome::AlreadyExists);
    }

    #[test]
    fn mixed_entry_falls_back_to_nearest_square() {
        let purple = Rgba::rgb(153, 109, 153);
        let entry = PaletteEntry::mixed(purple, None);
        assert_eq!(entry.label, "#996d99");
        assert_eq!(entry.value, "🟪");

        let entry = PaletteEntry::mixed(purple, Some("<:996d99:77>".to_owned()));
        assert_eq!(entry.value, "<:996d99:77>");
        assert_eq!(entry.colour, Some(purple));
    }

    #[test]
    fn finds_emojis_among_text() {
        assert_eq!(parse_emojis("😎 I like turtles 🐢"), vec!["😎", "🐢"]);
        assert_eq!(
            parse_emojis("<:pika:123><a:dance:456> and <not:an emoji>"),
            vec!["<:pika:123>", "<a:dance:456>"]
        );
        assert_eq!(parse_emojis("👍🏽❤️1️⃣ 42"), vec!["👍🏽", "❤️", "1️⃣"]);
        assert_eq!(parse_emojis("👨\u{200d}👩\u{200d}👧"), vec!["👨\u{200d}👩\u{200d}👧"]);
        assert_eq!(parse_emojis("🇺🇸"), vec!["🇺", "🇸"]);
        assert!(parse_emojis("plain words").is_empty());
    }

    #[test]
    fn symbols_are_not_emojis() {
        assert!(parse_emojis("a → b ■ © ™ ↑ ⌂").is_empty());
        assert!(!is_emoji("©"));
        assert!(!is_emoji("→"));
        assert!(!is_emoji("🐢🐢"));
        assert!(is_emoji("🐢"));
        assert!(is_emoji("<:pika:123>"));
        assert!(is_emoji("🇺"));
    }

    #[test]
    fn qualified_symbol_emojis_are_kept() {
        assert_eq!(
            parse_emojis("Ⓜ️ ⤴️ 🏳️\u{200d}🌈"),
            vec!["Ⓜ️", "⤴️", "🏳️\u{200d}🌈"]
        );
    }

    #[test]
    fn emoji_entries_are_labelled() {
        assert_eq!(PaletteEntry::emoji("<:pika:123>").label, "pika");
        assert_eq!(PaletteEntry::emoji("🐢").label, "🐢");
    }

    #[test]
    fn full_palette_replaces_oldest_custom_entry() {
        let mut palette = Palette::new("⬜");
        let room = MAX_ENTRIES - FIRST_CUSTOM;
        for n in 0..room {
            assert_eq!(palette.add(custom(n)), AddOutcome::Added);
        }
        assert_eq!(palette.entries().len(), MAX_ENTRIES);
        assert_eq!(palette.next_eviction(), Some(&custom(0)));

        assert_eq!(palette.add(custom(room)), AddOutcome::Replaced(custom(0)));
        assert_eq!(palette.entries().len(), MAX_ENTRIES);
        assert!(!palette.contains(&custom(0).value));
        assert_eq!(palette.entries().last(), Some(&custom(room)));
        // Built-in colours are never evicted
        assert!(palette.contains("🟥"));
        assert!(palette.contains(ADD_EMOJI_VALUE));
    }
}
