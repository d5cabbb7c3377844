/// An RGBA colour.  Alpha defaults to opaque when built from RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Lowercase `rrggbb`, also used as the name of uploaded colour emojis
    pub fn hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `rrggbb`, with or without a leading `#`
    pub fn from_hex(text: &str) -> Option<Rgba> {
        let hex = text.strip_prefix('#').unwrap_or(text);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Equal-weight average of every channel, ties rounded to even.  `None` when there is nothing
    /// to mix.
    pub fn mix(colours: &[Rgba]) -> Option<Rgba> {
        if colours.is_empty() {
            return None;
        }

        let count = colours.len() as f64;
        let channel = |pick: fn(&Rgba) -> u8| -> u8 {
            let sum: u32 = colours.iter().map(|c| pick(c) as u32).sum();
            (sum as f64 / count).round_ties_even() as u8
        };

        Some(Rgba {
            r: channel(|c| c.r),
            g: channel(|c| c.g),
            b: channel(|c| c.b),
            a: channel(|c| c.a),
        })
    }

    fn distance_sq(&self, other: &Rgba) -> u32 {
        let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }

    /// Index of the closest colour in `candidates`
    pub fn nearest(&self, candidates: &[Rgba]) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| self.distance_sq(c))
            .map(|(i, _)| i)
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixing_red_and_blue() {
        let mixed = Rgba::mix(&[Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)]).unwrap();
        assert_eq!(mixed, Rgba::rgb(128, 0, 128));
        assert_eq!(mixed.hex(), "800080");
    }

    #[test]
    fn mixing_rounds_ties_to_even() {
        let mixed = Rgba::mix(&[Rgba::rgb(0, 4, 255), Rgba::rgb(1, 1, 0)]).unwrap();
        assert_eq!(mixed, Rgba::rgb(0, 2, 128));
    }

    #[test]
    fn mixing_respects_alpha_and_count() {
        let mixed = Rgba::mix(&[
            Rgba::rgb(0, 0, 0),
            Rgba::rgb(0, 0, 0),
            Rgba {
                r: 255,
                g: 30,
                b: 3,
                a: 0,
            },
        ])
        .unwrap();
        assert_eq!(
            mixed,
            Rgba {
                r: 85,
                g: 10,
                b: 1,
                a: 170
            }
        );
        assert_eq!(Rgba::mix(&[]), None);
    }

    #[test]
    fn hex_both_ways() {
        let colour = Rgba::rgb(153, 109, 153);
        assert_eq!(Rgba::from_hex(&colour.to_string()), Some(colour));
        assert_eq!(Rgba::from_hex("996d99"), Some(colour));
        assert_eq!(Rgba::from_hex("#99"), None);
        assert_eq!(Rgba::from_hex("zz6d99"), None);
    }

    #[test]
    fn nearest_picks_closest() {
        let candidates = [Rgba::rgb(0, 0, 0), Rgba::rgb(255, 255, 255), Rgba::rgb(255, 0, 0)];
        assert_eq!(Rgba::rgb(200, 30, 40).nearest(&candidates), Some(2));
        assert_eq!(Rgba::rgb(10, 10, 10).nearest(&candidates), Some(0));
        assert_eq!(Rgba::rgb(10, 10, 10).nearest(&[]), None);
    }
}
