use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque sRGB display color.
///
/// Serializes as a `#RRGGBB` string, the form the map style language expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Builds a color from a packed `0xRRGGBB` literal.
    pub const fn hex(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Parses `#RGB` or `#RRGGBB` (leading `#` optional).
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        // `from_str_radix` would also take a leading sign.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::hex),
            3 => {
                let mut expanded = String::with_capacity(6);
                for c in digits.chars() {
                    expanded.push(c);
                    expanded.push(c);
                }
                u32::from_str_radix(&expanded, 16).ok().map(Self::hex)
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {text:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_literal_and_string_agree() {
        let c = Color::hex(0xE07AAE);
        assert_eq!(
            c,
            Color {
                r: 0xE0,
                g: 0x7A,
                b: 0xAE
            }
        );
        assert_eq!(c.to_hex(), "#E07AAE");
        assert_eq!(Color::parse("#e07aae"), Some(c));
    }

    #[test]
    fn parses_short_form() {
        assert_eq!(Color::parse("#222"), Some(Color::hex(0x222222)));
        assert_eq!(Color::parse("#22"), None);
        assert_eq!(Color::parse("#zzzzzz"), None);
    }

    #[test]
    fn rejects_signed_digits() {
        assert_eq!(Color::parse("+12345"), None);
        assert_eq!(Color::parse("#+12345"), None);
        assert_eq!(Color::parse("#+12"), None);
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::hex(0x17B657)).expect("serialize");
        assert_eq!(json, "\"#17B657\"");
        let back: Color = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Color::hex(0x17B657));
    }
}
