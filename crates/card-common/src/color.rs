//! Hex color parsing.

use crate::error::{CardError, CardResult};

/// 8-bit RGB triple.
pub type Rgb = (u8, u8, u8);

/// Parse a hex color string to RGB.
///
/// Accepts `rgb` or `rrggbb`, with or without a leading `#`. The short form
/// duplicates each digit, so `#abc` equals `#aabbcc`.
pub fn hex_to_rgb(hex: &str) -> CardResult<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CardError::InvalidColorFormat(hex.to_string()));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(CardError::InvalidColorFormat(hex.to_string())),
    };

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|_| CardError::InvalidColorFormat(hex.to_string()))
    };

    Ok((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format an RGB triple as a lowercase `#rrggbb` string.
pub fn rgb_to_hex((r, g, b): Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit() {
        assert_eq!(hex_to_rgb("#EDEFEA").unwrap(), (0xED, 0xEF, 0xEA));
        assert_eq!(hex_to_rgb("00ff80").unwrap(), (0, 255, 128));
    }

    #[test]
    fn test_three_digit_expands() {
        assert_eq!(hex_to_rgb("#abc").unwrap(), hex_to_rgb("#aabbcc").unwrap());
        assert_eq!(hex_to_rgb("fff").unwrap(), (255, 255, 255));
    }

    #[test]
    fn test_rejects_bad_input() {
        for bad in ["", "#", "#12", "#1234", "#1234567", "#ggg", "#+1+2+3", "#éé"] {
            match hex_to_rgb(bad) {
                Err(CardError::InvalidColorFormat(s)) => assert_eq!(s, bad),
                other => panic!("expected InvalidColorFormat for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_every_three_digit_form_equals_six_digit() {
        let digits = b"0123456789abcdef";
        for r in digits {
            for g in digits {
                for b in digits {
                    let (r, g, b) = (*r as char, *g as char, *b as char);
                    let short = format!("{}{}{}", r, g, b);
                    let long = format!("{r}{r}{g}{g}{b}{b}");
                    let expected = hex_to_rgb(&long).unwrap();

                    for candidate in [short.clone(), short.to_ascii_uppercase()] {
                        assert_eq!(hex_to_rgb(&candidate).unwrap(), expected, "{}", candidate);
                        assert_eq!(
                            hex_to_rgb(&format!("#{}", candidate)).unwrap(),
                            expected,
                            "#{}",
                            candidate
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_six_digit_round_trip() {
        // Every channel value in every position, in both cases
        for v in 0..=255u8 {
            for rgb in [(v, 0, 0), (0, v, 0), (0, 0, v), (v, 255 - v, v / 2)] {
                let hex = rgb_to_hex(rgb);
                assert_eq!(hex_to_rgb(&hex).unwrap(), rgb);

                let upper = hex.to_ascii_uppercase();
                assert_eq!(rgb_to_hex(hex_to_rgb(&upper).unwrap()), hex);
                assert_eq!(rgb_to_hex(hex_to_rgb(&upper[1..]).unwrap()), hex);
            }
        }
    }

    #[test]
    fn test_rgb_to_hex_normalizes() {
        assert_eq!(rgb_to_hex(hex_to_rgb("#EDEFEA").unwrap()), "#edefea");
        assert_eq!(rgb_to_hex((1, 2, 3)), "#010203");
    }
}
