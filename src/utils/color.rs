//! Color parsing utilities

/// Parse an `RRGGBB` or `RGB` hex color, with or without a leading `#`
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.is_ascii() {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();

    match digits.len() {
        6 => {
            let byte = |i: usize| Some(nibble(i)? << 4 | nibble(i + 1)?);
            Some((byte(0)?, byte(2)?, byte(4)?))
        }
        // Short form repeats each digit: f -> ff
        3 => Some((nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
        _ => None,
    }
}
