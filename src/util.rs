use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// First two digits of an O*NET-SOC code ("11-1011.00" -> 11), the SOC
/// major occupation group.
pub fn soc_major_group(code: &str) -> Option<u32> {
    code.split_once('-')
        .map(|(group, _rest)| group)
        .unwrap_or(code)
        .parse()
        .ok()
}

pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let digits = value.strip_prefix('#')?;

    match digits.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (channel, digit) in channels.iter_mut().zip(digits.chars()) {
                let nibble = digit.to_digit(16)? as u8;
                *channel = (nibble << 4) | nibble;
            }
            Some((channels[0], channels[1], channels[2]))
        }
        6 => {
            let parsed = u32::from_str_radix(digits, 16).ok()?;
            Some((
                ((parsed >> 16) & 0xff) as u8,
                ((parsed >> 8) & 0xff) as u8,
                (parsed & 0xff) as u8,
            ))
        }
        _ => None,
    }
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soc_major_group_reads_leading_digits() {
        assert_eq!(soc_major_group("11-1011.00"), Some(11));
        assert_eq!(soc_major_group("53-7121.00"), Some(53));
        assert_eq!(soc_major_group("29"), Some(29));
        assert_eq!(soc_major_group("not a code"), None);
    }

    #[test]
    fn parse_hex_color_accepts_short_and_long_forms() {
        assert_eq!(parse_hex_color("#000"), Some((0, 0, 0)));
        assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#4a90d9"), Some((0x4a, 0x90, 0xd9)));
        assert_eq!(parse_hex_color("4a90d9"), None);
        assert_eq!(parse_hex_color("#4a90"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x1, y1) = stable_pair("11-1011.00");
        let (x2, y2) = stable_pair("11-1011.00");
        assert_eq!((x1, y1), (x2, y2));
        assert!((-1.0..=1.0).contains(&x1));
        assert!((-1.0..=1.0).contains(&y1));
        assert_ne!(stable_pair("11-1011.00"), stable_pair("13-2011.01"));
    }
}
