//! Badge colours for claim authors.
//!
//! Each display name maps to one entry of a small pastel palette through a
//! rolling string hash, so a teammate keeps the same colour across sessions
//! and across every client that renders the dashboard.
//!
//! # Hash
//!
//! `hash = unit + (hash << 5) - hash`, accumulated over the UTF-16 code units
//! of the name. The shift operates on the low 32 bits of the accumulator (as a
//! signed 32-bit value) while the sum itself is kept wide; the palette index
//! is `|hash| mod palette_len`. Existing dashboards rely on these exact
//! values, so the recurrence must not change.

/// Background/foreground pair for an author badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeColor {
    pub label: &'static str,
    pub bg: &'static str,
    pub text: &'static str,
}

const NEUTRAL: BadgeColor = BadgeColor {
    label: "grey",
    bg: "#f7fafc",
    text: "#4a5568",
};

/// Name with a reserved colour outside the hashed palette (matched case-insensitively).
pub const RESERVED_NAME: &str = "yajuvendra";

const RESERVED: BadgeColor = BadgeColor {
    label: "blue",
    bg: "#ebf8ff",
    text: "#2b6cb0",
};

pub const PALETTE: [BadgeColor; 7] = [
    BadgeColor { label: "red", bg: "#fff5f5", text: "#c53030" },
    BadgeColor { label: "orange", bg: "#fffaf0", text: "#c05621" },
    BadgeColor { label: "yellow", bg: "#fffff0", text: "#b7791f" },
    BadgeColor { label: "green", bg: "#f0fff4", text: "#2f855a" },
    BadgeColor { label: "teal", bg: "#e6fffa", text: "#2c7a7b" },
    BadgeColor { label: "purple", bg: "#faf5ff", text: "#6b46c1" },
    BadgeColor { label: "pink", bg: "#fff5f7", text: "#b83280" },
];

/// Rolling hash of a display name.
pub fn name_hash(name: &str) -> i64 {
    name.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        i64::from(unit).wrapping_add(shifted).wrapping_sub(hash)
    })
}

/// Pick the badge colour for an author name.
pub fn badge_color(name: &str) -> BadgeColor {
    if name.is_empty() {
        return NEUTRAL;
    }
    if name.to_lowercase() == RESERVED_NAME {
        return RESERVED;
    }
    let idx = name_hash(name).unsigned_abs() % PALETTE.len() as u64;
    PALETTE[idx as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_values_match_existing_dashboards() {
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("Alex"), 2_043_454);
        assert_eq!(name_hash("Sam"), 82_879);
        assert_eq!(name_hash("Priya"), 77_382_607);
        assert_eq!(name_hash("Zoë"), 90_166);
    }

    #[test]
    fn hash_keeps_wide_accumulator() {
        // The sum leaves the 32-bit range while the shift wraps.
        assert_eq!(
            name_hash("Christopher Montgomery-Smithfield"),
            -3_810_955_476
        );
    }

    #[test]
    fn palette_index_from_hash() {
        assert_eq!(badge_color("Alex").label, "red");
        assert_eq!(badge_color("Priya").label, "orange");
        assert_eq!(badge_color("Sam").label, "pink");
        assert_eq!(badge_color("Christopher Montgomery-Smithfield").label, "pink");
    }

    #[test]
    fn empty_name_is_neutral() {
        assert_eq!(badge_color(""), NEUTRAL);
    }

    #[test]
    fn reserved_name_ignores_case() {
        assert_eq!(badge_color("Yajuvendra"), RESERVED);
        assert_eq!(badge_color("YAJUVENDRA"), RESERVED);
        assert_ne!(badge_color("Yajuvendra S"), RESERVED);
    }

    #[test]
    fn deterministic() {
        for name in ["Alex", "Sam", "Priya", "Dana", "李雷"] {
            assert_eq!(badge_color(name), badge_color(name));
            assert!(PALETTE.contains(&badge_color(name)));
        }
    }
}
