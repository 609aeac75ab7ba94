//! Password strength scoring (0-100)

use crate::charset::{has_digit, has_lowercase, has_special, has_uppercase, utf16_len};

/// Highest possible score
pub const MAX_STRENGTH: u8 = 100;

const COMMON_SEQUENCES: [&str; 3] = ["123", "abc", "qwe"];

/// Score a password.
///
/// The score is additive: length up to 25, character variety up to 25,
/// bonuses for 12+ and 16+ characters, and 10 point penalties for a
/// character repeated three times in a row or a common keyboard sequence.
/// The result is clamped to `0..=100`.
pub fn password_strength(password: &str) -> u8 {
    let length = utf16_len(password);
    let mut score = i32::try_from(length.saturating_mul(4).min(25)).unwrap_or(25);

    if has_lowercase(password) {
        score += 5;
    }
    if has_uppercase(password) {
        score += 5;
    }
    if has_digit(password) {
        score += 5;
    }
    if has_special(password) {
        score += 10;
    }

    if has_repeated_run(password) {
        score -= 10;
    }
    if has_common_sequence(password) {
        score -= 10;
    }

    if length >= 12 {
        score += 10;
    }
    if length >= 16 {
        score += 10;
    }

    u8::try_from(score.clamp(0, i32::from(MAX_STRENGTH))).unwrap_or(0)
}

/// Three identical code units in a row. Line terminators never count.
fn has_repeated_run(password: &str) -> bool {
    let units: Vec<u16> = password.encode_utf16().collect();
    units
        .windows(3)
        .any(|w| w[0] == w[1] && w[1] == w[2] && !is_line_terminator(w[0]))
}

fn is_line_terminator(unit: u16) -> bool {
    matches!(unit, 0x000A | 0x000D | 0x2028 | 0x2029)
}

fn has_common_sequence(password: &str) -> bool {
    let lowered = password.to_ascii_lowercase();
    COMMON_SEQUENCES.iter().any(|seq| lowered.contains(seq))
}
