//! Character class checks shared by password validation and scoring.
//!
//! Classes are ASCII-only and lengths are counted in UTF-16 code units, the
//! way the browser measures the same input.

pub(crate) fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

pub(crate) fn has_lowercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
}

pub(crate) fn has_uppercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_uppercase())
}

pub(crate) fn has_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

pub(crate) fn has_special(value: &str) -> bool {
    value.chars().any(|c| !c.is_ascii_alphanumeric())
}
