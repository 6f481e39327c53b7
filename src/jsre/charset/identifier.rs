//! Identifier start/continue sets for group names
//!
//! Built once from the ICU `ID_Start` / `ID_Continue` property data, extended with the
//! extra characters JavaScript identifiers allow.

use once_cell::sync::Lazy;

use super::{CharRange, Charset};

/// `ID_Start` plus `$` and `_`
pub static ID_START: Lazy<Charset> = Lazy::new(|| {
    let ranges = icu_properties::sets::id_start()
        .iter_ranges()
        .map(|r| CharRange::new(*r.start(), *r.end()))
        .collect();
    Charset::from_ranges(ranges).union(&Charset::from_chars("$_"))
});

/// `ID_Continue` plus `$`, `_`, ZWNJ and ZWJ
pub static ID_CONTINUE: Lazy<Charset> = Lazy::new(|| {
    let ranges = icu_properties::sets::id_continue()
        .iter_ranges()
        .map(|r| CharRange::new(*r.start(), *r.end()))
        .collect();
    Charset::from_ranges(ranges).union(&Charset::from_chars("$_\u{200C}\u{200D}"))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_start() {
        assert!(ID_START.include_char('a'));
        assert!(ID_START.include_char('$'));
        assert!(ID_START.include_char('_'));
        assert!(ID_START.include_char('\u{4e2d}'));
        assert!(!ID_START.include_char('1'));
        assert!(!ID_START.include_char('-'));
    }

    #[test]
    fn test_id_continue() {
        assert!(ID_CONTINUE.include_char('1'));
        assert!(ID_CONTINUE.include_char('\u{200C}'));
        assert!(!ID_CONTINUE.include_char(' '));
        assert!(ID_START.is_subset_of(&ID_CONTINUE));
    }
}
