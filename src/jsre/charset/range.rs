//! Packed code point intervals
//!
//! A [CharRange] is a closed interval `begin..=end` of code points packed into one
//! integer key (`begin * 2^21 + end`). Ordering the packed key orders by begin first,
//! then by end, so sorting, comparison and hashing are all plain integer operations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::chars::code_point_escape;

/// Largest Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

const BITS: u32 = 21;
const MASK: u64 = (1 << BITS) - 1;

const ESCAPE: u32 = '\\' as u32;
const EXCLUDE: u32 = '^' as u32;
const HYPHEN: u32 = '-' as u32;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharRange(u64);

/// Result of subtracting one interval from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difference {
    /// The subtrahend covered the whole interval
    Empty,
    /// Disjoint (interval unchanged) or trimmed at one end
    One(CharRange),
    /// The subtrahend was strictly inside the interval
    Two(CharRange, CharRange),
}

impl CharRange {
    /// Pack `begin..=end`. Both bounds must be code points and `begin <= end`.
    pub fn new(begin: u32, end: u32) -> Self {
        debug_assert!(begin <= end, "char range out of order: {begin:#x} > {end:#x}");
        debug_assert!(end <= MAX_CODE_POINT, "code point out of range: {end:#x}");
        CharRange(((begin as u64) << BITS) | end as u64)
    }

    pub fn single(code_point: u32) -> Self {
        Self::new(code_point, code_point)
    }

    pub fn from_chars(begin: char, end: char) -> Self {
        Self::new(begin as u32, end as u32)
    }

    pub fn single_char(c: char) -> Self {
        Self::single(c as u32)
    }

    /// The packed key
    pub fn key(self) -> u64 {
        self.0
    }

    pub fn begin(self) -> u32 {
        ((self.0 >> BITS) & MASK) as u32
    }

    pub fn end(self) -> u32 {
        (self.0 & MASK) as u32
    }

    /// Number of code points covered
    pub fn size(self) -> u32 {
        self.end() - self.begin() + 1
    }

    pub fn is_single(self) -> bool {
        self.begin() == self.end()
    }

    pub fn contains(self, code_point: u32) -> bool {
        self.begin() <= code_point && code_point <= self.end()
    }

    pub fn contains_char(self, c: char) -> bool {
        self.contains(c as u32)
    }

    pub fn is_subset_of(self, other: CharRange) -> bool {
        other.begin() <= self.begin() && self.end() <= other.end()
    }

    /// Where a code point falls relative to this interval: `Less` below it,
    /// `Equal` inside it, `Greater` above it.
    pub fn compare_code_point(self, code_point: u32) -> Ordering {
        if code_point < self.begin() {
            Ordering::Less
        } else if code_point > self.end() {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// The overlapping part of two intervals.
    pub fn intersect(self, other: CharRange) -> Option<CharRange> {
        let (a1, a2) = (self.begin(), self.end());
        let (b1, b2) = (other.begin(), other.end());
        if b2 < a1 || a2 < b1 {
            return None;
        }
        Some(CharRange::new(a1.max(b1), a2.min(b2)))
    }

    /// Merge two intervals that overlap or touch.
    pub fn join(self, other: CharRange) -> Option<CharRange> {
        let (a1, a2) = (self.begin(), self.end());
        let (b1, b2) = (other.begin(), other.end());
        if b2 + 1 < a1 || a2 + 1 < b1 {
            return None;
        }
        Some(CharRange::new(a1.min(b1), a2.max(b2)))
    }

    pub fn subtract(self, other: CharRange) -> Difference {
        let (a1, a2) = (self.begin(), self.end());
        let (b1, b2) = (other.begin(), other.end());
        if b2 < a1 || a2 < b1 {
            return Difference::One(self);
        }
        let left = a1 < b1;
        let right = b2 < a2;
        match (left, right) {
            (true, true) => Difference::Two(CharRange::new(a1, b1 - 1), CharRange::new(b2 + 1, a2)),
            (true, false) => Difference::One(CharRange::new(a1, b1 - 1)),
            (false, true) => Difference::One(CharRange::new(b2 + 1, a2)),
            (false, false) => Difference::Empty,
        }
    }

    /// Sort and merge a list of intervals into canonical form: sorted, pairwise
    /// disjoint and never adjacent.
    pub fn coalesce(mut ranges: Vec<CharRange>) -> Vec<CharRange> {
        ranges.sort_unstable();
        ranges.dedup();
        Self::coalesce_sorted(ranges)
    }

    /// Merge pass for input already ordered by key.
    pub(crate) fn coalesce_sorted(ranges: Vec<CharRange>) -> Vec<CharRange> {
        let mut iter = ranges.into_iter();
        let Some(mut prev) = iter.next() else {
            return Vec::new();
        };
        let mut merged = Vec::new();
        for range in iter {
            match prev.join(range) {
                Some(joined) => prev = joined,
                None => {
                    merged.push(prev);
                    prev = range;
                }
            }
        }
        merged.push(prev);
        merged
    }

    /// Render in bracket-expression form. See [super::Charset::from_pattern].
    pub fn to_pattern(self) -> String {
        let (begin, end) = (self.begin(), self.end());
        let mut out = String::new();
        push_pattern_char(&mut out, begin);
        if begin == end {
            return out;
        }
        if begin + 1 != end {
            out.push('-');
        }
        push_pattern_char(&mut out, end);
        out
    }

    /// Enumerate covered code points, at most `max_count` of them.
    pub fn to_code_points(self, max_count: usize) -> impl Iterator<Item = u32> {
        (self.begin()..=self.end()).take(max_count)
    }
}

fn push_pattern_char(out: &mut String, code_point: u32) {
    if code_point == ESCAPE || code_point == EXCLUDE || code_point == HYPHEN {
        out.push('\\');
    }
    match char::from_u32(code_point) {
        Some(c) => out.push(c),
        // surrogates have no `char`, spell them as a code point escape
        None => out.push_str(&code_point_escape(code_point)),
    }
}

impl fmt::Debug for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharRange({:#x}..={:#x})", self.begin(), self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(a: char, b: char) -> CharRange {
        CharRange::from_chars(a, b)
    }

    #[test]
    fn test_pack_roundtrip() {
        let range = CharRange::new(0x41, MAX_CODE_POINT);
        assert_eq!(range.begin(), 0x41);
        assert_eq!(range.end(), MAX_CODE_POINT);
        assert_eq!(range.key(), 0x41 * 0x200000 + 0x10FFFF);
    }

    #[test]
    fn test_order_by_begin_then_end() {
        assert!(r('a', 'c') < r('a', 'd'));
        assert!(r('a', 'z') < r('b', 'b'));
    }

    #[test]
    fn test_intersect() {
        assert_eq!(r('a', 'f').intersect(r('d', 'z')), Some(r('d', 'f')));
        assert_eq!(r('a', 'z').intersect(r('d', 'f')), Some(r('d', 'f')));
        assert_eq!(r('a', 'c').intersect(r('d', 'f')), None);
    }

    #[test]
    fn test_join_adjacent() {
        assert_eq!(r('a', 'c').join(r('d', 'f')), Some(r('a', 'f')));
        assert_eq!(r('d', 'f').join(r('a', 'c')), Some(r('a', 'f')));
        assert_eq!(r('a', 'b').join(r('d', 'f')), None);
    }

    #[test]
    fn test_subtract_cases() {
        assert_eq!(r('a', 'c').subtract(r('x', 'z')), Difference::One(r('a', 'c')));
        assert_eq!(r('b', 'c').subtract(r('a', 'z')), Difference::Empty);
        assert_eq!(r('a', 'z').subtract(r('a', 'c')), Difference::One(r('d', 'z')));
        assert_eq!(r('a', 'z').subtract(r('x', 'z')), Difference::One(r('a', 'w')));
        assert_eq!(
            r('a', 'z').subtract(r('c', 'x')),
            Difference::Two(r('a', 'b'), r('y', 'z'))
        );
    }

    #[test]
    fn test_coalesce() {
        let merged = CharRange::coalesce(vec![r('x', 'z'), r('a', 'c'), r('d', 'f'), r('b', 'b')]);
        assert_eq!(merged, vec![r('a', 'f'), r('x', 'z')]);
    }

    #[test]
    fn test_to_pattern() {
        assert_eq!(r('a', 'a').to_pattern(), "a");
        assert_eq!(r('a', 'b').to_pattern(), "ab");
        assert_eq!(r('a', 'z').to_pattern(), "a-z");
        assert_eq!(r('-', '-').to_pattern(), "\\-");
        assert_eq!(r('\\', '^').to_pattern(), "\\\\-\\^");
        assert_eq!(CharRange::single(0xD800).to_pattern(), "\\u{D800}");
    }
}
