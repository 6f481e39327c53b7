//! Interval and charset algebra over Unicode code points
//!
//!     A [Charset] is an immutable, canonical set of code points: a sorted sequence of
//!     pairwise disjoint, never adjacent [CharRange] intervals. Every operation returns a
//!     new set, and every constructor re-sorts and coalesces its input, so two charsets
//!     covering the same code points always compare equal.
//!
//! Bracket Expression Text
//!
//!     Charsets have a stable text form modelled on the inside of a regex character class:
//!
//!         - `a-z0-9` is the union of two ranges.
//!         - A leading `^` (with something after it) complements the rest.
//!         - `\` escapes the following character. Only `\`, `^` and `-` need it.
//!         - Code points without a Rust `char` (surrogates) are written `\u{D800}`.
//!
//!     [Charset::to_pattern] and [Charset::from_pattern] round trip for every charset.

pub mod chars;
pub mod identifier;
pub mod range;

pub use identifier::{ID_CONTINUE, ID_START};
pub use range::{CharRange, Difference, MAX_CODE_POINT};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The empty set
pub static EMPTY: Charset = Charset { ranges: Vec::new() };

/// Every code point, `0..=0x10FFFF`
pub static FULL: Lazy<Charset> = Lazy::new(Charset::full);

/// Errors from [Charset::from_pattern]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharsetPatternError {
    /// The pattern ends with a lone `\`
    InvalidEndEscape,
    /// A `-` with nothing pending before it or nothing after it
    IncompleteRange { position: usize },
    /// `z-a` style range
    OutOfOrder { begin: u32, end: u32 },
}

impl fmt::Display for CharsetPatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharsetPatternError::InvalidEndEscape => write!(f, "Invalid end escape"),
            CharsetPatternError::IncompleteRange { position } => {
                write!(f, "Incomplete char range at {}", position)
            }
            CharsetPatternError::OutOfOrder { begin, end } => {
                write!(f, "Charset range out of order: {:#x}-{:#x}", begin, end)
            }
        }
    }
}

impl std::error::Error for CharsetPatternError {}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Charset {
    ranges: Vec<CharRange>,
}

impl Charset {
    pub fn empty() -> Self {
        Charset { ranges: Vec::new() }
    }

    pub fn full() -> Self {
        Charset {
            ranges: vec![CharRange::new(0, MAX_CODE_POINT)],
        }
    }

    /// Build from arbitrary intervals. The result is canonical.
    pub fn from_ranges(ranges: Vec<CharRange>) -> Self {
        Charset {
            ranges: CharRange::coalesce(ranges),
        }
    }

    pub fn from_chars(chars: &str) -> Self {
        Self::from_code_points(chars.chars().map(|c| c as u32))
    }

    pub fn from_code_points(code_points: impl IntoIterator<Item = u32>) -> Self {
        Self::from_ranges(code_points.into_iter().map(CharRange::single).collect())
    }

    /// Parse bracket expression text such as `^a-f123`.
    pub fn from_pattern(pattern: &str) -> Result<Self, CharsetPatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        if chars.is_empty() {
            return Ok(Charset::empty());
        }

        let mut i = 0;
        let mut exclude = false;
        if chars[0] == '^' && chars.len() > 1 {
            i = 1;
            exclude = true;
        }

        let mut pending: Vec<u32> = Vec::new();
        let mut ranges: Vec<CharRange> = Vec::new();
        while i < chars.len() {
            match chars[i] {
                '\\' => {
                    let (cp, next) = read_escape(&chars, i)?;
                    pending.push(cp);
                    i = next;
                }
                '-' => {
                    i += 1;
                    let begin = match pending.pop() {
                        Some(begin) if i < chars.len() => begin,
                        _ => return Err(CharsetPatternError::IncompleteRange { position: i }),
                    };
                    let (end, next) = if chars[i] == '\\' {
                        read_escape(&chars, i)?
                    } else {
                        (chars[i] as u32, i + 1)
                    };
                    if begin > end {
                        return Err(CharsetPatternError::OutOfOrder { begin, end });
                    }
                    ranges.push(CharRange::new(begin, end));
                    i = next;
                }
                c => {
                    pending.push(c as u32);
                    i += 1;
                }
            }
        }

        ranges.extend(pending.into_iter().map(CharRange::single));
        let charset = Charset::from_ranges(ranges);
        if exclude {
            Ok(charset.invert())
        } else {
            Ok(charset)
        }
    }

    pub fn to_pattern(&self) -> String {
        self.ranges.iter().map(|r| r.to_pattern()).collect()
    }

    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of code points in the set
    pub fn size(&self) -> u32 {
        self.ranges.iter().map(|r| r.size()).sum()
    }

    pub fn min_code_point(&self) -> Option<u32> {
        self.ranges.first().map(|r| r.begin())
    }

    pub fn max_code_point(&self) -> Option<u32> {
        self.ranges.last().map(|r| r.end())
    }

    pub fn include_char(&self, c: char) -> bool {
        self.include_code_point(c as u32)
    }

    pub fn include_code_point(&self, code_point: u32) -> bool {
        self.ranges
            .binary_search_by(|r| r.compare_code_point(code_point).reverse())
            .is_ok()
    }

    /// Whether one interval of the set covers the whole of `range`.
    pub fn include_range(&self, range: CharRange) -> bool {
        let index = self.ranges.partition_point(|r| r.end() < range.begin());
        self.ranges
            .get(index)
            .is_some_and(|r| range.is_subset_of(*r))
    }

    pub fn is_subset_of(&self, other: &Charset) -> bool {
        self.intersect(other) == *self
    }

    pub fn union(&self, other: &Charset) -> Charset {
        let (a, b) = (&self.ranges, &other.ranges);
        let mut merged = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i] <= b[j] {
                merged.push(a[i]);
                i += 1;
            } else {
                merged.push(b[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);
        Charset {
            ranges: CharRange::coalesce_sorted(merged),
        }
    }

    pub fn union_all<'a>(sets: impl IntoIterator<Item = &'a Charset>) -> Charset {
        sets.into_iter()
            .fold(Charset::empty(), |acc, set| acc.union(set))
    }

    pub fn intersect(&self, other: &Charset) -> Charset {
        let (a, b) = (&self.ranges, &other.ranges);
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (r1, r2) = (a[i], b[j]);
            match r1.intersect(r2) {
                None => {
                    if r1 < r2 {
                        i += 1;
                    } else {
                        j += 1;
                    }
                }
                Some(overlap) => {
                    out.push(overlap);
                    if r1.end() <= r2.end() {
                        i += 1;
                    }
                    if r2.end() <= r1.end() {
                        j += 1;
                    }
                }
            }
        }
        // pieces of canonical inputs are already disjoint and ordered
        Charset {
            ranges: CharRange::coalesce_sorted(out),
        }
    }

    pub fn subtract(&self, other: &Charset) -> Charset {
        let excluded = &other.ranges;
        let mut out = Vec::with_capacity(self.ranges.len());
        let mut j = 0;
        for range in &self.ranges {
            let (mut low, high) = (range.begin(), range.end());
            while j < excluded.len() && excluded[j].end() < low {
                j += 1;
            }
            let mut k = j;
            while low <= high && k < excluded.len() && excluded[k].begin() <= high {
                let ex = excluded[k];
                if ex.begin() > low {
                    out.push(CharRange::new(low, ex.begin() - 1));
                }
                low = ex.end() + 1;
                k += 1;
            }
            if low <= high {
                out.push(CharRange::new(low, high));
            }
        }
        Charset { ranges: out }
    }

    /// Complement against the full code point range.
    pub fn invert(&self) -> Charset {
        FULL.subtract(self)
    }

    pub fn to_code_points(&self, max_count: usize) -> Vec<u32> {
        self.ranges
            .iter()
            .flat_map(|r| r.to_code_points(max_count))
            .take(max_count)
            .collect()
    }
}

/// Read the escape starting at `chars[i] == '\\'`, returning the code point and the
/// index after the escape.
fn read_escape(chars: &[char], i: usize) -> Result<(u32, usize), CharsetPatternError> {
    let Some(&next) = chars.get(i + 1) else {
        return Err(CharsetPatternError::InvalidEndEscape);
    };
    if next == 'u' && chars.get(i + 2) == Some(&'{') {
        if let Some(close) = chars[i + 3..].iter().position(|&c| c == '}') {
            let hex: String = chars[i + 3..i + 3 + close].iter().collect();
            if let Ok(cp) = u32::from_str_radix(&hex, 16) {
                if !hex.is_empty() && cp <= MAX_CODE_POINT {
                    return Ok((cp, i + 4 + close));
                }
            }
        }
    }
    Ok((next as u32, i + 2))
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", chars::escape_non_alphanum(&self.to_pattern()))
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset[{}]", self)
    }
}
