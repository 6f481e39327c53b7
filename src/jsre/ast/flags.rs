//! Pattern flags
//!
//! [RegexFlags] parses the short flag string that follows a pattern (`"gu"`), leniently
//! with [RegexFlags::parse] or reporting unknown letters with [RegexFlags::parse_strict].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pattern flags. `x` (extended) is accepted here although the dialect grammar
/// does not change its syntax for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegexFlags {
    pub unicode: bool,
    pub dot_all: bool,
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub sticky: bool,
    pub extended: bool,
}

/// Unknown flag letters, sorted and de-duplicated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagsError {
    pub invalid: String,
}

impl fmt::Display for FlagsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid regular expression flags '{}'", self.invalid)
    }
}

impl std::error::Error for FlagsError {}

impl RegexFlags {
    fn slot(&mut self, letter: char) -> Option<&mut bool> {
        match letter {
            'u' => Some(&mut self.unicode),
            'g' => Some(&mut self.global),
            'i' => Some(&mut self.ignore_case),
            's' => Some(&mut self.dot_all),
            'm' => Some(&mut self.multiline),
            'y' => Some(&mut self.sticky),
            'x' => Some(&mut self.extended),
            _ => None,
        }
    }

    /// Read a flag string, ignoring unknown letters.
    pub fn parse(flags: &str) -> Self {
        let mut parsed = RegexFlags::default();
        for letter in flags.chars() {
            if let Some(slot) = parsed.slot(letter) {
                *slot = true;
            }
        }
        parsed
    }

    /// Read a flag string, reporting every unknown letter.
    pub fn parse_strict(flags: &str) -> Result<Self, FlagsError> {
        let mut parsed = RegexFlags::default();
        let mut invalid = Vec::new();
        for letter in flags.chars() {
            match parsed.slot(letter) {
                Some(slot) => *slot = true,
                None => invalid.push(letter),
            }
        }
        if invalid.is_empty() {
            return Ok(parsed);
        }
        invalid.sort_unstable();
        invalid.dedup();
        Err(FlagsError {
            invalid: invalid.into_iter().collect(),
        })
    }

    pub fn with_unicode(mut self) -> Self {
        self.unicode = true;
        self
    }
}

impl FromStr for RegexFlags {
    type Err = FlagsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegexFlags::parse_strict(s)
    }
}

impl fmt::Display for RegexFlags {
    /// Letters ordered by flag name: dotAll, extended, global, ignoreCase,
    /// multiline, sticky, unicode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.dot_all, 's'),
            (self.extended, 'x'),
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.sticky, 'y'),
            (self.unicode, 'u'),
        ];
        for (set, letter) in letters {
            if set {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}
