//! Parse state threaded through the regex grammar

use serde::{Deserialize, Serialize};

use crate::jsre::ast::RegexFlags;

/// Legacy syntax accepted for compatibility with older engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Legacy {
    /// `\01` is the char U+0001 instead of an error
    pub octal_escape: bool,
    /// Any escaped char stands for itself, also in unicode mode
    pub identity_escape: bool,
    /// `[\d-z]` is three class items instead of an error
    pub char_class_escape_in_char_range: bool,
}

impl Legacy {
    pub fn all() -> Self {
        Legacy {
            octal_escape: true,
            identity_escape: true,
            char_class_escape_in_char_range: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarState {
    pub flags: RegexFlags,
    /// Start offsets of the parentheses opened and not yet closed
    pub open_pairs: Vec<usize>,
    /// Accept best-effort values where strict parsing reports an error
    pub loose: bool,
    pub legacy: Legacy,
}

impl GrammarState {
    /// Strict parsing with the given flags
    pub fn strict(flags: RegexFlags) -> Self {
        GrammarState {
            flags,
            ..Default::default()
        }
    }

    /// The tokenizer's state: loose, every legacy form accepted
    pub fn permissive(flags: RegexFlags) -> Self {
        GrammarState {
            flags,
            open_pairs: Vec::new(),
            loose: true,
            legacy: Legacy::all(),
        }
    }
}
