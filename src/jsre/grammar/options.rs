//! Parse options
//!
//! [ParseOptions] collects everything that changes how a pattern is parsed: the flag
//! string, whether trailing input is allowed, loose mode and the legacy toggles. All
//! fields default, so a YAML or JSON document only names what it changes:
//!
//! ```yaml
//! flags: u
//! loose: true
//! legacy:
//!   octal_escape: true
//! ```

use serde::{Deserialize, Serialize};

use super::state::{GrammarState, Legacy};
use crate::jsre::ast::{FlagsError, RegexFlags};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Flag letters, e.g. `"gu"`. Unknown letters are a [super::ErrorKind::Flags] error.
    pub flags: String,
    /// Stop at the first char the grammar cannot use instead of reporting it
    pub partial: bool,
    pub loose: bool,
    pub legacy: Legacy,
}

impl ParseOptions {
    pub fn new(flags: &str) -> Self {
        ParseOptions {
            flags: flags.to_string(),
            ..Default::default()
        }
    }

    /// Load options from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load options from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    pub fn loose(mut self, loose: bool) -> Self {
        self.loose = loose;
        self
    }

    pub fn legacy(mut self, legacy: Legacy) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn regex_flags(&self) -> Result<RegexFlags, FlagsError> {
        RegexFlags::parse_strict(&self.flags)
    }

    pub(crate) fn state(&self, flags: RegexFlags) -> GrammarState {
        GrammarState {
            flags,
            open_pairs: Vec::new(),
            loose: self.loose,
            legacy: self.legacy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_partial_document() {
        let yaml = r#"
flags: u
loose: true
legacy:
  octal_escape: true
"#;
        let options = ParseOptions::from_yaml(yaml).expect("Should parse valid YAML");
        assert_eq!(options.flags, "u");
        assert!(options.loose);
        assert!(!options.partial);
        assert!(options.legacy.octal_escape);
        assert!(!options.legacy.identity_escape);
    }

    #[test]
    fn test_json() {
        let options = ParseOptions::from_json(r#"{"partial": true}"#).expect("Should parse JSON");
        assert_eq!(options, ParseOptions::default().partial(true));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(ParseOptions::from_yaml("{ flags: [").is_err());
    }
}
