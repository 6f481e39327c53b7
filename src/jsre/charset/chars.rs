//! Code point helpers shared by the charset text format and the regex source emitter

/// Control character for a `\cX` escape letter.
pub fn ctrl(c: char) -> u32 {
    c as u32 % 32
}

/// `\xHH`, only meaningful for code points below 0x100
pub fn hex_escape(code_point: u32) -> String {
    format!("\\x{:02x}", code_point)
}

/// `\uHHHH`
pub fn unicode_escape(code_point: u32) -> String {
    format!("\\u{:04x}", code_point)
}

/// `\u{H...}`
pub fn code_point_escape(code_point: u32) -> String {
    format!("\\u{{{:X}}}", code_point)
}

pub fn is_surrogate(code_point: u32) -> bool {
    (0xD800..=0xDFFF).contains(&code_point)
}

/// Escape regex syntax characters. Inside a character class `-` is escaped too.
pub fn escape_regex(s: &str, in_char_class: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let special = matches!(
            c,
            '/' | '\\' | '^' | '$' | '*' | '+' | '?' | '.' | '(' | ')' | '|' | '[' | ']' | '{' | '}'
        ) || (in_char_class && c == '-');
        if special {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape code points above 0xFF as `\uHHHH` (or `\u{H...}` past the BMP).
pub fn escape_unicodes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let cp = c as u32;
        if cp <= 0xFF {
            out.push(c);
        } else if cp > 0xFFFF {
            out.push_str(&code_point_escape(cp));
        } else {
            out.push_str(&format!("\\u{:04X}", cp));
        }
    }
    out
}

/// Escape everything except ASCII letters, digits, `-` and `\`.
pub fn escape_non_alphanum(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let cp = c as u32;
        if c.is_ascii_alphanumeric() || c == '-' || c == '\\' {
            out.push(c);
        } else if cp <= 0xFF {
            out.push_str(&format!("\\x{:02X}", cp));
        } else if cp <= 0xFFFF {
            out.push_str(&format!("\\u{:04X}", cp));
        } else {
            out.push_str(&code_point_escape(cp));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl() {
        assert_eq!(ctrl('J'), 10);
        assert_eq!(ctrl('j'), 10);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(hex_escape(0x31), "\\x31");
        assert_eq!(unicode_escape(0x2028), "\\u2028");
        assert_eq!(code_point_escape(0x1F437), "\\u{1F437}");
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("a.b", false), "a\\.b");
        assert_eq!(escape_regex("a-/", false), "a-\\/");
        assert_eq!(escape_regex("a-]", true), "a\\-\\]");
    }

    #[test]
    fn test_escape_non_alphanum() {
        assert_eq!(escape_non_alphanum("a-z !"), "a-z\\x20\\x21");
        assert_eq!(escape_non_alphanum("\u{4e2d}"), "\\u4E2D");
    }
}
