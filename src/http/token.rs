//! Cookie attribute token validation.
//!
//! A token here is anything free of whitespace and line-control characters.
//! This is a gate against header-injection-shaped input, not an RFC 6265
//! grammar check.

/// Characters that may never appear inside a cookie key or value.
const FORBIDDEN: [char; 5] = [' ', '\t', '\r', '\n', '\x0c'];

/// Returns true if `s` contains no space, tab, CR, LF or form-feed.
///
/// The empty string is a valid token.
pub fn is_valid_token(s: &str) -> bool {
    !s.contains(&FORBIDDEN[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tokens_are_valid() {
        assert!(is_valid_token("session"));
        assert!(is_valid_token("abc123"));
        assert!(is_valid_token("/"));
        assert!(is_valid_token("Wed,21-Oct-2015"));
        assert!(is_valid_token("ünïcode"));
    }

    #[test]
    fn empty_string_is_valid() {
        assert!(is_valid_token(""));
    }

    #[test]
    fn each_forbidden_character_is_rejected() {
        for c in FORBIDDEN {
            let s = format!("a{c}b");
            assert!(!is_valid_token(&s), "{s:?} should be rejected");
            assert!(!is_valid_token(&c.to_string()));
        }
    }

    #[test]
    fn other_control_characters_pass() {
        // Only the five listed characters are forbidden.
        assert!(is_valid_token("a\x0bb"));
        assert!(is_valid_token("a\x00b"));
    }
}
