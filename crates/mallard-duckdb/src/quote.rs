//! Identifier quoting.
//!
//! This is a character-level state machine rather than a blanket
//! escape-everything routine, because compound identifiers depend on the
//! dot-triggered segment reset: `a.b` must quote as `"a"."b"`, embedded
//! quote pairs are doubled in place, and a trailing odd quote run is
//! emitted as a doubled pair before the final closing quote. Already
//! quoted input passes through unchanged.

/// Writes the quoted form of `raw` to `buf`.
pub fn quote_to(buf: &mut String, raw: &str) {
    let mut under_quoted = false;
    let mut self_quoted = false;
    let mut continuous_quote: i32 = 0;
    let mut shift_delimiter: i32 = 0;

    for ch in raw.chars() {
        match ch {
            '"' => {
                continuous_quote += 1;
                if continuous_quote == 2 {
                    buf.push_str("\"\"");
                    continuous_quote = 0;
                }
            }
            '.' => {
                if continuous_quote > 0 || !self_quoted {
                    shift_delimiter = 0;
                    under_quoted = false;
                    continuous_quote = 0;
                    buf.push('"');
                }
                buf.push('.');
                // A dot closes the segment without advancing the delimiter.
                continue;
            }
            _ => {
                if shift_delimiter - continuous_quote <= 0 && !under_quoted {
                    buf.push('"');
                    under_quoted = true;
                    self_quoted = continuous_quote > 0;
                    if self_quoted {
                        continuous_quote -= 1;
                    }
                }

                while continuous_quote > 0 {
                    buf.push_str("\"\"");
                    continuous_quote -= 1;
                }

                buf.push(ch);
            }
        }
        shift_delimiter += 1;
    }

    if continuous_quote > 0 && !self_quoted {
        buf.push_str("\"\"");
    }
    buf.push('"');
}

/// Returns the quoted form of `raw`.
#[must_use]
pub fn quote(raw: &str) -> String {
    let mut buf = String::with_capacity(raw.len() + 2);
    quote_to(&mut buf, raw);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier() {
        assert_eq!(quote("users"), "\"users\"");
    }

    #[test]
    fn test_compound_identifier_segments() {
        assert_eq!(quote("a.b"), "\"a\".\"b\"");
        assert_eq!(quote("main.users.id"), "\"main\".\"users\".\"id\"");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        assert_eq!(quote("ab\"cd"), "\"ab\"\"cd\"");
    }

    #[test]
    fn test_trailing_quote_run_is_doubled() {
        assert_eq!(quote("abc\""), "\"abc\"\"\"");
    }

    #[test]
    fn test_already_quoted_is_idempotent() {
        assert_eq!(quote("\"users\""), "\"users\"");
        assert_eq!(quote("\"a\".\"b\""), "\"a\".\"b\"");
    }

    #[test]
    fn test_quoted_segment_mixed_with_bare_segment() {
        assert_eq!(quote("\"a\".b"), "\"a\".\"b\"");
    }

    #[test]
    fn test_long_identifier() {
        let long = "a".repeat(200);
        assert_eq!(quote(&long), format!("\"{long}\""));

        let compound = format!("{long}.{long}");
        assert_eq!(quote(&compound), format!("\"{long}\".\"{long}\""));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(quote("order.items"), quote("order.items"));
    }
}
