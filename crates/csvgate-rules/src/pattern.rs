//! Regex patterns written either bare or in `/body/flags` form.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, RuleError};

/// Compile a pattern. `/demo-[12]\.csv$/i` is accepted as well as a bare regex.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    let (body, flags) = split_delimited(pattern).unwrap_or((pattern, ""));
    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'u' => {}
            other => {
                return Err(RuleError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: format!("unsupported flag '{other}'"),
                });
            }
        }
    }
    builder.build().map_err(|err| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

const FLAGS: &str = "imsxu";

fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let rest = pattern.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let flags = &rest[end + 1..];
    if !flags.chars().all(|c| FLAGS.contains(c)) {
        return None;
    }
    Some((&rest[..end], flags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimited_with_flags() {
        let re = compile_pattern(r"/demo-[12]\.csv$/i").unwrap();
        assert!(re.is_match("tests/DEMO-1.CSV"));
        assert!(!re.is_match("demo-3.csv"));
    }

    #[test]
    fn bare_pattern() {
        let re = compile_pattern(r"^\d+$").unwrap();
        assert!(re.is_match("123"));
    }

    #[test]
    fn path_like_pattern_is_not_mistaken_for_flags() {
        let re = compile_pattern("/data/2024/").unwrap();
        assert!(re.is_match("/srv/data/2024/file.csv"));
    }

    #[test]
    fn non_flag_tail_compiles_as_bare_pattern() {
        let re = compile_pattern("/data/csv").unwrap();
        assert!(re.is_match("/srv/data/csv/file"));
        assert!(!re.is_match("data.csv"));
    }

    #[test]
    fn invalid_body_is_rejected() {
        let err = compile_pattern("/demo-[12/i").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
    }
}
