//! core/tags/util.rs
//! Small parsing helpers shared by the codec and the typed accessors.

/// Parse strings like:
/// - "3" -> (Some(3), None)
/// - "3/12" -> (Some(3), Some(12))
pub(crate) fn parse_slash_pair_u32(s: Option<&str>) -> (Option<u32>, Option<u32>) {
    let Some(s) = s else { return (None, None) };
    let s = s.trim();
    if s.is_empty() {
        return (None, None);
    }

    let mut parts = s.split('/');
    let a = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let b = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    (a, b)
}

/// Parse common "boolean-ish" tag values.
/// Accepts: "1", "0", "true", "false", "yes", "no", "y", "n"
pub(crate) fn parse_boolish(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Leading digits as a year: "1998" -> 1998, "2001-05-01" -> 2001.
pub(crate) fn parse_leading_i32(s: &str) -> Option<i32> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_pairs() {
        assert_eq!(parse_slash_pair_u32(Some("3")), (Some(3), None));
        assert_eq!(parse_slash_pair_u32(Some(" 3/12 ")), (Some(3), Some(12)));
        assert_eq!(parse_slash_pair_u32(Some("/12")), (None, Some(12)));
        assert_eq!(parse_slash_pair_u32(None), (None, None));
    }

    #[test]
    fn boolish() {
        assert_eq!(parse_boolish("Yes"), Some(true));
        assert_eq!(parse_boolish("0"), Some(false));
        assert_eq!(parse_boolish("maybe"), None);
    }

    #[test]
    fn leading_year() {
        assert_eq!(parse_leading_i32("2001-05-01"), Some(2001));
        assert_eq!(parse_leading_i32("1998"), Some(1998));
        assert_eq!(parse_leading_i32("circa 1998"), None);
    }
}
