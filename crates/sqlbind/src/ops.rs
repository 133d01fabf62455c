//! Fixed operator table.
//!
//! Maps symbolic operator tags (as used in declarative condition trees and by
//! the fluent builder) to SQL operator text. Read-only, shared by all
//! builders.

/// Resolve a symbolic operator tag to its SQL text.
///
/// Tags are expected in lower case; the condition compiler normalizes case
/// before lookup.
pub(crate) fn lookup(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "eq" => "=",
        "ne" => "!=",
        "gte" => ">=",
        "gt" => ">",
        "lte" => "<=",
        "lt" => "<",
        "is" => "IS",
        "isnot" | "not" => "IS NOT",
        "like" => "LIKE",
        "notlike" => "NOT LIKE",
        "ilike" => "ILIKE",
        "notilike" => "NOT ILIKE",
        "regexp" => "REGEXP",
        "notregexp" => "NOT REGEXP",
        "in" => "IN",
        "notin" => "NOT IN",
        "between" => "BETWEEN",
        "notbetween" => "NOT BETWEEN",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve() {
        assert_eq!(lookup("eq"), Some("="));
        assert_eq!(lookup("notbetween"), Some("NOT BETWEEN"));
        assert_eq!(lookup("isnot"), Some("IS NOT"));
        assert_eq!(lookup("not"), Some("IS NOT"));
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(lookup("contains"), None);
        // case matters at this layer; callers normalize first
        assert_eq!(lookup("EQ"), None);
    }
}
