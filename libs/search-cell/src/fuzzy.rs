//! Loose name matching: "apolo hosp" finds "Apollo Hospital".
//!
//! Each whitespace-separated term becomes a pattern whose characters may be
//! separated by anything (`a.*p.*o...`). Patterns are POSIX regexes for the
//! store's case-insensitive `imatch` operator.

use shared_database::Condition;

const REGEX_META: &[char] = &['.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\'];

/// Backslash-escapes regex metacharacters.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if REGEX_META.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One subsequence pattern per term.
pub fn term_patterns(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|term| {
            term.chars()
                .map(|c| escape(&c.to_string()))
                .collect::<Vec<_>>()
                .join(".*")
        })
        .collect()
}

/// `column` matches the whole query literally, or any term loosely.
pub fn name_conditions(column: &str, query: &str) -> Vec<Condition> {
    let mut patterns = vec![escape(query.trim())];
    for pattern in term_patterns(query) {
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }

    patterns
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(|p| Condition::imatch(column, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(escape("St. John (East)"), r"St\. John \(East\)");
        assert_eq!(escape("a+b"), r"a\+b");
    }

    #[test]
    fn test_term_patterns() {
        assert_eq!(term_patterns("apolo  hosp"), vec!["a.*p.*o.*l.*o", "h.*o.*s.*p"]);
        assert!(term_patterns("   ").is_empty());
    }

    #[test]
    fn test_escaped_characters_stay_intact() {
        assert_eq!(term_patterns("a.b"), vec![r"a.*\..*b"]);
    }

    #[test]
    fn test_name_conditions_include_whole_query() {
        let conditions = name_conditions("name", "Meera Shah");
        assert_eq!(
            conditions,
            vec![
                Condition::imatch("name", "Meera Shah"),
                Condition::imatch("name", "M.*e.*e.*r.*a"),
                Condition::imatch("name", "S.*h.*a.*h"),
            ]
        );
    }

    #[test]
    fn test_single_character_query_not_duplicated() {
        assert_eq!(name_conditions("name", "x"), vec![Condition::imatch("name", "x")]);
    }
}
