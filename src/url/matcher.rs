use regex::Regex;

/// Checks if a host starts with any of the given prefixes
///
/// # Examples
///
/// ```
/// use bookmark_notes::url::matches_host_prefix;
///
/// let prefixes = vec!["ads.".to_string()];
/// assert!(matches_host_prefix("ads.example.com", &prefixes));
/// assert!(!matches_host_prefix("example.com", &prefixes));
/// ```
pub fn matches_host_prefix(host: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| host.starts_with(p.as_str()))
}

/// Checks if a URL path contains any of the given keywords as a substring
pub fn path_contains_any(path: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| path.contains(k.as_str()))
}

/// Returns the first pattern found anywhere in the URL
///
/// Patterns are searched, not anchored; use `^`/`$` in the pattern itself to
/// anchor.
pub fn first_matching_pattern<'r>(url: &str, patterns: &'r [Regex]) -> Option<&'r Regex> {
    patterns.iter().find(|p| p.is_match(url))
}
