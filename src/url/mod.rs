//! URL filtering for Bookmark-Notes
//!
//! This module decides which bookmark URLs are worth turning into notes. The
//! decision is a first-match-wins ladder over a [`FilterRuleSet`]; nothing
//! outside the allow lists survives.

mod domain;
mod matcher;

use crate::rules::FilterRuleSet;

// Re-export main functions
pub use domain::{decoded_path, extract_host, is_domain_root, parse_candidate};
pub use matcher::{first_matching_pattern, matches_host_prefix, path_contains_any};

/// Why a URL was kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeepReason {
    /// Host is in `allow.domains`
    AllowDomain,
    /// Path contains an `allow.path_keywords` entry
    AllowPathKeyword,
}

/// Why a URL was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExcludeReason {
    /// Missing scheme or host, or not a URL at all
    InvalidUrl,
    /// Matched a `regex_deny.patterns` entry
    DenyPattern,
    /// Host is in `deny.domains`
    DenyDomain,
    /// Host starts with a `deny.subdomain_keywords` entry
    DenySubdomain,
    /// Path contains a `deny.path_keywords` entry
    DenyPathKeyword,
    /// Site home page; never kept, even on allow-listed hosts
    DomainRoot,
    /// Matched no rule at all
    NoMatchingRule,
}

/// Outcome of running a URL through the filter ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDecision {
    Keep(KeepReason),
    Exclude(ExcludeReason),
}

impl FilterDecision {
    /// Returns true if the URL must not become a bookmark record
    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::Exclude(_))
    }

    /// Exclusion reason, if excluded
    pub fn exclude_reason(&self) -> Option<ExcludeReason> {
        match self {
            Self::Exclude(reason) => Some(*reason),
            Self::Keep(_) => None,
        }
    }
}

/// Runs a URL through the filter ladder
///
/// Rules are consulted in this order and the first one that decides wins:
/// 1. Invalid URL (no scheme or host)
/// 2. Deny pattern, searched in the full URL
/// 3. Host equals a deny domain
/// 4. Host starts with a deny subdomain prefix
/// 5. Host equals an allow domain: keep, unless the URL is a domain root
/// 6. Path contains a deny keyword
/// 7. Path contains an allow keyword: keep, unless the URL is a domain root
/// 8. Domain root
/// 9. Anything else is excluded
///
/// # Examples
///
/// ```
/// use bookmark_notes::rules::parse_rules;
/// use bookmark_notes::url::{evaluate, ExcludeReason, FilterDecision, KeepReason};
///
/// let rules = parse_rules("[allow]\ndomains = [\"example.com\"]\n").unwrap();
///
/// assert_eq!(
///     evaluate("https://example.com/post", &rules),
///     FilterDecision::Keep(KeepReason::AllowDomain)
/// );
/// assert_eq!(
///     evaluate("https://example.com/", &rules),
///     FilterDecision::Exclude(ExcludeReason::DomainRoot)
/// );
/// assert_eq!(
///     evaluate("https://other.com/post", &rules),
///     FilterDecision::Exclude(ExcludeReason::NoMatchingRule)
/// );
/// ```
pub fn evaluate(url_str: &str, rules: &FilterRuleSet) -> FilterDecision {
    use ExcludeReason::*;

    let url_str = url_str.trim();

    // Priority 1: basic validity
    let url = match parse_candidate(url_str) {
        Ok(url) => url,
        Err(_) => return FilterDecision::Exclude(InvalidUrl),
    };
    let host = match extract_host(&url) {
        Some(host) => host,
        None => return FilterDecision::Exclude(InvalidUrl),
    };
    let path = decoded_path(&url);
    let root = is_domain_root(&url);

    // Priority 2: deny patterns against the URL as written
    if first_matching_pattern(url_str, rules.deny_regexes()).is_some() {
        return FilterDecision::Exclude(DenyPattern);
    }

    // Priority 3: deny domains
    if rules.deny_domains().contains(&host) {
        return FilterDecision::Exclude(DenyDomain);
    }

    // Priority 4: deny subdomain prefixes
    if matches_host_prefix(&host, rules.deny_subdomain_prefixes()) {
        return FilterDecision::Exclude(DenySubdomain);
    }

    // Priority 5: allow domains rescue everything but the home page
    if rules.allow_domains().contains(&host) {
        return if root {
            FilterDecision::Exclude(DomainRoot)
        } else {
            FilterDecision::Keep(KeepReason::AllowDomain)
        };
    }

    // Priority 6: deny path keywords
    if path_contains_any(&path, rules.deny_path_keywords()) {
        return FilterDecision::Exclude(DenyPathKeyword);
    }

    // Priority 7: allow path keywords, same home-page carve-out
    if path_contains_any(&path, rules.allow_path_keywords()) {
        return if root {
            FilterDecision::Exclude(DomainRoot)
        } else {
            FilterDecision::Keep(KeepReason::AllowPathKeyword)
        };
    }

    // Priority 8: bare home pages
    if root {
        return FilterDecision::Exclude(DomainRoot);
    }

    // Default: closed world
    FilterDecision::Exclude(NoMatchingRule)
}

/// Returns true if the URL should not become a bookmark record
///
/// Shorthand for `evaluate(url, rules).is_excluded()`.
pub fn should_exclude(url: &str, rules: &FilterRuleSet) -> bool {
    evaluate(url, rules).is_excluded()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse_rules;

    fn create_test_rules() -> FilterRuleSet {
        parse_rules(
            r#"
[allow]
domains = ["qiita.com", "conflict.com"]
path_keywords = ["/blog/", "/articles/"]

[deny]
domains = ["blocked.com", "conflict.com"]
subdomain_keywords = ["ads.", "tracking."]
path_keywords = ["/login", "/blog/private"]

[regex_deny]
patterns = ['\.pdf$', 'utm_source=spam']
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_urls_are_excluded() {
        let rules = create_test_rules();
        for url in ["", "invalid-url", "javascript:alert(1)", "mailto:a@b.com"] {
            assert_eq!(
                evaluate(url, &rules),
                FilterDecision::Exclude(ExcludeReason::InvalidUrl),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_deny_pattern_beats_allow_domain() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://qiita.com/paper.pdf", &rules),
            FilterDecision::Exclude(ExcludeReason::DenyPattern)
        );
    }

    #[test]
    fn test_deny_domain_beats_allow_domain() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://conflict.com/article", &rules),
            FilterDecision::Exclude(ExcludeReason::DenyDomain)
        );
    }

    #[test]
    fn test_deny_domain_is_exact() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://blocked.com/page", &rules),
            FilterDecision::Exclude(ExcludeReason::DenyDomain)
        );
        // Subdomains of a denied host are not covered by deny.domains
        assert_eq!(
            evaluate("https://www.blocked.com/page", &rules),
            FilterDecision::Exclude(ExcludeReason::NoMatchingRule)
        );
    }

    #[test]
    fn test_deny_subdomain_prefix() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://ads.example.com/blog/post", &rules),
            FilterDecision::Exclude(ExcludeReason::DenySubdomain)
        );
    }

    #[test]
    fn test_allow_domain_keeps_non_root() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://qiita.com/user/items/123", &rules),
            FilterDecision::Keep(KeepReason::AllowDomain)
        );
        // Allow domain wins over a later deny keyword
        assert_eq!(
            evaluate("https://qiita.com/login", &rules),
            FilterDecision::Keep(KeepReason::AllowDomain)
        );
    }

    #[test]
    fn test_allow_domain_root_is_excluded() {
        let rules = create_test_rules();
        for url in [
            "https://qiita.com",
            "https://qiita.com/",
            "https://QIITA.com//",
        ] {
            assert_eq!(
                evaluate(url, &rules),
                FilterDecision::Exclude(ExcludeReason::DomainRoot),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_allow_domain_root_with_query_is_kept() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://qiita.com/?tag=rust", &rules),
            FilterDecision::Keep(KeepReason::AllowDomain)
        );
    }

    #[test]
    fn test_deny_path_keyword_beats_allow_keyword() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://example.com/blog/private/notes", &rules),
            FilterDecision::Exclude(ExcludeReason::DenyPathKeyword)
        );
    }

    #[test]
    fn test_allow_path_keyword() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://example.com/blog/rust-tips", &rules),
            FilterDecision::Keep(KeepReason::AllowPathKeyword)
        );
    }

    #[test]
    fn test_root_without_rules_is_excluded_as_root() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://unknown.org/", &rules),
            FilterDecision::Exclude(ExcludeReason::DomainRoot)
        );
    }

    #[test]
    fn test_default_is_exclude() {
        let rules = create_test_rules();
        assert_eq!(
            evaluate("https://unknown.org/some/page", &rules),
            FilterDecision::Exclude(ExcludeReason::NoMatchingRule)
        );
    }

    #[test]
    fn test_empty_rules_exclude_everything() {
        let rules = FilterRuleSet::default();
        assert!(should_exclude("https://x.com/a", &rules));
        assert!(should_exclude("https://x.com/", &rules));
        assert!(should_exclude("not a url", &rules));
    }

    #[test]
    fn test_host_is_matched_case_insensitively() {
        let rules = create_test_rules();
        assert!(should_exclude("https://BLOCKED.com/page", &rules));
        assert!(!should_exclude("https://Qiita.COM/items/1", &rules));
    }

    #[test]
    fn test_non_ascii_path_keywords() {
        let rules = parse_rules(
            r#"
[allow]
path_keywords = ["/記事/", "/my blog/"]

[deny]
path_keywords = ["/ログイン"]
"#,
        )
        .unwrap();

        assert_eq!(
            evaluate("https://example.jp/記事/123", &rules),
            FilterDecision::Keep(KeepReason::AllowPathKeyword)
        );
        assert_eq!(
            evaluate("https://example.jp/%E8%A8%98%E4%BA%8B/123", &rules),
            FilterDecision::Keep(KeepReason::AllowPathKeyword)
        );
        assert_eq!(
            evaluate("https://example.com/my blog/x", &rules),
            FilterDecision::Keep(KeepReason::AllowPathKeyword)
        );
        assert_eq!(
            evaluate("https://zenn.dev/ログイン", &rules),
            FilterDecision::Exclude(ExcludeReason::DenyPathKeyword)
        );
    }

    #[test]
    fn test_unicode_domain_rules() {
        let rules = parse_rules(
            r#"
[allow]
domains = ["日本語.jp"]

[deny]
domains = ["ブロック.jp"]
subdomain_keywords = ["広告."]
"#,
        )
        .unwrap();

        assert_eq!(
            evaluate("https://日本語.jp/page", &rules),
            FilterDecision::Keep(KeepReason::AllowDomain)
        );
        assert_eq!(
            evaluate("https://xn--wgv71a119e.jp/page", &rules),
            FilterDecision::Keep(KeepReason::AllowDomain)
        );
        assert_eq!(
            evaluate("https://ブロック.jp/page", &rules),
            FilterDecision::Exclude(ExcludeReason::DenyDomain)
        );
        assert_eq!(
            evaluate("https://広告.example.com/blog/x", &rules),
            FilterDecision::Exclude(ExcludeReason::DenySubdomain)
        );
    }

    #[test]
    fn test_decision_helpers() {
        let keep = FilterDecision::Keep(KeepReason::AllowDomain);
        let exclude = FilterDecision::Exclude(ExcludeReason::DenyDomain);
        assert!(!keep.is_excluded());
        assert!(exclude.is_excluded());
        assert_eq!(keep.exclude_reason(), None);
        assert_eq!(exclude.exclude_reason(), Some(ExcludeReason::DenyDomain));
    }
}
