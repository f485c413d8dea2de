use crate::rules::types::{FilterRuleSet, RuleDocument};
use crate::RuleLoadError;
use regex::Regex;
use url::Host;

/// Validates a rule document and turns it into an immutable rule set
///
/// Domains and subdomain prefixes are trimmed, lowercased and converted to
/// their ASCII (punycode) form to match how `Url` stores hosts; path keywords are
/// trimmed, and every deny pattern is compiled up front so a bad pattern fails
/// here rather than halfway through a parse.
pub fn build_rule_set(doc: RuleDocument) -> Result<FilterRuleSet, RuleLoadError> {
    let allow_domains = doc
        .allow
        .domains
        .iter()
        .map(|d| normalize_domain("allow.domains", d))
        .collect::<Result<_, _>>()?;

    let deny_domains = doc
        .deny
        .domains
        .iter()
        .map(|d| normalize_domain("deny.domains", d))
        .collect::<Result<_, _>>()?;

    let deny_subdomain_prefixes = doc
        .deny
        .subdomain_keywords
        .iter()
        .map(|k| normalize_host_prefix(k))
        .collect::<Result<_, _>>()?;

    let allow_path_keywords = validate_keywords("allow.path_keywords", &doc.allow.path_keywords)?;
    let deny_path_keywords = validate_keywords("deny.path_keywords", &doc.deny.path_keywords)?;

    let deny_regexes = doc
        .regex_deny
        .patterns
        .iter()
        .map(|p| compile_pattern(p))
        .collect::<Result<_, _>>()?;

    Ok(FilterRuleSet {
        allow_domains,
        deny_domains,
        deny_subdomain_prefixes,
        allow_path_keywords,
        deny_path_keywords,
        deny_regexes,
    })
}

/// Validates and normalizes a host name entry
fn normalize_domain(section: &str, domain: &str) -> Result<String, RuleLoadError> {
    let domain = domain.trim().to_lowercase();

    if domain.is_empty() {
        return Err(RuleLoadError::Validation(format!(
            "{} cannot contain empty entries",
            section
        )));
    }

    if domain.contains("://") {
        return Err(RuleLoadError::Validation(format!(
            "{} entry '{}' must be a host name, not a URL",
            section, domain
        )));
    }

    if domain.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(RuleLoadError::Validation(format!(
            "{} entry '{}' contains invalid characters",
            section, domain
        )));
    }

    // Bracketed IPv6 literals are the only hosts allowed a colon
    if domain.contains(':') && !domain.starts_with('[') {
        return Err(RuleLoadError::Validation(format!(
            "{} entry '{}' must not include a port",
            section, domain
        )));
    }

    ascii_host(&domain).map_err(|e| {
        RuleLoadError::Validation(format!("{} entry '{}' is not a valid host: {}", section, domain, e))
    })
}

/// Converts a host to the form `Url::host_str` reports
fn ascii_host(host: &str) -> Result<String, url::ParseError> {
    Host::parse(host).map(|h| h.to_string())
}

/// Validates and normalizes a host prefix such as `ads.`
fn normalize_host_prefix(prefix: &str) -> Result<String, RuleLoadError> {
    let prefix = prefix.trim().to_lowercase();

    if prefix.is_empty() {
        return Err(RuleLoadError::Validation(
            "deny.subdomain_keywords cannot contain empty entries".to_string(),
        ));
    }

    if prefix.chars().any(|c| c.is_whitespace() || c == '/' || c == ':') {
        return Err(RuleLoadError::Validation(format!(
            "deny.subdomain_keywords entry '{}' contains invalid characters",
            prefix
        )));
    }

    if prefix.is_ascii() {
        return Ok(prefix);
    }

    // Only whole labels convert to punycode; the trailing dot is kept as written
    let labels = prefix.trim_end_matches('.');
    let suffix = &prefix[labels.len()..];
    ascii_host(labels)
        .map(|ascii| format!("{}{}", ascii, suffix))
        .map_err(|e| {
            RuleLoadError::Validation(format!(
                "deny.subdomain_keywords entry '{}' is not a valid host prefix: {}",
                prefix, e
            ))
        })
}

/// Rejects empty path keywords; an empty keyword would match every path
fn validate_keywords(section: &str, keywords: &[String]) -> Result<Vec<String>, RuleLoadError> {
    keywords
        .iter()
        .map(|k| {
            let k = k.trim();
            if k.is_empty() {
                Err(RuleLoadError::Validation(format!(
                    "{} cannot contain empty entries",
                    section
                )))
            } else {
                Ok(k.to_string())
            }
        })
        .collect()
}

fn compile_pattern(pattern: &str) -> Result<Regex, RuleLoadError> {
    Regex::new(pattern).map_err(|source| RuleLoadError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}
