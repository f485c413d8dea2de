use regex::Regex;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Raw rule document as written in the TOML rule file
///
/// Every section and key is optional; an empty file deserializes to an
/// all-empty document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub allow: AllowSection,
    #[serde(default)]
    pub deny: DenySection,
    #[serde(default)]
    pub regex_deny: RegexDenySection,
}

/// `[allow]` section: hosts and path keywords rescued from the default deny
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllowSection {
    #[serde(default)]
    pub domains: Vec<String>,

    #[serde(default)]
    pub path_keywords: Vec<String>,
}

/// `[deny]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DenySection {
    #[serde(default)]
    pub domains: Vec<String>,

    /// Host prefixes such as `ads.` or `tracking.`
    #[serde(default)]
    pub subdomain_keywords: Vec<String>,

    #[serde(default)]
    pub path_keywords: Vec<String>,
}

/// `[regex_deny]` section: patterns searched in the full URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegexDenySection {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Validated, immutable filter rules
///
/// Built once per parser from a [`RuleDocument`]; there is no way to mutate it
/// afterwards. The default value is the all-empty rule set used when no rule
/// file exists.
#[derive(Debug, Clone, Default)]
pub struct FilterRuleSet {
    pub(crate) allow_domains: BTreeSet<String>,
    pub(crate) deny_domains: BTreeSet<String>,
    pub(crate) deny_subdomain_prefixes: Vec<String>,
    pub(crate) allow_path_keywords: Vec<String>,
    pub(crate) deny_path_keywords: Vec<String>,
    pub(crate) deny_regexes: Vec<Regex>,
}

impl FilterRuleSet {
    pub fn allow_domains(&self) -> &BTreeSet<String> {
        &self.allow_domains
    }

    pub fn deny_domains(&self) -> &BTreeSet<String> {
        &self.deny_domains
    }

    pub fn deny_subdomain_prefixes(&self) -> &[String] {
        &self.deny_subdomain_prefixes
    }

    pub fn allow_path_keywords(&self) -> &[String] {
        &self.allow_path_keywords
    }

    pub fn deny_path_keywords(&self) -> &[String] {
        &self.deny_path_keywords
    }

    pub fn deny_regexes(&self) -> &[Regex] {
        &self.deny_regexes
    }

    /// Returns true if no rule of any kind is configured
    pub fn is_empty(&self) -> bool {
        self.allow_domains.is_empty()
            && self.deny_domains.is_empty()
            && self.deny_subdomain_prefixes.is_empty()
            && self.allow_path_keywords.is_empty()
            && self.deny_path_keywords.is_empty()
            && self.deny_regexes.is_empty()
    }

    /// Total number of configured rules
    pub fn rule_count(&self) -> usize {
        self.allow_domains.len()
            + self.deny_domains.len()
            + self.deny_subdomain_prefixes.len()
            + self.allow_path_keywords.len()
            + self.deny_path_keywords.len()
            + self.deny_regexes.len()
    }

    /// Hex-encoded SHA-256 over a canonical rendering of the rules
    ///
    /// Two rule sets with the same effective content share a fingerprint
    /// regardless of how the source file was formatted.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        let sections: [(&str, Vec<&str>); 6] = [
            ("allow.domains", self.allow_domains.iter().map(String::as_str).collect()),
            ("allow.path_keywords", self.allow_path_keywords.iter().map(String::as_str).collect()),
            ("deny.domains", self.deny_domains.iter().map(String::as_str).collect()),
            (
                "deny.subdomain_keywords",
                self.deny_subdomain_prefixes.iter().map(String::as_str).collect(),
            ),
            ("deny.path_keywords", self.deny_path_keywords.iter().map(String::as_str).collect()),
            ("regex_deny.patterns", self.deny_regexes.iter().map(Regex::as_str).collect()),
        ];

        for (name, entries) in sections {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            for entry in entries {
                hasher.update(entry.as_bytes());
                hasher.update([0u8]);
            }
            hasher.update([1u8]);
        }

        hex::encode(hasher.finalize())
    }
}
