use crate::rules::types::{FilterRuleSet, RuleDocument};
use crate::rules::validation::build_rule_set;
use crate::{RuleLoadError, RuleSourceMissing};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::Path;

/// Result of loading a rule file
#[derive(Debug, Clone)]
pub struct LoadedRules {
    /// The rule set to hand to the parser
    pub rules: FilterRuleSet,

    /// Set when the file did not exist and `rules` is the empty fallback
    pub missing: Option<RuleSourceMissing>,
}

impl LoadedRules {
    /// Returns true if the rules are the empty fallback
    pub fn is_fallback(&self) -> bool {
        self.missing.is_some()
    }
}

/// Loads filter rules from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the rule file
///
/// # Returns
///
/// * `Ok(LoadedRules)` - The rule set; if the file is absent the set is empty
///   and `missing` carries a [`RuleSourceMissing`] for the caller to log
/// * `Err(RuleLoadError)` - The file exists but could not be read, parsed, or
///   validated
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use bookmark_notes::rules::load_rules;
///
/// let loaded = load_rules(Path::new("filter_rules.toml")).unwrap();
/// println!("{} rules loaded", loaded.rules.rule_count());
/// ```
pub fn load_rules(path: &Path) -> Result<LoadedRules, RuleLoadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let missing = RuleSourceMissing {
                path: path.to_path_buf(),
            };
            tracing::warn!("{}; every URL outside the allow lists will be excluded", missing);
            return Ok(LoadedRules {
                rules: FilterRuleSet::default(),
                missing: Some(missing),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let rules = parse_rules(&content)?;
    tracing::info!(
        "Loaded {} filter rules from {}",
        rules.rule_count(),
        path.display()
    );

    Ok(LoadedRules {
        rules,
        missing: None,
    })
}

/// Parses and validates rule document text
pub fn parse_rules(content: &str) -> Result<FilterRuleSet, RuleLoadError> {
    let doc: RuleDocument = toml::from_str(content)?;
    build_rule_set(doc)
}

/// Computes a SHA-256 hash of the rule file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(RuleLoadError)` - Failed to read the file
pub fn compute_rules_hash(path: &Path) -> Result<String, RuleLoadError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
