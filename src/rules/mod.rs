//! Filter rule loading
//!
//! This module loads the allow/deny rule document (TOML) that drives the URL
//! filter ladder, validates it, and produces an immutable [`FilterRuleSet`].
//!
//! # Example
//!
//! ```no_run
//! use bookmark_notes::rules::load_rules;
//! use std::path::Path;
//!
//! let loaded = load_rules(Path::new("filter_rules.toml")).unwrap();
//! if loaded.is_fallback() {
//!     println!("No rule file; only the default deny applies");
//! }
//! ```

mod loader;
mod types;
mod validation;

pub use types::{AllowSection, DenySection, FilterRuleSet, RegexDenySection, RuleDocument};

pub use loader::{compute_rules_hash, load_rules, parse_rules, LoadedRules};
pub use validation::build_rule_set;
